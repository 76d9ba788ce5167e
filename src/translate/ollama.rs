use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::TranslateBackend;
use crate::config::TranslateConfig;
use crate::error::{Result, SublateError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translation backend talking to an Ollama-served sequence-to-sequence model
pub struct OllamaTranslator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaTranslator {
    pub fn new(config: &TranslateConfig, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(SublateError::Http)?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SublateError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SublateError::Translation(format!(
                "Ollama API error {}: {}",
                status, error_text
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SublateError::Translation(format!("Failed to parse response: {}", e)))?;

        let raw = generate_response.response.trim().to_string();
        if raw.is_empty() {
            return Err(SublateError::Translation(
                "Empty translation received".to_string(),
            ));
        }

        // The model is asked to answer {"text": "..."}; fall back to the raw
        // response when it does not comply
        if let Ok(result) = serde_json::from_str::<TranslationResult>(&raw) {
            return Ok(result.text.trim().to_string());
        }

        Ok(raw)
    }
}

#[async_trait]
impl TranslateBackend for OllamaTranslator {
    async fn translate_chunk(&self, chunk: &str, target_language: Option<&str>) -> Result<String> {
        match target_language {
            Some(lang) => {
                let directed = build_prompt(chunk, Some(lang));
                match self.generate(directed).await {
                    Ok(translation) => Ok(translation),
                    Err(e) => {
                        // Backend could not honor the target-language
                        // directive; retry undirected rather than failing the
                        // whole pipeline
                        warn!(
                            "Directed translation to '{}' failed ({}); retrying without language directive",
                            lang, e
                        );
                        self.generate(build_prompt(chunk, None)).await
                    }
                }
            }
            None => self.generate(build_prompt(chunk, None)).await,
        }
    }
}

/// Build the generate prompt, with or without a target-language directive
pub fn build_prompt(text: &str, target_language: Option<&str>) -> String {
    match target_language {
        Some(lang) => {
            let language_name = language_code_to_name(lang);
            format!(
                "You are a professional translator.\n\
                 \n\
                 Translate the text to {} ONLY (language code: {}). Do not translate to any other language.\n\
                 Return ONLY the translation in JSON format as {{\"text\":\"your translation here\"}}.\n\
                 Do not include explanations or alternatives.\n\
                 \n\
                 [Text to translate]\n\
                 {}\n",
                language_name, lang, text
            )
        }
        None => format!(
            "You are a professional translator.\n\
             \n\
             Translate the text into natural fluent prose in your default target language.\n\
             Return ONLY the translation in JSON format as {{\"text\":\"your translation here\"}}.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            text
        ),
    }
}

/// Convert a language code to a full name for clearer prompts
fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "en" => "English",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" => "Chinese",
        "fr" => "French",
        "de" => "German",
        "es" => "Spanish",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "it" => "Italian",
        "vi" => "Vietnamese",
        "th" => "Thai",
        _ => return code.to_string(),
    }
    .to_string()
}

/// Check that the model is loaded on the Ollama endpoint
pub async fn check_model_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint);

    let request = json!({ "name": model });

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            SublateError::BackendUnavailable(format!("Failed to connect to Ollama: {}", e))
        })?;

    if response.status().is_success() {
        info!("Ollama model '{}' is available", model);
        Ok(())
    } else {
        Err(SublateError::BackendUnavailable(format!(
            "Ollama model '{}' not found. Pull it first: ollama pull {}",
            model, model
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_prompt_names_language() {
        let prompt = build_prompt("こんにちは", Some("ko"));
        assert!(prompt.contains("Korean"));
        assert!(prompt.contains("language code: ko"));
        assert!(prompt.contains("こんにちは"));
    }

    #[test]
    fn test_undirected_prompt_has_no_language_directive() {
        let prompt = build_prompt("こんにちは", None);
        assert!(!prompt.contains("language code"));
        assert!(prompt.contains("こんにちは"));
    }

    #[test]
    fn test_unknown_language_code_falls_back_to_code() {
        assert_eq!(language_code_to_name("xx"), "xx");
        assert_eq!(language_code_to_name("KO"), "Korean");
    }
}
