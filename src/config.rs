use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, SublateError};

fn default_chunk_char_limit() -> usize {
    800
}

fn default_sentence_delimiter() -> String {
    ". ".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub download: DownloadConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Path to the downloader binary (e.g., yt-dlp)
    pub binary_path: String,
    /// Directory for downloaded audio files
    pub audio_dir: String,
    /// Number of fragments to download in parallel
    pub concurrent_fragments: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper CLI binary
    pub binary_path: String,
    /// Whisper model name
    pub model: String,
    /// Source language of the audio
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Ollama endpoint URL
    pub endpoint: String,
    /// Target language code for translation
    pub target_language: String,
    /// Character budget per translation chunk
    #[serde(default = "default_chunk_char_limit")]
    pub chunk_char_limit: usize,
    /// Delimiter used to split translated chunks back into per-entry fragments
    #[serde(default = "default_sentence_delimiter")]
    pub sentence_delimiter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model to use when an accelerator with enough memory is available
    pub accelerated_model: String,
    /// Smaller model used on CPU or low-memory accelerators
    pub fallback_model: String,
    /// Minimum accelerator memory (MB) required for the accelerated model
    pub min_accelerator_memory_mb: u64,
    /// Whether an accelerator is present
    pub has_accelerator: bool,
    /// Total accelerator memory in MB (0 when none)
    pub accelerator_memory_mb: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            download: DownloadConfig {
                binary_path: "yt-dlp".to_string(),
                audio_dir: "_temp_audio".to_string(),
                concurrent_fragments: default_concurrent_fragments(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "base".to_string(),
                language: "ja".to_string(),
            },
            translate: TranslateConfig {
                endpoint: "http://localhost:11434".to_string(),
                target_language: "ko".to_string(),
                chunk_char_limit: default_chunk_char_limit(),
                sentence_delimiter: default_sentence_delimiter(),
            },
            model: ModelConfig {
                accelerated_model: "nllb-200-3.3b".to_string(),
                fallback_model: "nllb-200-distilled-600m".to_string(),
                min_accelerator_memory_mb: 12000,
                has_accelerator: false,
                accelerator_memory_mb: 0,
            },
        }
    }
}

fn default_concurrent_fragments() -> u32 {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1);
    (cpus + 4).min(32)
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SublateError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SublateError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SublateError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| SublateError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.translate.chunk_char_limit, 800);
        assert_eq!(parsed.translate.sentence_delimiter, ". ");
        assert_eq!(parsed.model.min_accelerator_memory_mb, 12000);
    }

    #[test]
    fn test_optional_fields_use_defaults() {
        let toml_str = r#"
            [download]
            binary_path = "yt-dlp"
            audio_dir = "_temp_audio"
            concurrent_fragments = 8

            [transcriber]
            binary_path = "whisper"
            model = "base"
            language = "ja"

            [translate]
            endpoint = "http://localhost:11434"
            target_language = "ko"

            [model]
            accelerated_model = "nllb-200-3.3b"
            fallback_model = "nllb-200-distilled-600m"
            min_accelerator_memory_mb = 12000
            has_accelerator = false
            accelerator_memory_mb = 0
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.translate.chunk_char_limit, 800);
        assert_eq!(config.translate.sentence_delimiter, ". ");
    }
}
