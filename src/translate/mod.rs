// Translation pipeline core
//
// - batch: groups subtitle texts into character-budgeted chunks
// - ollama: adapter for an Ollama-served translation model
// - realign: maps translated chunks back onto the original timed entries

pub mod batch;
pub mod ollama;
pub mod realign;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

pub use batch::chunk_texts;
pub use realign::realign;

use crate::config::TranslateConfig;
use crate::error::Result;
use crate::model::ModelChoice;

/// Main trait for translation backends. One chunk per call, no guarantee
/// about sentence segmentation of the output.
#[async_trait]
pub trait TranslateBackend: Send + Sync {
    /// Translate one chunk, optionally directing the target language. The
    /// backend may ignore the hint.
    async fn translate_chunk(&self, chunk: &str, target_language: Option<&str>) -> Result<String>;
}

/// Create a translation backend for the selected model, degrading to the
/// configured fallback model when the selection is not available on the
/// endpoint.
pub async fn create_backend(
    config: &TranslateConfig,
    choice: &ModelChoice,
    fallback_model: &str,
) -> Result<Box<dyn TranslateBackend>> {
    let model = match ollama::check_model_availability(&config.endpoint, &choice.model).await {
        Ok(()) => choice.model.clone(),
        Err(e) if choice.model != fallback_model => {
            warn!(
                "Model '{}' unavailable ({}); degrading to '{}'",
                choice.model, e, fallback_model
            );
            ollama::check_model_availability(&config.endpoint, fallback_model).await?;
            fallback_model.to_string()
        }
        Err(e) => return Err(e),
    };

    info!("Using translation model '{}' on device {}", model, choice.device);
    Ok(Box::new(ollama::OllamaTranslator::new(config, model)?))
}

/// Translate chunks strictly in order, one blocking call at a time,
/// advancing a progress bar per completed chunk.
pub async fn translate_chunks(
    backend: &dyn TranslateBackend,
    chunks: &[String],
    target_language: &str,
) -> Result<Vec<String>> {
    let mut translated = Vec::with_capacity(chunks.len());

    let progress = ProgressBar::new(chunks.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Translating [{bar:40.cyan/blue}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for chunk in chunks {
        let result = backend
            .translate_chunk(chunk, Some(target_language))
            .await?;
        translated.push(result);
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!("Translated {} chunks to {}", translated.len(), target_language);

    Ok(translated)
}
