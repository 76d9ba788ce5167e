// Transcription adapters
//
// Speech-to-text is delegated to an external backend behind the Transcriber
// trait. The default implementation shells out to the whisper CLI and parses
// its JSON output.

pub mod whisper_cli;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TranscriberConfig;
use crate::error::Result;

/// One timed transcription segment, in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Ordered transcription result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

/// Main trait for transcription operations
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file into timed segments
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the default transcriber implementation (whisper CLI)
    pub fn create_default(config: TranscriberConfig) -> Box<dyn Transcriber> {
        Box::new(whisper_cli::WhisperCliTranscriber::new(config))
    }
}
