use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;
use tracing::info;

use super::{Transcriber, Transcript, TranscriptSegment};
use crate::config::TranscriberConfig;
use crate::error::{Result, SublateError};

/// Whisper CLI JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    pub text: String,
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

/// Whisper CLI segment format. Decoder metadata fields are optional because
/// they vary between whisper builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub tokens: Option<Vec<i64>>,
    pub avg_logprob: Option<f64>,
    pub no_speech_prob: Option<f64>,
}

impl From<WhisperOutput> for Transcript {
    fn from(output: WhisperOutput) -> Self {
        let segments = output
            .segments
            .into_iter()
            .map(|seg| TranscriptSegment {
                start: seg.start,
                end: seg.end,
                text: seg.text.trim().to_string(),
            })
            .collect();

        Transcript {
            segments,
            language: output.language.unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// Transcriber backed by the whisper CLI
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
        if !audio_path.exists() {
            return Err(SublateError::FileNotFound(audio_path.display().to_string()));
        }

        info!(
            "Transcribing {} with model {}",
            audio_path.display(),
            self.config.model
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| SublateError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json");

        let language = language.unwrap_or(&self.config.language);
        cmd.arg("--language").arg(language);

        let output = cmd
            .output()
            .map_err(|e| SublateError::Transcriber(format!("Failed to execute whisper: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SublateError::Transcriber(format!(
                "Whisper failed: {}",
                stderr
            )));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| SublateError::Transcriber("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file)
            .map_err(|e| SublateError::Transcriber(format!("Failed to read whisper output: {}", e)))?;

        let whisper_output: WhisperOutput = serde_json::from_str(&json_content)
            .map_err(|e| SublateError::Transcriber(format!("Failed to parse whisper JSON: {}", e)))?;

        let transcript: Transcript = whisper_output.into();
        info!(
            "Transcription produced {} segments (language: {})",
            transcript.segments.len(),
            transcript.language
        );

        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whisper_output_conversion() {
        let json = r#"{
            "text": " こんにちは。 テストです。",
            "segments": [
                {"start": 0.0, "end": 3.5, "text": " こんにちは。", "tokens": [1, 2], "avg_logprob": -0.2, "no_speech_prob": 0.01},
                {"start": 4.0, "end": 7.0, "text": " テストです。"}
            ],
            "language": "ja"
        }"#;

        let output: WhisperOutput = serde_json::from_str(json).unwrap();
        let transcript: Transcript = output.into();

        assert_eq!(transcript.language, "ja");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].text, "こんにちは。");
        assert_eq!(transcript.segments[1].start, 4.0);
    }

    #[test]
    fn test_missing_language_defaults_to_unknown() {
        let json = r#"{"text": "hi", "segments": [], "language": null}"#;
        let output: WhisperOutput = serde_json::from_str(json).unwrap();
        let transcript: Transcript = output.into();
        assert_eq!(transcript.language, "unknown");
    }
}
