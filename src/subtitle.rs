use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{info, warn};

use crate::error::{Result, SublateError};
use crate::transcribe::TranscriptSegment;

/// One timed subtitle record. Timings are stored as integer milliseconds so
/// serialization round-trips are exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleEntry {
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl SubtitleEntry {
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: String) -> Result<Self> {
        if end_ms < start_ms {
            return Err(SublateError::Subtitle(format!(
                "Invalid time range for entry {}: end {} < start {}",
                index, end_ms, start_ms
            )));
        }

        Ok(Self {
            index,
            start_ms,
            end_ms,
            text: text.trim().to_string(),
        })
    }

    /// Format a timestamp in milliseconds as HH:MM:SS,mmm
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Parse an HH:MM:SS,mmm timestamp to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ','][..]).collect();
        if parts.len() != 4 {
            return Err(SublateError::Subtitle(format!(
                "Invalid timestamp format: {}",
                timestamp
            )));
        }

        let field = |s: &str, name: &str| -> Result<u64> {
            s.parse()
                .map_err(|_| SublateError::Subtitle(format!("Failed to parse {}: {}", name, s)))
        };

        let hours = field(parts[0], "hours")?;
        let minutes = field(parts[1], "minutes")?;
        let seconds = field(parts[2], "seconds")?;
        let millis = field(parts[3], "milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SublateError::Subtitle(format!(
                "Invalid time components in timestamp: {}",
                timestamp
            )));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start_ms),
            Self::format_timestamp(self.end_ms)
        )?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of subtitle entries
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubtitleDocument {
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleDocument {
    /// Build timed entries from raw transcription segments. Indices are
    /// assigned 1..N in segment order, timings are truncated to whole
    /// milliseconds, and text is trimmed.
    pub fn from_segments(segments: &[TranscriptSegment]) -> Self {
        let entries = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| SubtitleEntry {
                index: i + 1,
                start_ms: (seg.start.max(0.0) * 1000.0) as u64,
                end_ms: (seg.end.max(0.0) * 1000.0) as u64,
                text: seg.text.trim().to_string(),
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry texts in chronological order
    pub fn texts(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }

    /// Serialize to SRT format
    pub fn to_srt(&self) -> String {
        let mut content = String::new();
        for entry in &self.entries {
            content.push_str(&entry.to_string());
        }
        content
    }

    /// Parse SRT content. Indices are preserved as written so a
    /// serialize/deserialize round-trip is lossless for well-formed input.
    pub fn from_srt(content: &str) -> Result<Self> {
        let mut entries = Vec::new();

        let mut current_index: Option<usize> = None;
        let mut current_times: Option<(u64, u64)> = None;
        let mut current_text = String::new();

        let mut flush = |index: &mut Option<usize>,
                         times: &mut Option<(u64, u64)>,
                         text: &mut String|
         -> Result<()> {
            if let (Some(idx), Some((start_ms, end_ms))) = (index.take(), times.take()) {
                if text.trim().is_empty() {
                    warn!("Skipping subtitle entry {} with empty text", idx);
                } else {
                    entries.push(SubtitleEntry::new(idx, start_ms, end_ms, text.clone())?);
                }
            }
            text.clear();
            Ok(())
        };

        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut current_index, &mut current_times, &mut current_text)?;
                continue;
            }

            if current_index.is_none() && current_text.is_empty() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    current_index = Some(num);
                    continue;
                }
                return Err(SublateError::Subtitle(format!(
                    "Expected entry index at line {}: {}",
                    line_no + 1,
                    trimmed
                )));
            }

            if current_index.is_some() && current_times.is_none() {
                let Some((start, end)) = trimmed.split_once(" --> ") else {
                    return Err(SublateError::Subtitle(format!(
                        "Expected timing line at line {}: {}",
                        line_no + 1,
                        trimmed
                    )));
                };
                current_times = Some((
                    SubtitleEntry::parse_timestamp(start)?,
                    SubtitleEntry::parse_timestamp(end)?,
                ));
                continue;
            }

            if !current_text.is_empty() {
                current_text.push('\n');
            }
            current_text.push_str(trimmed);
        }

        flush(&mut current_index, &mut current_times, &mut current_text)?;

        if entries.is_empty() {
            return Err(SublateError::Subtitle(
                "No subtitle entries found".to_string(),
            ));
        }

        Ok(Self { entries })
    }

    pub async fn read_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SublateError::FileNotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path).await?;
        Self::from_srt(&content)
    }

    pub async fn write_srt_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        info!("Writing SRT file: {}", path.display());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        fs::write(path, self.to_srt()).await?;
        Ok(())
    }
}
