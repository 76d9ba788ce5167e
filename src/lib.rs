//! Sublate - Media Localization Pipeline
//!
//! Downloads audio from a video URL with yt-dlp, transcribes speech to
//! timestamped subtitles with whisper, and machine-translates the subtitle
//! text with an Ollama-served model while preserving timing and entry count.

pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod subtitle;
pub mod transcribe;
pub mod translate;
