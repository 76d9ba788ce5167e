// Audio acquisition
//
// Downloading is delegated to an external tool behind the AudioFetcher
// trait. The default implementation shells out to yt-dlp through an abstract
// command builder.

pub mod commands;
pub mod ytdlp;

use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub use commands::*;
pub use ytdlp::*;

use crate::config::DownloadConfig;
use crate::error::Result;

/// Main trait for audio acquisition operations
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Download the audio track of a media URL into `output_dir`, returning
    /// the path of the resulting file
    async fn fetch_audio(&self, url: &str, output_dir: &Path) -> Result<PathBuf>;

    /// Check if the downloader binary is available
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating fetcher instances
pub struct AudioFetcherFactory;

impl AudioFetcherFactory {
    /// Create the default fetcher implementation (yt-dlp based)
    pub fn create_fetcher(config: DownloadConfig) -> Box<dyn AudioFetcher> {
        Box::new(ytdlp::YtDlpFetcher::new(config))
    }
}

/// Replace characters that are invalid in filenames with their fullwidth
/// equivalents, so video titles survive as file names on every platform.
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '<' => '＜',
            '>' => '＞',
            ':' => '：',
            '"' => '＂',
            '/' => '／',
            '\\' => '＼',
            '|' => '｜',
            '?' => '？',
            '*' => '＊',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_every_invalid_character() {
        assert_eq!(
            sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#),
            "a＜b＞c：d＂e／f＼g｜h？i＊j"
        );
    }

    #[test]
    fn test_sanitize_leaves_valid_names_untouched() {
        assert_eq!(sanitize_filename("plain name_01.m4a"), "plain name_01.m4a");
        assert_eq!(sanitize_filename("日本語タイトル"), "日本語タイトル");
    }
}
