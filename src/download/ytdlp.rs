use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{AudioFetcher, DownloadCommandBuilder};
use crate::config::DownloadConfig;
use crate::error::{Result, SublateError};

/// Audio fetcher backed by yt-dlp
pub struct YtDlpFetcher {
    config: DownloadConfig,
    command_builder: DownloadCommandBuilder,
}

impl YtDlpFetcher {
    pub fn new(config: DownloadConfig) -> Self {
        let command_builder = DownloadCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch_audio(&self, url: &str, output_dir: &Path) -> Result<PathBuf> {
        info!("Downloading audio from {} to {}", url, output_dir.display());

        tokio::fs::create_dir_all(output_dir).await?;

        let command = self.command_builder.download_audio(
            url,
            output_dir,
            self.config.concurrent_fragments,
        );

        // Blocking subprocess; the download can run for a long time
        let stdout = tokio::task::spawn_blocking(move || command.execute())
            .await
            .map_err(|e| SublateError::Download(format!("Download task failed: {}", e)))??;

        // yt-dlp prints the final file path on the last non-empty line
        let file_path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| {
                SublateError::Download("Downloader did not report a file path".to_string())
            })?;

        let path = PathBuf::from(file_path);
        if !path.exists() {
            return Err(SublateError::Download(format!(
                "Downloaded file not found: {}",
                path.display()
            )));
        }

        info!("Audio downloaded: {}", path.display());
        Ok(path)
    }

    fn check_availability(&self) -> Result<()> {
        let version = self.command_builder.version_check().execute()?;
        info!(
            "Downloader available: {} {}",
            self.config.binary_path,
            version.trim()
        );
        Ok(())
    }
}
