use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{Result, SublateError};

/// Abstract external-tool invocation
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl ToolCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    /// Add an argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|s| s.into()));
        self
    }

    /// Execute the command and return its stdout
    pub fn execute(&self) -> Result<String> {
        debug!(
            "Executing tool command: {} {:?}",
            self.binary_path, self.args
        );

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .map_err(|e| {
                SublateError::Download(format!("Failed to execute {}: {}", self.binary_path, e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SublateError::Download(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Builder for yt-dlp invocations
pub struct DownloadCommandBuilder {
    binary_path: String,
}

impl DownloadCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Build the audio download command. The final file path is printed on
    /// stdout so the caller can locate the downloaded file.
    pub fn download_audio<P: AsRef<Path>>(
        &self,
        url: &str,
        output_dir: P,
        concurrent_fragments: u32,
    ) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Audio download")
            .arg("--format")
            .arg("bestaudio/best")
            .arg("--extract-audio")
            .arg("--audio-quality")
            .arg("0")
            .arg("--concurrent-fragments")
            .arg(concurrent_fragments.to_string())
            .arg("--output")
            .arg("[%(id)s]%(title)s_audio.%(ext)s")
            .arg("--paths")
            .arg(output_dir.as_ref().to_string_lossy().to_string())
            .arg("--no-simulate")
            .arg("--print")
            .arg("after_move:filepath")
            .arg(url)
    }

    /// Build the version check command
    pub fn version_check(&self) -> ToolCommand {
        ToolCommand::new(&self.binary_path, "Version check").arg("--version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_command_args() {
        let builder = DownloadCommandBuilder::new("yt-dlp");
        let cmd = builder.download_audio("https://example.com/watch?v=abc", "_temp_audio", 8);

        assert_eq!(cmd.binary_path, "yt-dlp");
        assert!(cmd.args.contains(&"bestaudio/best".to_string()));
        assert!(cmd.args.contains(&"--extract-audio".to_string()));
        assert!(cmd.args.contains(&"_temp_audio".to_string()));
        assert!(cmd.args.contains(&"8".to_string()));
        // URL must come last
        assert_eq!(
            cmd.args.last().unwrap(),
            "https://example.com/watch?v=abc"
        );
    }

    #[test]
    fn test_version_check_args() {
        let cmd = DownloadCommandBuilder::new("yt-dlp").version_check();
        assert_eq!(cmd.args, vec!["--version"]);
    }
}
