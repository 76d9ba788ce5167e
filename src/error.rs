use thiserror::Error;

#[derive(Error, Debug)]
pub enum SublateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Subtitle format error: {0}")]
    Subtitle(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Transcription error: {0}")]
    Transcriber(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, SublateError>;
