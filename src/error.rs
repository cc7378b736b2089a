use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Not found")]
    NotFound,

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request cancelled")]
    Cancelled,
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}
