use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `TASKS_API_URL` and `TASKS_API_TIMEOUT_SECS`, falling back to defaults.
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_vars(
            env::var("TASKS_API_URL").ok(),
            env::var("TASKS_API_TIMEOUT_SECS").ok(),
        )
    }

    fn from_vars(url: Option<String>, timeout: Option<String>) -> Result<Self, AppError> {
        let base_url = url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(AppError::Config("TASKS_API_URL is empty".to_string()));
        }

        let timeout_secs = match timeout {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("TASKS_API_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url: normalize_base_url(&base_url),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// A bare `host:port` gets an `http://` scheme; trailing slashes are dropped.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}
