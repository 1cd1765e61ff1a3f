//! Flickrer error handling
//!
//! The `Display` text of each variant is exactly what ends up in the
//! published `FeedState::error` field.

use serde::Serialize;
use thiserror::Error;

/// Application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Connection, timeout or other transport failure
    #[error("{0}")]
    Transport(String),

    /// Response body could not be decoded
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-OK HTTP status, independent of body content
    #[error("HTTP {0}")]
    Status(u16),

    /// HTTP OK but the service reported `stat != "ok"`
    #[error("Error: {0}")]
    Service(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl AppError {
    /// Whether the failure happened before a decodable response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Decode(_))
    }

    /// Whether the service answered but reported a failure.
    pub fn is_logical(&self) -> bool {
        matches!(self, AppError::Status(_) | AppError::Service(_))
    }
}

#[cfg(feature = "http-client")]
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Transport(format!("request timed out: {err}"))
        } else if err.is_connect() {
            AppError::Transport(format!("connection failed: {err}"))
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

/// Error wrapper returned across the FFI boundary
#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        let code = match &err {
            AppError::Transport(_) => "E_TRANSPORT",
            AppError::Decode(_) => "E_DECODE",
            AppError::Status(_) => "E_HTTP_STATUS",
            AppError::Service(_) => "E_SERVICE",
            AppError::Io(_) => "E_IO",
            AppError::Config(_) => "E_CONFIG",
            AppError::General(_) => "E_GENERAL",
        };

        CommandError {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result alias
pub type AppResult<T> = Result<T, AppError>;
