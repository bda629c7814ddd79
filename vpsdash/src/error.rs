//! Error type shared by the HTTP client and the stores.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Well-formed reply carrying `success: false`.
    #[error("{}", .0.as_deref().unwrap_or("request rejected"))]
    Rejected(Option<String>),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Server-supplied reason for an application-level rejection, if any.
    pub fn rejection_reason(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(reason) => reason.as_deref(),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
