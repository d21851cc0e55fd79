use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single API round trip.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure, including timeouts
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx reply. `message` is the backend's `{error}` text when the body had one.
    #[error("server returned {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    Shape(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Build a status error, extracting `{"error": "..."}` from the body if present.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        Self::Status { status, message }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Message to show the user: the backend's own text, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => message.clone(),
            _ => fallback.to_string(),
        }
    }
}
