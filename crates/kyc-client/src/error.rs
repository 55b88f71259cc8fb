//! Error types for backend API calls.

use thiserror::Error;

/// Maximum number of response-body characters kept in a status error
pub const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("KYC API error {status} on {path}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid API URL '{0}'")]
    InvalidUrl(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Build a status error, truncating the body to keep logs readable.
    pub fn status(path: impl Into<String>, status: u16, body: &str) -> Self {
        Self::Status {
            path: path.into(),
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }

    /// HTTP status code if the backend answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(500);
        let err = ApiError::status("signals", 500, &body);
        match err {
            ApiError::Status { body, .. } => assert_eq!(body.len(), MAX_ERROR_BODY_CHARS),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found() {
        assert!(ApiError::status("signals/x", 404, "").is_not_found());
        assert!(!ApiError::InvalidUrl("::".into()).is_not_found());
    }
}
