//! Error types for the task API client.
//!
//! # Design
//! Client methods fail only when a request cannot be built or cannot be
//! completed. A response with a 4xx/5xx status is still a successful call.
//! `Unauthorized`, `NotFound` and `Http` exist for callers who opt in via
//! `HttpResponse::error_for_status`.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// The request could not be sent or no response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The base URL could not be parsed, or a path could not be resolved
    /// against it.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The server returned 401.
    #[error("session cookie missing or rejected")]
    Unauthorized,

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned some other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
}

impl ApiError {
    /// `true` when no response was received at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::Http {
            status: 500,
            body: "Cast to ObjectId failed".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 500: Cast to ObjectId failed");
    }

    #[test]
    fn only_transport_is_transport() {
        assert!(ApiError::Transport("dns".to_string()).is_transport());
        assert!(!ApiError::NotFound.is_transport());
        assert!(!ApiError::Unauthorized.is_transport());
    }
}
