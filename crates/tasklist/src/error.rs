//! Error types for the task service client and configuration.

use std::fmt;

use thiserror::Error;

/// Errors returned by a [`TaskService`](crate::TaskService).
///
/// The store annotates these for display but always hands the original
/// value back to the caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request never produced a response (timeout, connection refused, ...).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: ErrorBody },

    /// Success response whose body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request could not be built (bad id or base URL).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ServiceError {
    /// Response body attached to the failure, if the server sent one.
    #[must_use]
    pub fn body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// HTTP status attached to the failure, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this failure came from the transport (timeout, refused, ...).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Raw body of an error response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// No body.
    Empty,
    /// Body that is not JSON.
    Text(String),
    /// Body that parsed as JSON.
    Json(serde_json::Value),
}

impl ErrorBody {
    /// Classify a raw response body.
    #[must_use]
    pub fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "<empty>"),
            Self::Text(text) => write!(f, "{text}"),
            Self::Json(value) => write!(f, "{value}"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable held a value that could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    /// Base URL is not an absolute http(s) URL.
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_classification() {
        assert_eq!(ErrorBody::from_text(String::new()), ErrorBody::Empty);
        assert_eq!(ErrorBody::from_text("  \n".to_string()), ErrorBody::Empty);
        assert_eq!(
            ErrorBody::from_text("Bad Gateway".to_string()),
            ErrorBody::Text("Bad Gateway".to_string())
        );
        assert_eq!(
            ErrorBody::from_text(r#"{"message":"nope"}"#.to_string()),
            ErrorBody::Json(serde_json::json!({ "message": "nope" }))
        );
    }

    #[test]
    fn test_status_error_accessors() {
        let err = ServiceError::Status {
            status: 404,
            body: ErrorBody::Text("missing".to_string()),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some(&ErrorBody::Text("missing".to_string())));
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "API error: 404 - missing");
    }
}
