//! Shared Error Types
//!
//! This module defines the error taxonomy for the client. Errors fall into
//! the categories the synchronization layer distinguishes:
//!
//! - `Unauthorized` - missing/invalid credential; the UI prompts for login
//! - `Api` - the backend rejected a call; shown to the user as a toast
//! - `Network` - transport-level failure reaching the backend
//! - `Serialization` - malformed payloads (request bodies, push events)
//! - `Realtime` - broadcaster configuration/connection problems; logged
//!   only, the client degrades to poll-only mode
//!
//! None of these are treated as process-fatal.

use thiserror::Error;

/// Errors surfaced by the API client and the realtime layer
#[derive(Debug, Error, Clone)]
pub enum ClientError {
    /// Missing or rejected session credential
    #[error("not authenticated")]
    Unauthorized,

    /// The backend answered with a non-success status
    #[error("request failed: {status} - {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// The backend could not be reached
    #[error("network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// JSON serialization or deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// Broadcaster transport error
    #[error("realtime error: {message}")]
    Realtime {
        /// Human-readable error message
        message: String,
    },
}

impl ClientError {
    /// Create a new API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new realtime error
    pub fn realtime(message: impl Into<String>) -> Self {
        Self::Realtime {
            message: message.into(),
        }
    }

    /// Whether this error should prompt the user to log in again
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::serialization(format!("Failed to parse response: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error() {
        let error = ClientError::api(404, "conversation not found");
        match error {
            ClientError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "conversation not found");
            }
            _ => panic!("Expected Api error"),
        }
    }

    #[test]
    fn test_error_display() {
        let error = ClientError::network("connection refused");
        let display = format!("{}", error);
        assert!(display.contains("network error"));
        assert!(display.contains("connection refused"));
    }

    #[test]
    fn test_unauthorized_flag() {
        assert!(ClientError::Unauthorized.is_unauthorized());
        assert!(!ClientError::api(500, "boom").is_unauthorized());
    }

    #[test]
    fn test_from_serde_error() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{ invalid }");
        let error: ClientError = result.unwrap_err().into();
        match error {
            ClientError::Serialization { .. } => {}
            _ => panic!("Expected Serialization error from serde error"),
        }
    }
}
