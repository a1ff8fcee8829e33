//! Error types for the cycle calculation API client.
//!
//! # Design
//! `Validation` gets a dedicated variant because it is raised before any
//! network activity and is always recoverable by correcting inputs. Server
//! rejections land in `Api` with the status code and the server-provided
//! message so callers can distinguish them from decode failures.

use std::fmt;

use crate::validate::ValidationError;

/// Errors returned by `CycleClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// No API key was configured on the client.
    MissingApiKey,

    /// One or more parameters failed constraint validation; no request
    /// was built.
    Validation(ValidationError),

    /// The server returned a non-success status, with the message from its
    /// error envelope (or the raw body when the envelope is absent).
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MissingApiKey => write!(f, "API key is required"),
            ApiError::Validation(e) => write!(f, "{e}"),
            ApiError::Api { status, message } => {
                write!(f, "API error ({status}): {message}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Validation(e)
    }
}
