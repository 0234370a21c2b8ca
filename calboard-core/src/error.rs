//! Error types for calboard.

use thiserror::Error;

use crate::form::ValidationErrors;
use crate::wire::FieldRejection;

/// Errors that can occur in calboard operations.
#[derive(Error, Debug, Clone)]
pub enum CalboardError {
    /// The store sent a timestamp that is not ISO-8601. Indicates a data bug on the
    /// store side, so it is surfaced and never retried.
    #[error("Malformed timestamp in '{field}': {value:?}")]
    MalformedTimestamp { field: &'static str, value: String },

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Event store rejected the request ({status}): {message}")]
    RemoteRejection {
        status: u16,
        message: String,
        field_errors: Vec<FieldRejection>,
    },

    #[error("Invalid event: {0}")]
    Validation(ValidationErrors),

    #[error("Unexpected response from event store: {0}")]
    MalformedResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalboardError {
    /// Failures that come from talking to the store (as opposed to local input or data).
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            CalboardError::NetworkFailure(_) | CalboardError::RemoteRejection { .. }
        )
    }
}

impl From<reqwest::Error> for CalboardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CalboardError::MalformedResponse(e.to_string())
        } else {
            CalboardError::NetworkFailure(e.to_string())
        }
    }
}

impl From<ValidationErrors> for CalboardError {
    fn from(e: ValidationErrors) -> Self {
        CalboardError::Validation(e)
    }
}

/// Result type alias for calboard operations.
pub type CalboardResult<T> = Result<T, CalboardError>;
