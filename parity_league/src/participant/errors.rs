//! Participant call error types.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failures of a single request/response exchange with a participant
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum CallError {
    /// No response arrived before the deadline
    #[error("no response within {0:?}")]
    DeadlineExpired(Duration),

    /// The channel to the participant failed
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// The response was not a usable value
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The participant explicitly declined
    #[error("rejected: {0}")]
    Rejected(String),

    /// The exchange broke protocol (out-of-order or duplicate call)
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}

impl CallError {
    /// Whether the participant gave no response at all.
    #[must_use]
    pub fn is_no_response(&self) -> bool {
        matches!(self, Self::DeadlineExpired(_) | Self::ConnectionFailure(_))
    }
}

/// Result type for participant calls
pub type CallResult<T> = Result<T, CallError>;
