//! Error types for the exguard crate.
//!
//! These cover the crate's own failures only. Exceptions raised by guarded
//! work travel as [`ExceptionPayload`](crate::payload::ExceptionPayload) or as
//! the caller's own error type and never pass through [`GuardError`].

use thiserror::Error;

/// The main error type for exguard operations.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Guard configuration text could not be parsed.
    #[error("Invalid guard configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    /// Guard configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for exguard operations.
pub type GuardResult<T> = Result<T, GuardError>;
