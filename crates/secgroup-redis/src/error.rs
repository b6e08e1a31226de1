//! Error types for the rule cache client.

use thiserror::Error;

/// Errors raised by a rule store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backend could not be reached or the connection broke.
    #[error("Redis connection error: {0}")]
    Connection(String),

    /// The backend was reached but rejected the command.
    #[error("Redis command error: {0}")]
    Command(String),
}

impl StoreError {
    /// Returns true for transport-level failures.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Connection(_))
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Command(err.to_string())
        }
    }
}

/// Result type for rule store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the security group client.
#[derive(Debug, Error)]
pub enum SecurityGroupError {
    /// The rule cache is unavailable, so no rules can be pushed through this
    /// client instance.
    #[error("Security groups could not be applied: {reason}")]
    CouldNotBeApplied { reason: String },

    /// A backend operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rule document could not be encoded or decoded.
    #[error("Invalid rule document: {0}")]
    Payload(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SecurityGroupError {
    pub fn could_not_be_applied(reason: impl Into<String>) -> Self {
        Self::CouldNotBeApplied {
            reason: reason.into(),
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SecurityGroupError>;
