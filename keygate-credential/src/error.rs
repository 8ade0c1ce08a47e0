//! Error types for credential handling.

use thiserror::Error;

/// Credential-specific errors.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// Username or password rejected by validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Expiry string could not be parsed as a timestamp.
    #[error("invalid expiry: {0}")]
    InvalidExpiry(String),

    /// A record with this username already exists.
    #[error("user already exists: {0}")]
    AlreadyExists(String),

    /// No record with this username.
    #[error("user not found: {0}")]
    NotFound(String),

    /// Password digest could not be computed.
    #[error("hashing error: {0}")]
    Hashing(String),

    /// Document JSON is malformed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = Result<T, CredentialError>;
