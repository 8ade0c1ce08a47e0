//! Error types for credential administration.

use keygate_credential::CredentialError;
use keygate_store::StoreError;
use thiserror::Error;

use crate::auth::CallerId;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by [`CredentialService`](crate::CredentialService).
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller is not an administrator. Raised before any store access.
    #[error("caller {0} is not an administrator")]
    Unauthorized(CallerId),

    /// Malformed username, password or expiry. Raised before any store access.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No credential with this username.
    #[error("user not found: {0}")]
    NotFound(String),

    /// A credential with this username already exists.
    #[error("user already exists: {0}")]
    AlreadyExists(String),

    /// Every attempt lost a race with another writer.
    #[error("document changed concurrently, gave up after {attempts} attempts")]
    Conflict { attempts: u32 },

    /// The store could not be reached, refused us, or timed out.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// The stored document could not be decoded.
    #[error("stored document is corrupt: {0}")]
    CorruptDocument(String),
}

impl From<CredentialError> for ServiceError {
    fn from(e: CredentialError) -> Self {
        match e {
            CredentialError::InvalidInput(msg) | CredentialError::InvalidExpiry(msg) => {
                ServiceError::InvalidInput(msg)
            }
            CredentialError::AlreadyExists(user) => ServiceError::AlreadyExists(user),
            CredentialError::NotFound(user) => ServiceError::NotFound(user),
            CredentialError::Hashing(msg) => ServiceError::CorruptDocument(msg),
            CredentialError::Serialization(e) => ServiceError::CorruptDocument(e.to_string()),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(_) => ServiceError::Conflict { attempts: 1 },
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
            StoreError::InvalidResponse(msg) => ServiceError::StoreUnavailable(format!(
                "invalid response from store: {msg}"
            )),
            other => ServiceError::StoreUnavailable(other.to_string()),
        }
    }
}
