//! Versioned document store abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::StoreResult;

/// Opaque value identifying one exact state of a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wraps a token issued by a backend.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Derives a token from content: lowercase hex SHA-256.
    #[must_use]
    pub fn of_content(content: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(content)))
    }

    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document as read from a store, with the version it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub content: Vec<u8>,
    pub version: VersionToken,
}

/// A single document with compare-and-swap writes.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the name of the backend, for logs.
    fn backend_name(&self) -> &'static str;

    /// Reads the current document and its version.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound) if
    /// the document has never been written.
    async fn fetch(&self) -> StoreResult<Snapshot>;

    /// Replaces the document, provided it is still at `expected`.
    ///
    /// `expected = None` means the caller saw no document; the write then
    /// only succeeds if none exists. Returns the new version on success and
    /// [`StoreError::Conflict`](crate::StoreError::Conflict) if the stored
    /// version differs.
    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken>;
}
