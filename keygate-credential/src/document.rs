//! The full username → record mapping, persisted as one JSON blob.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::{CredentialError, CredentialResult};
use crate::record::{validate_username, CredentialRecord};

/// All credentials, keyed by username.
///
/// Keys are kept sorted so that encoding the same records always yields the
/// same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialDocument {
    records: BTreeMap<String, CredentialRecord>,
}

/// A row of [`CredentialDocument::summaries`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSummary {
    pub username: String,
    pub paused: bool,
    pub expiry: String,
}

impl CredentialDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a document. Blank content is an empty document.
    pub fn from_slice(bytes: &[u8]) -> CredentialResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Encodes the document as JSON with four-space indentation.
    pub fn to_vec_pretty(&self) -> CredentialResult<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `username` has a record.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.records.contains_key(username)
    }

    /// Looks up a record.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<&CredentialRecord> {
        self.records.get(username)
    }

    /// Looks up a record for mutation, failing with `NotFound` if absent.
    pub fn get_mut(&mut self, username: &str) -> CredentialResult<&mut CredentialRecord> {
        self.records
            .get_mut(username)
            .ok_or_else(|| CredentialError::NotFound(username.to_string()))
    }

    /// Inserts a new record. Existing usernames are never overwritten.
    pub fn insert(&mut self, username: &str, record: CredentialRecord) -> CredentialResult<()> {
        validate_username(username)?;
        if self.records.contains_key(username) {
            return Err(CredentialError::AlreadyExists(username.to_string()));
        }
        self.records.insert(username.to_string(), record);
        Ok(())
    }

    /// Removes a record, failing with `NotFound` if absent.
    pub fn remove(&mut self, username: &str) -> CredentialResult<CredentialRecord> {
        self.records
            .remove(username)
            .ok_or_else(|| CredentialError::NotFound(username.to_string()))
    }

    /// Iterates over `(username, record)` in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CredentialRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Snapshot of username, pause flag and expiry for every record, sorted
    /// by username.
    #[must_use]
    pub fn summaries(&self) -> Vec<CredentialSummary> {
        self.iter()
            .map(|(username, record)| CredentialSummary {
                username: username.to_string(),
                paused: record.is_paused(),
                expiry: record.expiry().to_string(),
            })
            .collect()
    }
}
