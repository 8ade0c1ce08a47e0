//! A single user's credential.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CredentialError, CredentialResult};
use crate::expiry::parse_expiry;
use crate::password::{PasswordScheme, SchemeKind};

/// Longest username accepted on creation.
pub const MAX_USERNAME_LEN: usize = 64;

/// One user's stored auth state.
///
/// The username is the key under which the record lives in its
/// [`CredentialDocument`](crate::CredentialDocument). The password digest is
/// fixed at creation; only `paused`, `hwid` and `expiry` change afterwards.
///
/// Older documents keep the digest under `password`. A record read that way
/// is written back the same way, and unknown keys are carried through a
/// rewrite untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
    #[serde(rename = "password", default, skip_serializing_if = "Option::is_none")]
    legacy_password_hash: Option<String>,
    expiry: String,
    #[serde(default)]
    paused: bool,
    #[serde(default)]
    hwid: Option<String>,
    #[serde(default, skip_serializing_if = "PasswordScheme::is_legacy")]
    scheme: PasswordScheme,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl CredentialRecord {
    /// Creates a fresh record: unpaused, unbound, digest computed once from
    /// `password`.
    ///
    /// The expiry string is validated but stored exactly as given.
    pub fn new(password: &str, expiry: &str, kind: SchemeKind) -> CredentialResult<Self> {
        validate_password(password)?;
        parse_expiry(expiry)?;

        let scheme = PasswordScheme::generate(kind);
        Ok(Self {
            password_hash: Some(scheme.digest(password)?),
            legacy_password_hash: None,
            expiry: expiry.to_string(),
            paused: false,
            hwid: None,
            scheme,
            extra: Map::new(),
        })
    }

    /// Returns the stored hex digest, or `""` if the record has none.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password_hash
            .as_deref()
            .or(self.legacy_password_hash.as_deref())
            .unwrap_or_default()
    }

    /// Returns the expiry exactly as stored.
    #[must_use]
    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    /// Parses the stored expiry.
    pub fn expires_at(&self) -> CredentialResult<DateTime<Utc>> {
        parse_expiry(&self.expiry)
    }

    /// Returns true if logins are suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns the bound device id, if any.
    #[must_use]
    pub fn hwid(&self) -> Option<&str> {
        self.hwid.as_deref()
    }

    /// Returns the digest scheme.
    #[must_use]
    pub fn scheme(&self) -> &PasswordScheme {
        &self.scheme
    }

    /// Checks a plaintext password against the stored digest. Fails if the
    /// recorded scheme parameters are unusable.
    pub fn password_matches(&self, password: &str) -> CredentialResult<bool> {
        if self.password_hash().is_empty() {
            return Err(CredentialError::Hashing(
                "record has no password digest".to_string(),
            ));
        }
        self.scheme.matches(password, self.password_hash())
    }

    /// Keys stored on the record that this type does not interpret.
    #[must_use]
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Suspends logins.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resumes logins.
    pub fn unpause(&mut self) {
        self.paused = false;
    }

    /// Clears the hardware binding so the next login may bind again.
    pub fn reset_hwid(&mut self) {
        self.hwid = None;
    }

    /// Binds the record to a device. Clients do this on first login.
    pub fn bind_hwid(&mut self, device_id: impl Into<String>) {
        self.hwid = Some(device_id.into());
    }

    /// Replaces the expiry after validating it.
    pub fn set_expiry(&mut self, expiry: &str) -> CredentialResult<()> {
        parse_expiry(expiry)?;
        self.expiry = expiry.to_string();
        Ok(())
    }
}

/// Rejects empty, overlong or control-character usernames.
pub fn validate_username(username: &str) -> CredentialResult<()> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    if trimmed != username {
        return Err(CredentialError::InvalidInput(
            "username must not have leading or trailing whitespace".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(CredentialError::InvalidInput(format!(
            "username longer than {MAX_USERNAME_LEN} characters"
        )));
    }
    if username.chars().any(char::is_control) {
        return Err(CredentialError::InvalidInput(
            "username contains control characters".to_string(),
        ));
    }
    Ok(())
}

/// Rejects empty passwords.
pub fn validate_password(password: &str) -> CredentialResult<()> {
    if password.is_empty() {
        return Err(CredentialError::InvalidInput(
            "password must not be empty".to_string(),
        ));
    }
    Ok(())
}
