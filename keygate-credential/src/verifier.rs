//! Client-side login verification against a published document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::CredentialDocument;
use crate::record::CredentialRecord;

/// Result of checking a login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerifyOutcome {
    LoginSuccess,
    InvalidUsername,
    AccountPaused,
    AccountExpired,
    WrongPassword,
    /// The stored expiry or password scheme is unusable.
    MalformedRecord,
}

impl VerifyOutcome {
    /// Returns true only for [`VerifyOutcome::LoginSuccess`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::LoginSuccess)
    }

    /// Status line shown to the person logging in.
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "Login success",
            Self::InvalidUsername => "Invalid username",
            Self::AccountPaused => "Account paused",
            Self::AccountExpired => "Account expired",
            Self::WrongPassword => "Wrong password",
            Self::MalformedRecord => "Server error",
        }
    }
}

/// Checks a login attempt at instant `now`.
///
/// Checks run in a fixed order: unknown username, paused, expired (strictly
/// after the expiry instant), then password. The first failing check wins.
#[must_use]
pub fn verify(
    document: &CredentialDocument,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> VerifyOutcome {
    let Some(record) = document.get(username) else {
        return VerifyOutcome::InvalidUsername;
    };

    if record.is_paused() {
        return VerifyOutcome::AccountPaused;
    }

    match record.expires_at() {
        Ok(expires_at) if now > expires_at => return VerifyOutcome::AccountExpired,
        Ok(_) => {}
        Err(_) => return VerifyOutcome::MalformedRecord,
    }

    match record.password_matches(password) {
        Ok(true) => VerifyOutcome::LoginSuccess,
        Ok(false) => VerifyOutcome::WrongPassword,
        Err(_) => VerifyOutcome::MalformedRecord,
    }
}

/// [`verify`] against the local clock.
#[must_use]
pub fn verify_now(document: &CredentialDocument, username: &str, password: &str) -> VerifyOutcome {
    verify(document, username, password, Utc::now())
}

/// How a device relates to a record's hardware binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingCheck {
    /// No device bound yet; the client may bind this one.
    Unbound,
    /// Bound to this device.
    Matches,
    /// Bound to a different device.
    Mismatch,
}

/// Compares `device_id` with the record's binding. Read-only.
#[must_use]
pub fn check_binding(record: &CredentialRecord, device_id: &str) -> BindingCheck {
    match record.hwid() {
        None => BindingCheck::Unbound,
        Some(bound) if bound == device_id => BindingCheck::Matches,
        Some(_) => BindingCheck::Mismatch,
    }
}
