//! Credential records and login verification for keygate.
//!
//! A credential is a lightweight license for a client application: a
//! username, a password digest, an expiry, a pause flag and an optional
//! hardware binding. All credentials live in one [`CredentialDocument`],
//! which is published as a single JSON blob and read by clients.
//!
//! # Document Format
//!
//! ```json
//! {
//!     "alice": {
//!         "passwordHash": "fcf730b6...",
//!         "expiry": "2030-01-01",
//!         "paused": false,
//!         "hwid": null
//!     }
//! }
//! ```
//!
//! Records written with the Argon2id scheme carry an extra `scheme` object;
//! legacy records omit it. Keys the record type does not know about are kept
//! as they are when the document is rewritten.
//!
//! # Verification
//!
//! [`verify`] is the read-side algorithm clients run against a fetched
//! document. The order of checks (username, paused, expiry, password) is
//! part of the contract.

mod device;
mod document;
mod error;
mod expiry;
mod password;
mod record;
mod verifier;

pub use device::DeviceFingerprint;
pub use document::{CredentialDocument, CredentialSummary};
pub use error::{CredentialError, CredentialResult};
pub use expiry::parse_expiry;
pub use password::{
    hash_password, PasswordScheme, SchemeKind, DEFAULT_M_COST, DEFAULT_P_COST, DEFAULT_T_COST,
};
pub use record::{validate_password, validate_username, CredentialRecord, MAX_USERNAME_LEN};
pub use verifier::{check_binding, verify, verify_now, BindingCheck, VerifyOutcome};
