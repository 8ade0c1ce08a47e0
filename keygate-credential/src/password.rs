//! Password digests.
//!
//! Two schemes are supported. The legacy scheme is a bare SHA-256 hex digest
//! and is what deployed clients compare against. The Argon2id scheme derives
//! the digest from a per-record salt and cost parameters, all recorded on the
//! credential so verifiers can tell the two apart.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{CredentialError, CredentialResult};

/// Default Argon2id memory cost in KiB.
pub const DEFAULT_M_COST: u32 = 19 * 1024;

/// Default Argon2id time cost (passes).
pub const DEFAULT_T_COST: u32 = 2;

/// Default Argon2id parallelism.
pub const DEFAULT_P_COST: u32 = 1;

/// Salt length in bytes before hex encoding.
const SALT_BYTES: usize = 16;

/// Derived digest length in bytes, same as SHA-256.
const DIGEST_BYTES: usize = 32;

/// Computes the legacy digest: lowercase hex of `SHA-256(password)`.
#[must_use]
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// Which scheme new credentials are hashed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemeKind {
    /// Unsalted single-round SHA-256.
    #[default]
    Legacy,
    /// Argon2id over a per-record salt.
    #[serde(alias = "salted")]
    Argon2id,
}

/// The digest scheme a stored password hash was produced with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PasswordScheme {
    /// `hex(SHA-256(password))`.
    #[default]
    Sha256,
    /// Argon2id (v0x13) with the recorded parameters.
    Argon2id {
        /// Hex-encoded salt.
        salt: String,
        /// Memory cost in KiB.
        m_cost: u32,
        /// Number of passes.
        t_cost: u32,
        /// Degree of parallelism.
        p_cost: u32,
    },
}

impl PasswordScheme {
    /// Builds a fresh scheme of the given kind, drawing a new salt if needed.
    #[must_use]
    pub fn generate(kind: SchemeKind) -> Self {
        match kind {
            SchemeKind::Legacy => Self::Sha256,
            SchemeKind::Argon2id => Self::Argon2id {
                salt: generate_salt(),
                m_cost: DEFAULT_M_COST,
                t_cost: DEFAULT_T_COST,
                p_cost: DEFAULT_P_COST,
            },
        }
    }

    /// Returns true for the unsalted scheme.
    #[must_use]
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Sha256)
    }

    /// Digests `password` under this scheme.
    ///
    /// Fails only for Argon2id parameters the library rejects, which can
    /// come from a hand-edited document.
    pub fn digest(&self, password: &str) -> CredentialResult<String> {
        match self {
            Self::Sha256 => Ok(hash_password(password)),
            Self::Argon2id {
                salt,
                m_cost,
                t_cost,
                p_cost,
            } => argon2id_digest(password, salt, *m_cost, *t_cost, *p_cost),
        }
    }

    /// Checks `password` against a stored digest in constant time.
    pub fn matches(&self, password: &str, stored: &str) -> CredentialResult<bool> {
        let attempt = self.digest(password)?;
        let stored = stored.to_ascii_lowercase();
        Ok(attempt.as_bytes().ct_eq(stored.as_bytes()).into())
    }
}

fn argon2id_digest(
    password: &str,
    salt: &str,
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
) -> CredentialResult<String> {
    let params = Params::new(m_cost, t_cost, p_cost, Some(DIGEST_BYTES))
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; DIGEST_BYTES];
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;

    Ok(hex::encode(out))
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
