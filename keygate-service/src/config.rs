//! Service configuration.

use keygate_credential::SchemeKind;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`CredentialService`](crate::CredentialService).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Callers allowed to run administrative operations.
    pub admin_ids: Vec<u64>,
    /// Retry behaviour on version conflicts.
    pub retry: RetryPolicy,
    /// Upper bound for a single fetch or commit, in seconds.
    pub store_timeout_secs: u64,
    /// Digest scheme for newly created credentials.
    pub password_scheme: SchemeKind,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            admin_ids: Vec::new(),
            retry: RetryPolicy::default(),
            store_timeout_secs: 20,
            password_scheme: SchemeKind::Legacy,
        }
    }
}

impl ServiceConfig {
    /// Returns the store timeout.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

/// Bounded exponential backoff for conflicting commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Total fetch-mutate-commit attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds.
    pub base_delay_ms: u64,
    /// Cap on any single delay, in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 100,
            max_delay_ms: 2_000,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Doubles per attempt, plus up to `base_delay_ms` of jitter, never
    /// exceeding `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        let backoff = self
            .base_delay_ms
            .saturating_mul(1u64 << exp)
            .min(self.max_delay_ms);
        let jitter = if self.base_delay_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.base_delay_ms)
        };
        Duration::from_millis(backoff.saturating_add(jitter).min(self.max_delay_ms))
    }
}
