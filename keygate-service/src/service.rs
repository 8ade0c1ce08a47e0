//! The credential service.

use std::future::Future;
use std::sync::Arc;

use keygate_credential::{
    check_binding, parse_expiry, validate_username, verify_now, BindingCheck,
    CredentialDocument, CredentialRecord, CredentialResult, CredentialSummary, VerifyOutcome,
};
use keygate_store::{DocumentStore, StoreError, StoreResult, VersionToken};
use tracing::{debug, info, warn};

use crate::auth::{AdminAllowList, Authorizer, CallerId};
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult};

/// A document as read at the start of one attempt.
struct Loaded {
    document: CredentialDocument,
    /// `None` when the store had no document yet.
    version: Option<VersionToken>,
    raw: Option<Vec<u8>>,
}

/// Administrative operations on the credential document.
///
/// Holds no document state between calls: every operation reads the
/// current document, applies its change in memory and writes the whole
/// document back conditioned on the version it read.
pub struct CredentialService {
    store: Arc<dyn DocumentStore>,
    authorizer: Arc<dyn Authorizer>,
    config: ServiceConfig,
}

impl CredentialService {
    /// Creates a service that admits the callers listed in `config.admin_ids`.
    pub fn new(store: Arc<dyn DocumentStore>, config: ServiceConfig) -> Self {
        let authorizer = Arc::new(AdminAllowList::new(config.admin_ids.iter().copied()));
        Self::with_authorizer(store, authorizer, config)
    }

    /// Creates a service with a custom authorizer.
    pub fn with_authorizer(
        store: Arc<dyn DocumentStore>,
        authorizer: Arc<dyn Authorizer>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            authorizer,
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ── Mutations ────────────────────────────────────────────────

    /// Adds a credential: unpaused, unbound, password digested once here.
    pub async fn create(
        &self,
        caller: CallerId,
        username: &str,
        password: &str,
        expiry: &str,
    ) -> ServiceResult<()> {
        self.authorize(caller)?;
        validate_username(username)?;
        let record = CredentialRecord::new(password, expiry, self.config.password_scheme)?;

        self.mutate("create", |doc| doc.insert(username, record.clone()))
            .await?;
        info!(username, "credential created");
        Ok(())
    }

    /// Removes a credential.
    pub async fn delete(&self, caller: CallerId, username: &str) -> ServiceResult<()> {
        self.authorize(caller)?;
        require_username(username)?;

        self.mutate("delete", |doc| doc.remove(username).map(|_| ()))
            .await?;
        info!(username, "credential deleted");
        Ok(())
    }

    /// Suspends logins for a credential.
    pub async fn pause(&self, caller: CallerId, username: &str) -> ServiceResult<()> {
        self.authorize(caller)?;
        require_username(username)?;

        self.mutate("pause", |doc| {
            doc.get_mut(username)?.pause();
            Ok(())
        })
        .await?;
        info!(username, "credential paused");
        Ok(())
    }

    /// Resumes logins for a credential.
    pub async fn unpause(&self, caller: CallerId, username: &str) -> ServiceResult<()> {
        self.authorize(caller)?;
        require_username(username)?;

        self.mutate("unpause", |doc| {
            doc.get_mut(username)?.unpause();
            Ok(())
        })
        .await?;
        info!(username, "credential unpaused");
        Ok(())
    }

    /// Clears a credential's hardware binding.
    pub async fn reset_hwid(&self, caller: CallerId, username: &str) -> ServiceResult<()> {
        self.authorize(caller)?;
        require_username(username)?;

        self.mutate("reset_hwid", |doc| {
            doc.get_mut(username)?.reset_hwid();
            Ok(())
        })
        .await?;
        info!(username, "hardware binding reset");
        Ok(())
    }

    /// Replaces a credential's expiry.
    pub async fn extend(&self, caller: CallerId, username: &str, expiry: &str) -> ServiceResult<()> {
        self.authorize(caller)?;
        require_username(username)?;
        parse_expiry(expiry)?;

        self.mutate("extend", |doc| doc.get_mut(username)?.set_expiry(expiry))
            .await?;
        info!(username, expiry, "credential expiry changed");
        Ok(())
    }

    // ── Queries ──────────────────────────────────────────────────

    /// Username, pause flag and expiry of every credential, by username.
    pub async fn list(&self, caller: CallerId) -> ServiceResult<Vec<CredentialSummary>> {
        self.authorize(caller)?;
        Ok(self.load().await?.document.summaries())
    }

    /// Number of credentials.
    pub async fn count(&self, caller: CallerId) -> ServiceResult<usize> {
        self.authorize(caller)?;
        Ok(self.load().await?.document.len())
    }

    /// Reads the published document. Needs no administrator rights.
    pub async fn fetch_document(&self) -> ServiceResult<CredentialDocument> {
        Ok(self.load().await?.document)
    }

    /// Runs the client login check against the current document.
    pub async fn verify(&self, username: &str, password: &str) -> ServiceResult<VerifyOutcome> {
        let document = self.fetch_document().await?;
        Ok(verify_now(&document, username, password))
    }

    /// [`verify`](Self::verify) plus how `device_id` relates to the stored
    /// hardware binding. The binding is `None` for unknown usernames.
    pub async fn verify_device(
        &self,
        username: &str,
        password: &str,
        device_id: &str,
    ) -> ServiceResult<(VerifyOutcome, Option<BindingCheck>)> {
        let document = self.fetch_document().await?;
        let outcome = verify_now(&document, username, password);
        let binding = document
            .get(username)
            .map(|record| check_binding(record, device_id));
        Ok((outcome, binding))
    }

    // ── Internals ────────────────────────────────────────────────

    fn authorize(&self, caller: CallerId) -> ServiceResult<()> {
        if self.authorizer.is_admin(caller) {
            Ok(())
        } else {
            warn!(%caller, "rejected non-admin caller");
            Err(ServiceError::Unauthorized(caller))
        }
    }

    async fn timed<T>(&self, fut: impl Future<Output = StoreResult<T>>) -> StoreResult<T> {
        tokio::time::timeout(self.config.store_timeout(), fut)
            .await
            .unwrap_or_else(|_| Err(StoreError::Timeout))
    }

    async fn load(&self) -> ServiceResult<Loaded> {
        match self.timed(self.store.fetch()).await {
            Ok(snapshot) => {
                let document = CredentialDocument::from_slice(&snapshot.content)?;
                debug!(
                    backend = self.store.backend_name(),
                    version = %snapshot.version,
                    records = document.len(),
                    "document fetched"
                );
                Ok(Loaded {
                    document,
                    version: Some(snapshot.version),
                    raw: Some(snapshot.content),
                })
            }
            Err(e) if e.is_not_found() => {
                debug!(backend = self.store.backend_name(), "no document yet, starting empty");
                Ok(Loaded {
                    document: CredentialDocument::new(),
                    version: None,
                    raw: None,
                })
            }
            Err(e) => {
                warn!(backend = self.store.backend_name(), error = %e, "fetch failed");
                Err(e.into())
            }
        }
    }

    /// Fetch, apply, commit; repeated from a fresh fetch on version conflicts.
    ///
    /// `apply` runs once per attempt against that attempt's document. An
    /// error from `apply` ends the operation without writing.
    async fn mutate<F>(&self, op: &'static str, mut apply: F) -> ServiceResult<()>
    where
        F: FnMut(&mut CredentialDocument) -> CredentialResult<()>,
    {
        let max_attempts = self.config.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let Loaded {
                mut document,
                version,
                raw,
            } = self.load().await?;

            apply(&mut document)?;
            let content = document.to_vec_pretty()?;

            if raw.as_deref() == Some(content.as_slice()) {
                debug!(op, "document unchanged, nothing to commit");
                return Ok(());
            }

            match self.timed(self.store.commit(&content, version.as_ref())).await {
                Ok(new_version) => {
                    debug!(op, attempt, version = %new_version, "commit accepted");
                    return Ok(());
                }
                Err(e) if e.is_conflict() => {
                    if attempt >= max_attempts {
                        warn!(op, attempt, "giving up after repeated version conflicts");
                        return Err(ServiceError::Conflict { attempts: attempt });
                    }
                    let delay = self.config.retry.delay_for(attempt);
                    warn!(
                        op,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "version conflict, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    warn!(op, error = %e, "commit failed");
                    return Err(e.into());
                }
            }
        }
    }
}

fn require_username(username: &str) -> ServiceResult<()> {
    if username.trim().is_empty() {
        return Err(ServiceError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    Ok(())
}
