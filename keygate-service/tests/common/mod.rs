#![allow(dead_code)]

use async_trait::async_trait;
use keygate_service::{CallerId, CredentialService, RetryPolicy, ServiceConfig};
use keygate_store::{DocumentStore, MemoryStore, Snapshot, StoreError, StoreResult, VersionToken};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

pub const ADMIN: CallerId = CallerId(777_857_263_548_497_920);
pub const STRANGER: CallerId = CallerId(42);

pub fn test_config() -> ServiceConfig {
    ServiceConfig {
        admin_ids: vec![ADMIN.0],
        retry: RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
        store_timeout_secs: 5,
        ..Default::default()
    }
}

pub fn service_over(store: Arc<dyn DocumentStore>) -> CredentialService {
    CredentialService::new(store, test_config())
}

/// Parses the memory store's current content as JSON.
pub async fn stored_json(store: &MemoryStore) -> serde_json::Value {
    let snapshot = store.snapshot().await.expect("store has a document");
    serde_json::from_slice(&snapshot.content).unwrap()
}

// ── Test stores ─────────────────────────────────────────────────

/// Holds the first `gated` fetches until all of them have arrived, so the
/// callers start from the same version.
pub struct BarrierStore {
    pub inner: MemoryStore,
    barrier: Barrier,
    gated: AtomicUsize,
}

impl BarrierStore {
    pub fn new(inner: MemoryStore, parties: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(parties),
            gated: AtomicUsize::new(parties),
        }
    }
}

#[async_trait]
impl DocumentStore for BarrierStore {
    fn backend_name(&self) -> &'static str {
        "barrier"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        let result = self.inner.fetch().await;
        let gate = self
            .gated
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if gate {
            self.barrier.wait().await;
        }
        result
    }

    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        self.inner.commit(content, expected).await
    }
}

/// Every commit loses a race.
#[derive(Default)]
pub struct ConflictingStore {
    pub inner: MemoryStore,
    pub commit_attempts: AtomicUsize,
}

#[async_trait]
impl DocumentStore for ConflictingStore {
    fn backend_name(&self) -> &'static str {
        "conflicting"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        self.inner.fetch().await
    }

    async fn commit(&self, _: &[u8], _: Option<&VersionToken>) -> StoreResult<VersionToken> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Conflict("someone else wrote first".to_string()))
    }
}

/// Never answers within any reasonable timeout.
pub struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    fn backend_name(&self) -> &'static str {
        "stalled"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(StoreError::Unavailable("unreachable".to_string()))
    }

    async fn commit(&self, _: &[u8], _: Option<&VersionToken>) -> StoreResult<VersionToken> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(StoreError::Unavailable("unreachable".to_string()))
    }
}

/// Reads normally but never finishes a write.
#[derive(Default)]
pub struct SlowCommitStore {
    pub inner: MemoryStore,
}

#[async_trait]
impl DocumentStore for SlowCommitStore {
    fn backend_name(&self) -> &'static str {
        "slow-commit"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        self.inner.fetch().await
    }

    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        self.inner.commit(content, expected).await
    }
}

/// Fails every call as if the network were down.
#[derive(Default)]
pub struct DownStore {
    pub calls: AtomicUsize,
}

#[async_trait]
impl DocumentStore for DownStore {
    fn backend_name(&self) -> &'static str {
        "down"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn commit(&self, _: &[u8], _: Option<&VersionToken>) -> StoreResult<VersionToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
