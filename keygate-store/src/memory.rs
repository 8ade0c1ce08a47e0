//! In-process document store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Snapshot, VersionToken};

/// A document held in memory. Versions are content hashes, like the
/// remote backends.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<Option<Snapshot>>,
    fetches: AtomicU64,
    commits: AtomicU64,
}

impl MemoryStore {
    /// Creates a store with no document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `content`.
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        let version = VersionToken::of_content(&content);
        Self {
            state: Mutex::new(Some(Snapshot { content, version })),
            ..Self::default()
        }
    }

    /// Returns the current document without counting as a fetch.
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.state.lock().await.clone()
    }

    /// Number of `fetch` calls served.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of successful commits.
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.state
            .lock()
            .await
            .clone()
            .ok_or_else(|| StoreError::NotFound("memory document".to_string()))
    }

    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        let mut state = self.state.lock().await;
        let current = state.as_ref().map(|s| &s.version);

        if current != expected {
            debug!(
                current = ?current.map(VersionToken::as_str),
                expected = ?expected.map(VersionToken::as_str),
                "memory commit rejected"
            );
            return Err(StoreError::Conflict(format!(
                "document is at {}, expected {}",
                current.map_or("<none>", VersionToken::as_str),
                expected.map_or("<none>", VersionToken::as_str),
            )));
        }

        let version = VersionToken::of_content(content);
        *state = Some(Snapshot {
            content: content.to_vec(),
            version: version.clone(),
        });
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(version)
    }
}
