//! SQLite-backed document store.
//!
//! Documents live in a `documents` table keyed by name. A commit reads the
//! stored version and writes the new row inside one immediate transaction,
//! so two writers based on the same version cannot both succeed, even from
//! different processes sharing the database file.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Snapshot, VersionToken};

/// Configuration for [`SqliteStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqliteConfig {
    /// Database file.
    pub path: PathBuf,
    /// Row key of the document.
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    "users.json".to_string()
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("keygate.db"),
            key: default_key(),
        }
    }
}

/// Document store backed by a local SQLite database.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    key: String,
}

impl SqliteStore {
    /// Opens (or creates) a store at the configured path.
    pub fn open(config: &SqliteConfig) -> StoreResult<Self> {
        let conn = Connection::open(&config.path)?;
        Self::from_connection(conn, &config.key)
    }

    /// Opens an in-memory store.
    pub fn open_in_memory(key: &str) -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, key)
    }

    fn from_connection(conn: Connection, key: &str) -> StoreResult<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS documents (
                key TEXT PRIMARY KEY,
                content BLOB NOT NULL,
                version TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            key: key.to_string(),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &str) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let key = self.key.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))?;
            f(&mut guard, key.as_str())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("sqlite task failed: {e}")))?
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        self.with_conn(|conn, key| {
            let row = conn
                .query_row(
                    "SELECT content, version FROM documents WHERE key = ?1",
                    params![key],
                    |row| Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()?;

            match row {
                Some((content, version)) => Ok(Snapshot {
                    content,
                    version: VersionToken::new(version),
                }),
                None => Err(StoreError::NotFound(key.to_string())),
            }
        })
        .await
    }

    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        let content = content.to_vec();
        let expected = expected.cloned();

        self.with_conn(move |conn, key| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let current: Option<String> = tx
                .query_row(
                    "SELECT version FROM documents WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;

            if current.as_deref() != expected.as_ref().map(VersionToken::as_str) {
                debug!(key, "sqlite commit rejected");
                return Err(StoreError::Conflict(format!(
                    "{key} is at {}, expected {}",
                    current.as_deref().unwrap_or("<none>"),
                    expected.as_ref().map_or("<none>", VersionToken::as_str),
                )));
            }

            let version = VersionToken::of_content(&content);
            tx.execute(
                "INSERT INTO documents (key, content, version) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET content = excluded.content, version = excluded.version",
                params![key, content, version.as_str()],
            )?;
            tx.commit()?;

            Ok(version)
        })
        .await
    }
}
