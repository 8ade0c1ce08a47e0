//! Versioned document stores for keygate.
//!
//! A [`DocumentStore`] holds exactly one opaque document and hands out a
//! [`VersionToken`] with every read. Writes must present the token they were
//! based on; if the document changed in between, the write is rejected with
//! [`StoreError::Conflict`] and the caller re-reads and tries again. The token
//! is the only concurrency control: stores never lock across a read and a
//! write.
//!
//! # Backends
//!
//! - [`GitHubStore`]: one file in a GitHub repository via the contents API.
//!   The token is the git blob SHA the API reports.
//! - [`SqliteStore`]: one row in a local SQLite database, compared and
//!   swapped inside an immediate transaction.
//! - [`MemoryStore`]: process-local, for tests and throwaway setups.

mod error;
mod github;
mod memory;
mod sqlite;
mod store;

pub use error::{StoreError, StoreResult};
pub use github::{GitHubConfig, GitHubStore};
pub use memory::MemoryStore;
pub use sqlite::{SqliteConfig, SqliteStore};
pub use store::{DocumentStore, Snapshot, VersionToken};
