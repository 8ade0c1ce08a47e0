//! Configuration file handling.

use anyhow::{Context, Result};
use keygate_service::ServiceConfig;
use keygate_store::{DocumentStore, GitHubConfig, GitHubStore, SqliteConfig, SqliteStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Environment variable consulted for the GitHub token when the config
/// file does not set one.
pub const TOKEN_ENV: &str = "KEYGATE_GITHUB_TOKEN";

/// Top-level configuration file.
///
/// ```toml
/// [service]
/// admin_ids = [777857263548497920]
///
/// [store]
/// backend = "github"
/// repo = "acme/licenses"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub store: StoreConfig,
}

/// Which backend holds the credential document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StoreConfig {
    Github(GitHubConfig),
    Sqlite(SqliteConfig),
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Github(GitHubConfig::default())
    }
}

impl AppConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Reads the config file and fills the GitHub token from
    /// [`TOKEN_ENV`] if the file left it out.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config file {}", path.display()))?;
        Ok(config.with_env_token(std::env::var(TOKEN_ENV).ok()))
    }

    /// Uses `token` for the GitHub backend unless one is already set.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        if let StoreConfig::Github(github) = &mut self.store {
            if github.token.is_none() {
                github.token = token.filter(|t| !t.is_empty());
            }
        }
        self
    }
}

/// Opens the configured backend.
pub fn open_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Github(github) => {
            info!(repo = %github.repo, path = %github.path, branch = %github.branch, "using GitHub store");
            let store = GitHubStore::new(github.clone()).context("failed to set up GitHub store")?;
            Ok(Arc::new(store))
        }
        StoreConfig::Sqlite(sqlite) => {
            info!(path = %sqlite.path.display(), key = %sqlite.key, "using SQLite store");
            let store = SqliteStore::open(sqlite).with_context(|| {
                format!("failed to open SQLite store at {}", sqlite.path.display())
            })?;
            Ok(Arc::new(store))
        }
    }
}
