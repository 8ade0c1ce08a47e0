//! GitHub contents API store.
//!
//! The document is one file on one branch of a repository. Reads return the
//! base64 file content and its blob SHA; writes send the SHA they were based
//! on and GitHub refuses the write if the file has moved on.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{DocumentStore, Snapshot, VersionToken};

/// GitHub store configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// Repository as `owner/name`.
    pub repo: String,
    /// File path inside the repository.
    pub path: String,
    /// Branch the document lives on.
    pub branch: String,
    /// Base URL for the GitHub REST API (e.g. `https://api.github.com`).
    pub api_base_url: String,
    /// Personal access token with contents read/write permission.
    pub token: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Commit message used for every write.
    pub commit_message: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            path: "users.json".to_string(),
            branch: "main".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 15,
            commit_message: "Update users.json via keygate".to_string(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("repo", &self.repo)
            .field("path", &self.path)
            .field("branch", &self.branch)
            .field("api_base_url", &self.api_base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .field("commit_message", &self.commit_message)
            .finish()
    }
}

/// Contents API file response.
#[derive(Debug, Deserialize)]
struct ContentFile {
    sha: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PutResponse {
    content: PutContent,
}

#[derive(Debug, Deserialize)]
struct PutContent {
    sha: String,
}

/// Document store on top of the GitHub contents API.
pub struct GitHubStore {
    config: GitHubConfig,
    client: Client,
}

impl GitHubStore {
    /// Creates a store for the configured file.
    pub fn new(config: GitHubConfig) -> StoreResult<Self> {
        if config.repo.split('/').filter(|p| !p.is_empty()).count() != 2 {
            return Err(StoreError::Config(format!(
                "repo must be 'owner/name', got '{}'",
                config.repo
            )));
        }
        if config.path.trim_matches('/').is_empty() {
            return Err(StoreError::Config("path must not be empty".to_string()));
        }

        if config.token.is_none() {
            warn!(repo = %config.repo, "no GitHub token configured, writes will be refused");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("keygate/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/contents/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.repo,
            self.config.path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl DocumentStore for GitHubStore {
    fn backend_name(&self) -> &'static str {
        "github"
    }

    async fn fetch(&self) -> StoreResult<Snapshot> {
        debug!(repo = %self.config.repo, path = %self.config.path, "fetching document");

        let response = self
            .authorize(self.client.get(self.contents_url()))
            .query(&[("ref", self.config.branch.as_str())])
            .send()
            .await?;

        let status = response.status();
        // Private repositories answer 404 to anonymous requests, so an
        // unauthenticated 404 says nothing about the file.
        if status == StatusCode::NOT_FOUND && self.config.token.is_none() {
            warn!(repo = %self.config.repo, "404 without a token, repository may be private");
            return Err(StoreError::Unavailable(format!(
                "{} answered 404 to an unauthenticated request; set a token",
                self.config.repo
            )));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!(
                "{}:{}@{}",
                self.config.repo, self.config.path, self.config.branch
            )));
        }
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "fetch failed with {status}: {error}"
            )));
        }

        let file: ContentFile = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse contents: {e}")))?;

        if file.encoding.as_deref().is_some_and(|enc| enc != "base64") {
            return Err(StoreError::InvalidResponse(format!(
                "unsupported content encoding '{}'",
                file.encoding.as_deref().unwrap_or_default()
            )));
        }

        // The API wraps base64 at 60 columns.
        let packed: String = file.content.split_whitespace().collect();
        let content = BASE64
            .decode(packed)
            .map_err(|e| StoreError::InvalidResponse(format!("invalid base64 content: {e}")))?;

        Ok(Snapshot {
            content,
            version: VersionToken::new(file.sha),
        })
    }

    async fn commit(
        &self,
        content: &[u8],
        expected: Option<&VersionToken>,
    ) -> StoreResult<VersionToken> {
        debug!(
            path = %self.config.path,
            bytes = content.len(),
            base = ?expected.map(VersionToken::as_str),
            "committing document"
        );

        let body = PutRequest {
            message: &self.config.commit_message,
            content: BASE64.encode(content),
            branch: &self.config.branch,
            sha: expected.map(VersionToken::as_str),
        };

        let response = self
            .authorize(self.client.put(self.contents_url()))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        // 422 on a create means the file appeared since we looked.
        let conflict = status == StatusCode::CONFLICT
            || (status == StatusCode::UNPROCESSABLE_ENTITY && expected.is_none());
        if conflict {
            let error = response.text().await.unwrap_or_default();
            return Err(StoreError::Conflict(format!("{status}: {error}")));
        }
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "commit failed with {status}: {error}"
            )));
        }

        let put: PutResponse = response
            .json()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("failed to parse commit response: {e}")))?;

        info!(path = %self.config.path, sha = %put.content.sha, "document committed");
        Ok(VersionToken::new(put.content.sha))
    }
}
