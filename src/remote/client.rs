//! Remote repository client trait and its HTTP implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::RemoteConfig;
use crate::error::RelayError;

use super::numeric_entries;

/// Read access to the remote nexsons repository
#[async_trait]
pub trait RemoteRepository: Send + Sync {
    /// Hash of the most recent commit
    async fn latest_revision(&self) -> Result<String, RelayError>;

    /// Numeric file names at `revision`
    async fn list_files(&self, revision: &str) -> Result<Vec<String>, RelayError>;

    /// Raw content of file `id` at `revision`
    async fn fetch_raw(&self, revision: &str, id: &str) -> Result<String, RelayError>;
}

#[derive(Debug, Deserialize)]
struct CommitPage {
    values: Vec<Commit>,
}

#[derive(Debug, Deserialize)]
struct Commit {
    hash: String,
}

/// Code-hosting API client
#[derive(Clone)]
pub struct HostingClient {
    client: reqwest::Client,
    config: RemoteConfig,
}

impl HostingClient {
    pub fn new(client: reqwest::Client, config: RemoteConfig) -> Self {
        Self { client, config }
    }

    async fn get_text(&self, url: &str) -> Result<String, RelayError> {
        tracing::debug!(url = %url, "Fetching from remote repository");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RelayError::UpstreamUnavailable(format!("GET {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(RelayError::UpstreamUnavailable(format!(
                "GET {} returned {}",
                url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RelayError::UpstreamUnavailable(format!("Failed to read {}: {}", url, e)))
    }
}

#[async_trait]
impl RemoteRepository for HostingClient {
    async fn latest_revision(&self) -> Result<String, RelayError> {
        let body = self.get_text(&self.config.commits_url).await?;

        let page: CommitPage = serde_json::from_str(&body).map_err(|e| {
            RelayError::UpstreamUnavailable(format!("Malformed commit list: {}", e))
        })?;

        // listed most recent first
        page.values
            .into_iter()
            .next()
            .map(|commit| commit.hash)
            .ok_or_else(|| RelayError::UpstreamUnavailable("Commit list is empty".to_string()))
    }

    async fn list_files(&self, revision: &str) -> Result<Vec<String>, RelayError> {
        let listing = self.get_text(&self.config.raw_url(revision, "")).await?;
        Ok(numeric_entries(&listing))
    }

    async fn fetch_raw(&self, revision: &str, id: &str) -> Result<String, RelayError> {
        self.get_text(&self.config.raw_url(revision, id)).await
    }
}

/// In-memory repository for tests
#[cfg(test)]
pub struct MockRepository {
    pub revision: Option<String>,
    pub files: Vec<String>,
    pub documents: std::collections::HashMap<String, String>,
    pub fetched: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockRepository {
    pub fn new(revision: &str, files: &[&str]) -> Self {
        Self {
            revision: Some(revision.to_string()),
            files: files.iter().map(|f| f.to_string()).collect(),
            documents: Default::default(),
            fetched: Default::default(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            revision: None,
            files: vec![],
            documents: Default::default(),
            fetched: Default::default(),
        }
    }

    pub fn with_document(mut self, revision: &str, id: &str, content: &str) -> Self {
        self.documents
            .insert(format!("{}/{}", revision, id), content.to_string());
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl RemoteRepository for MockRepository {
    async fn latest_revision(&self) -> Result<String, RelayError> {
        self.revision
            .clone()
            .ok_or_else(|| RelayError::UpstreamUnavailable("mock offline".to_string()))
    }

    async fn list_files(&self, _revision: &str) -> Result<Vec<String>, RelayError> {
        match self.revision {
            Some(_) => Ok(self.files.clone()),
            None => Err(RelayError::UpstreamUnavailable("mock offline".to_string())),
        }
    }

    async fn fetch_raw(&self, revision: &str, id: &str) -> Result<String, RelayError> {
        let key = format!("{}/{}", revision, id);
        self.fetched.lock().unwrap().push(key.clone());
        self.documents
            .get(&key)
            .cloned()
            .ok_or_else(|| RelayError::UpstreamUnavailable(format!("no document at {}", key)))
    }
}
