//! Application state management

use std::sync::Arc;

use crate::backend::{GraphBackend, GraphDbClient};
use crate::config::{Config, HttpConfig};
use crate::html::Templates;
use crate::relay::Relay;
use crate::remote::{HostingClient, RemoteRepository};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Failed to load templates: {0}")]
    Templates(#[from] crate::error::AppError),
}

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    remote: Arc<dyn RemoteRepository>,
    relay: Relay,
    templates: Templates,
}

impl AppState {
    /// Build HTTP clients for the remote repository and the database, and
    /// load the page templates
    pub fn new(config: Config) -> Result<Self, StateError> {
        let client = http_client(&config.http)?;
        let remote: Arc<dyn RemoteRepository> =
            Arc::new(HostingClient::new(client.clone(), config.remote.clone()));
        let backend: Arc<dyn GraphBackend> =
            Arc::new(GraphDbClient::new(client, config.backend.clone()));
        let templates = Templates::load(config.templates.dir.as_deref())?;

        Ok(Self::with_parts(config, remote, backend, templates))
    }

    pub fn with_parts(
        config: Config,
        remote: Arc<dyn RemoteRepository>,
        backend: Arc<dyn GraphBackend>,
        templates: Templates,
    ) -> Self {
        let relay = Relay::new(remote.clone(), backend);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                remote,
                relay,
                templates,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn remote(&self) -> &dyn RemoteRepository {
        self.inner.remote.as_ref()
    }

    pub fn relay(&self) -> &Relay {
        &self.inner.relay
    }

    pub fn templates(&self) -> &Templates {
        &self.inner.templates
    }
}

fn http_client(config: &HttpConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}
