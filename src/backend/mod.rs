//! Graph database relay client
//!
//! Posts envelopes to the database extension endpoints and triggers remote
//! study indexing.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::{Map, Value};

use crate::config::BackendConfig;
use crate::error::RelayError;
use crate::upload::{Envelope, Target};

/// Write access to the graph database
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Store an envelope, returning the fields of the database's reply
    async fn put_envelope(
        &self,
        target: Target,
        envelope: &Envelope,
    ) -> Result<Map<String, Value>, RelayError>;

    /// Ask the database to index the public remote studies
    async fn index_remote_studies(&self) -> Result<(), RelayError>;
}

#[derive(Clone)]
pub struct GraphDbClient {
    client: reqwest::Client,
    config: BackendConfig,
}

impl GraphDbClient {
    pub fn new(client: reqwest::Client, config: BackendConfig) -> Self {
        Self { client, config }
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<String, RelayError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "*/*")
            .json(body)
            .send()
            .await
            .map_err(|e| RelayError::TransportError(format!("POST {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RelayError::TransportError(format!(
                "POST {} returned {}: {}",
                url, status, body
            )));
        }

        response
            .text()
            .await
            .map_err(|e| RelayError::TransportError(format!("Failed to read reply from {}: {}", url, e)))
    }
}

#[async_trait]
impl GraphBackend for GraphDbClient {
    async fn put_envelope(
        &self,
        target: Target,
        envelope: &Envelope,
    ) -> Result<Map<String, Value>, RelayError> {
        let url = self.config.put_url(target, envelope.kind());
        let body = envelope.wire_body(target);

        tracing::debug!(
            url = %url,
            id = %envelope.id(),
            kind = ?envelope.kind(),
            size = envelope.content().len(),
            "Relaying envelope to database"
        );

        let reply = self.post_json(&url, &body).await?;
        decode_reply(&reply).map_err(|e| {
            tracing::warn!(url = %url, id = %envelope.id(), error = %e, "Database rejected envelope");
            e
        })
    }

    async fn index_remote_studies(&self) -> Result<(), RelayError> {
        let url = self.config.index_remote_studies_url();
        tracing::info!(url = %url, "Requesting remote study indexing");

        self.post_json(&url, &Value::Object(Map::new())).await?;
        Ok(())
    }
}

/// Read the database's reply as an object.
///
/// Extensions returning a string have it JSON-encoded once more, so a
/// string holding an object is unwrapped. An empty or `null` reply carries
/// no fields. Any other text is the extension reporting a failure with a
/// success status, as is an object whose `worked` is `false`, `0` or `null`.
pub fn decode_reply(reply: &str) -> Result<Map<String, Value>, RelayError> {
    if reply.trim().is_empty() {
        return Ok(Map::new());
    }

    let fields = match serde_json::from_str::<Value>(reply) {
        Ok(Value::Null) => return Ok(Map::new()),
        Ok(Value::Object(fields)) => fields,
        Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
            Ok(Value::Object(fields)) => fields,
            _ => return Err(RelayError::Rejected(inner)),
        },
        _ => return Err(RelayError::Rejected(reply.trim().to_string())),
    };

    let failed = match fields.get("worked") {
        Some(Value::Bool(worked)) => !worked,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Null) => true,
        _ => false,
    };
    if failed {
        return Err(RelayError::Rejected(reply.trim().to_string()));
    }

    Ok(fields)
}

/// Recording backend for tests
#[cfg(test)]
pub struct MockBackend {
    pub reply: Map<String, Value>,
    pub fail: bool,
    pub calls: std::sync::Mutex<Vec<(Target, Envelope)>>,
    pub index_calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            reply: Map::new(),
            fail: false,
            calls: Default::default(),
            index_calls: Default::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn with_reply(reply: Value) -> Self {
        Self {
            reply: reply.as_object().cloned().unwrap_or_default(),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<(Target, Envelope)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl GraphBackend for MockBackend {
    async fn put_envelope(
        &self,
        target: Target,
        envelope: &Envelope,
    ) -> Result<Map<String, Value>, RelayError> {
        if self.fail {
            return Err(RelayError::TransportError("mock offline".to_string()));
        }
        self.calls.lock().unwrap().push((target, envelope.clone()));
        Ok(self.reply.clone())
    }

    async fn index_remote_studies(&self) -> Result<(), RelayError> {
        if self.fail {
            return Err(RelayError::TransportError("mock offline".to_string()));
        }
        self.index_calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        Ok(())
    }
}
