//! Relay Dispatcher
//!
//! Routes a parsed submission to the matching normalizer and database
//! endpoint, and reduces the outcome to a [`RelayResult`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::backend::GraphBackend;
use crate::error::RelayError;
use crate::form::{FormFields, Submission, REMOTE_INDEXING};
use crate::remote::RemoteRepository;
use crate::upload::{normalize_file_nexson, normalize_newick, normalize_nexson, Target, UploadRequest};

pub const NO_ACTION: &str = "no action";
pub const INDEXING_REQUESTED: &str = "Remote study indexing requested";

/// Outcome of one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelayResult {
    pub worked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Fields returned by the database
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl RelayResult {
    /// A plain page view: nothing was submitted
    pub fn no_action() -> Self {
        Self {
            worked: false,
            id: None,
            message: Some(NO_ACTION.to_string()),
            details: Map::new(),
        }
    }

    pub fn succeeded(id: impl Into<String>, details: Map<String, Value>) -> Self {
        Self {
            worked: true,
            id: Some(id.into()),
            message: None,
            details,
        }
    }

    /// Success that loaded no record, e.g. an indexing request
    pub fn completed(message: impl Into<String>) -> Self {
        Self {
            worked: true,
            id: None,
            message: Some(message.into()),
            details: Map::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            worked: false,
            id: None,
            message: Some(message.into()),
            details: Map::new(),
        }
    }

    pub fn is_no_action(&self) -> bool {
        !self.worked && self.message.as_deref() == Some(NO_ACTION)
    }
}

impl From<RelayError> for RelayResult {
    fn from(error: RelayError) -> Self {
        RelayResult::failed(error.to_string())
    }
}

/// Dispatches submissions for one page target
#[derive(Clone)]
pub struct Relay {
    remote: Arc<dyn RemoteRepository>,
    backend: Arc<dyn GraphBackend>,
}

impl Relay {
    pub fn new(remote: Arc<dyn RemoteRepository>, backend: Arc<dyn GraphBackend>) -> Self {
        Self { remote, backend }
    }

    /// Trace the received fields, parse them, and dispatch
    pub async fn handle_form(&self, target: Target, form: &FormFields) -> RelayResult {
        trace_fields(target, form);
        self.dispatch(target, Submission::parse(target, form)).await
    }

    pub async fn dispatch(&self, target: Target, submission: Submission) -> RelayResult {
        let request = match submission {
            Submission::None => return RelayResult::no_action(),
            Submission::Invalid(e) => {
                tracing::warn!(page = ?target, error = %e, "Rejected submission");
                return e.into();
            }
            Submission::Request(request) => request,
        };

        let mode = request.mode();
        match self.relay(target, request).await {
            Ok(result) => {
                tracing::info!(page = ?target, mode, id = ?result.id, "Submission relayed");
                result
            }
            Err(e) => {
                tracing::warn!(page = ?target, mode, error = %e, "Submission failed");
                e.into()
            }
        }
    }

    /// Trigger remote study indexing when the search page asks for it
    pub async fn handle_indexing(&self, form: &FormFields) -> RelayResult {
        trace_fields(Target::Study, form);
        if !form.contains(REMOTE_INDEXING) {
            return RelayResult::no_action();
        }

        match self.backend.index_remote_studies().await {
            Ok(()) => RelayResult::completed(INDEXING_REQUESTED),
            Err(e) => {
                tracing::warn!(error = %e, "Remote study indexing failed");
                e.into()
            }
        }
    }

    async fn relay(&self, target: Target, request: UploadRequest) -> Result<RelayResult, RelayError> {
        match request {
            UploadRequest::FileNewick { id, filename, bytes } => {
                tracing::debug!(filename = %filename, size = bytes.len(), "Normalizing newick upload");
                let envelope = normalize_newick(&id, &bytes)?;
                self.backend.put_envelope(target, &envelope).await?;
                Ok(RelayResult::succeeded(envelope.id(), Map::new()))
            }
            UploadRequest::GitNexson { id, revision } => {
                let document = self.remote.fetch_raw(&revision, &id).await?;
                let envelope = normalize_nexson(&id, &document)?;
                let reply = self.backend.put_envelope(target, &envelope).await?;

                let mut details = reply;
                // the local id wins over whatever the database echoes
                details.remove("worked");
                details.remove("id");
                details.remove("message");
                details.remove(target.id_field());
                Ok(RelayResult::succeeded(envelope.id(), details))
            }
            UploadRequest::FileNexson { id, filename, bytes } => {
                match normalize_file_nexson(&id, &filename, &bytes)? {}
            }
        }
    }
}

/// Structured trace of the submitted field names
fn trace_fields(target: Target, form: &FormFields) {
    tracing::info!(
        target: "otu_loader::trace",
        page = ?target,
        fields = ?form.field_names(),
        "Received form"
    );
}
