//! Upload types: submission modes and the relay envelope

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::RelayError;

// ============================================================================
// Target
// ============================================================================

/// Which kind of record a page loads into the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Source,
    Study,
}

impl Target {
    /// Name of the id field, both in the form and on the wire
    pub fn id_field(self) -> &'static str {
        match self {
            Target::Source => "sourceId",
            Target::Study => "studyID",
        }
    }

    /// Database extension plugin serving this target
    pub fn plugin(self) -> &'static str {
        match self {
            Target::Source => "sourceJsons",
            Target::Study => "studyJsons",
        }
    }

    /// Human-readable noun used in banners
    pub fn noun(self) -> &'static str {
        match self {
            Target::Source => "source",
            Target::Study => "study",
        }
    }
}

// ============================================================================
// Upload Request
// ============================================================================

/// A submission, resolved once at the form boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    /// Newick tree uploaded as a file
    FileNewick {
        id: String,
        filename: String,
        bytes: Vec<u8>,
    },

    /// NexSON document fetched from the remote repository
    GitNexson { id: String, revision: String },

    /// NexSON document uploaded as a file (not supported)
    FileNexson {
        id: String,
        filename: String,
        bytes: Vec<u8>,
    },
}

impl UploadRequest {
    pub fn mode(&self) -> &'static str {
        match self {
            UploadRequest::FileNewick { .. } => "newick_from_file",
            UploadRequest::GitNexson { .. } => "nexson_from_git",
            UploadRequest::FileNexson { .. } => "nexson_from_file",
        }
    }
}

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Newick,
    Nexson,
}

/// Normalized payload sent to the database. `id` and `content` are never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    id: String,
    kind: EnvelopeKind,
    content: String,
}

impl Envelope {
    /// The id is trimmed; an empty id or content is `MalformedInput`
    pub fn new(
        id: impl AsRef<str>,
        kind: EnvelopeKind,
        content: impl Into<String>,
    ) -> Result<Self, RelayError> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(RelayError::MalformedInput("an id is required".to_string()));
        }

        let content = content.into();
        if content.is_empty() {
            return Err(RelayError::MalformedInput("content is empty".to_string()));
        }

        Ok(Self {
            id: id.to_string(),
            kind,
            content,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> EnvelopeKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// JSON body expected by the database extension for `target`
    pub fn wire_body(&self, target: Target) -> Value {
        let content_field = match self.kind {
            EnvelopeKind::Newick => "newickString",
            EnvelopeKind::Nexson => "nexsonString",
        };

        let mut body = serde_json::Map::new();
        body.insert(target.id_field().to_string(), json!(self.id));
        body.insert(content_field.to_string(), json!(self.content));
        Value::Object(body)
    }
}
