//! Form boundary
//!
//! Collects a multipart submission into [`FormFields`] and resolves it into
//! a [`Submission`] exactly once, before anything is dispatched.

use axum::extract::Multipart;

use crate::error::{AppError, RelayError};
use crate::upload::{Target, UploadRequest};

pub const NEWICK_FROM_FILE: &str = "hidden_newick_from_file";
pub const NEXSON_FROM_GIT: &str = "hidden_nexson_from_git";
pub const NEXSON_FROM_FILE: &str = "hidden_nexson_from_file";
pub const REMOTE_INDEXING: &str = "init_remote_indexing_flag";

const FILE_FIELD: &str = "file";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File { filename: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
}

/// Submitted fields in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<FormField>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.push(name, FieldValue::Text(value.to_string()));
        self
    }

    pub fn with_file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.push(
            name,
            FieldValue::File {
                filename: filename.to_string(),
                bytes: bytes.to_vec(),
            },
        );
        self
    }

    pub fn push(&mut self, name: &str, value: FieldValue) {
        self.fields.push(FormField {
            name: name.to_string(),
            value,
        });
    }

    /// Drain a multipart stream. A field with a filename is kept as a file.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = FormFields::new();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::error!("Failed to read multipart field: {}", e);
            AppError::BadRequest(format!("Failed to read upload: {}", e))
        })? {
            let name = field.name().unwrap_or("").to_string();
            let filename = field.file_name().map(|s| s.to_string());

            let value = match filename {
                Some(filename) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        tracing::error!("Failed to read file data: {}", e);
                        AppError::BadRequest(format!("Failed to read file data: {}", e))
                    })?;
                    tracing::debug!(field = %name, filename = %filename, size = bytes.len(), "Received file field");
                    FieldValue::File {
                        filename,
                        bytes: bytes.to_vec(),
                    }
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                    })?;
                    FieldValue::Text(text)
                }
            };

            form.push(&name, value);
        }

        Ok(form)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Non-empty text value, trimmed
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Text(value) => Some(value.trim()).filter(|v| !v.is_empty()),
            FieldValue::File { .. } => None,
        }
    }

    /// File field that actually carries a file
    pub fn file(&self, name: &str) -> Option<(&str, &[u8])> {
        match self.get(name)? {
            FieldValue::File { filename, bytes } if !filename.is_empty() => {
                Some((filename.as_str(), bytes.as_slice()))
            }
            _ => None,
        }
    }
}

/// Outcome of the boundary parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// No marker field: a plain page view
    None,
    Request(UploadRequest),
    /// A marker was present but its required fields were not
    Invalid(RelayError),
}

impl Submission {
    /// Select the mode by marker presence, in fixed priority order
    pub fn parse(target: Target, form: &FormFields) -> Self {
        let parsed = if form.contains(NEWICK_FROM_FILE) {
            parse_newick_from_file(target, form)
        } else if form.contains(NEXSON_FROM_GIT) {
            parse_nexson_from_git(target, form)
        } else if form.contains(NEXSON_FROM_FILE) {
            parse_nexson_from_file(target, form)
        } else {
            return Submission::None;
        };

        match parsed {
            Ok(request) => Submission::Request(request),
            Err(e) => Submission::Invalid(e),
        }
    }
}

fn parse_newick_from_file(target: Target, form: &FormFields) -> Result<UploadRequest, RelayError> {
    let id = form
        .text(target.id_field())
        .ok_or(RelayError::UnspecifiedAction)?;
    let (filename, bytes) = form.file(FILE_FIELD).ok_or(RelayError::UnspecifiedAction)?;

    Ok(UploadRequest::FileNewick {
        id: id.to_string(),
        filename: filename.to_string(),
        bytes: bytes.to_vec(),
    })
}

fn parse_nexson_from_git(target: Target, form: &FormFields) -> Result<UploadRequest, RelayError> {
    let (revision, id) = match target {
        Target::Source => (form.text("recenthash"), form.text("nexsonid")),
        Target::Study => match form.text("loadselect") {
            // the studies page encodes both as `<revision>/<id>`
            Some(selection) => match selection.split_once('/') {
                Some((revision, id)) => (Some(revision), Some(id)),
                None => (form.text("recenthash"), Some(selection)),
            },
            None => (form.text("recenthash"), form.text(target.id_field())),
        },
    };

    match (revision, id) {
        (Some(revision), Some(id)) if !revision.is_empty() && !id.is_empty() => {
            Ok(UploadRequest::GitNexson {
                id: id.to_string(),
                revision: revision.to_string(),
            })
        }
        _ => Err(RelayError::UnspecifiedAction),
    }
}

/// The marker alone selects this mode; the file is optional
fn parse_nexson_from_file(target: Target, form: &FormFields) -> Result<UploadRequest, RelayError> {
    let (filename, bytes) = form.file(FILE_FIELD).unwrap_or_default();

    Ok(UploadRequest::FileNexson {
        id: form.text(target.id_field()).unwrap_or_default().to_string(),
        filename: filename.to_string(),
        bytes: bytes.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_marker_is_no_action() {
        let form = FormFields::new().with_text("sourceId", "s1").with_text("submit", "");
        assert_eq!(Submission::parse(Target::Source, &form), Submission::None);
        assert_eq!(Submission::parse(Target::Source, &FormFields::new()), Submission::None);
    }

    #[test]
    fn test_newick_from_file() {
        let form = FormFields::new()
            .with_text(NEWICK_FROM_FILE, "")
            .with_text("sourceId", " src1 ")
            .with_file("file", "tree.tre", b"(A,B);");

        assert_eq!(
            Submission::parse(Target::Source, &form),
            Submission::Request(UploadRequest::FileNewick {
                id: "src1".to_string(),
                filename: "tree.tre".to_string(),
                bytes: b"(A,B);".to_vec(),
            })
        );
    }

    #[test]
    fn test_newick_without_file_is_unspecified() {
        let form = FormFields::new()
            .with_text(NEWICK_FROM_FILE, "")
            .with_text("studyID", "st1")
            .with_file("file", "", b"");

        assert_eq!(
            Submission::parse(Target::Study, &form),
            Submission::Invalid(RelayError::UnspecifiedAction)
        );
    }

    #[test]
    fn test_newick_uses_target_id_field() {
        let form = FormFields::new()
            .with_text(NEWICK_FROM_FILE, "")
            .with_text("sourceId", "src1")
            .with_file("file", "tree.tre", b"(A,B);");

        assert_eq!(
            Submission::parse(Target::Study, &form),
            Submission::Invalid(RelayError::UnspecifiedAction)
        );
    }

    #[test]
    fn test_source_nexson_from_git() {
        let form = FormFields::new()
            .with_text(NEXSON_FROM_GIT, "")
            .with_text("recenthash", "abc123")
            .with_text("nexsonid", "42");

        assert_eq!(
            Submission::parse(Target::Source, &form),
            Submission::Request(UploadRequest::GitNexson {
                id: "42".to_string(),
                revision: "abc123".to_string(),
            })
        );
    }

    #[test]
    fn test_study_nexson_from_git_selection() {
        let combined = FormFields::new()
            .with_text(NEXSON_FROM_GIT, "")
            .with_text("loadselect", "abc123/42");
        let separate = FormFields::new()
            .with_text(NEXSON_FROM_GIT, "")
            .with_text("recenthash", "abc123")
            .with_text("loadselect", "42");

        let expected = Submission::Request(UploadRequest::GitNexson {
            id: "42".to_string(),
            revision: "abc123".to_string(),
        });
        assert_eq!(Submission::parse(Target::Study, &combined), expected);
        assert_eq!(Submission::parse(Target::Study, &separate), expected);
    }

    #[test]
    fn test_git_without_revision_is_unspecified() {
        let form = FormFields::new()
            .with_text(NEXSON_FROM_GIT, "")
            .with_text("nexsonid", "42");

        assert_eq!(
            Submission::parse(Target::Source, &form),
            Submission::Invalid(RelayError::UnspecifiedAction)
        );
    }

    #[test]
    fn test_marker_priority() {
        let form = FormFields::new()
            .with_text(NEXSON_FROM_FILE, "")
            .with_text(NEXSON_FROM_GIT, "")
            .with_text(NEWICK_FROM_FILE, "")
            .with_text("sourceId", "src1")
            .with_text("recenthash", "abc123")
            .with_text("nexsonid", "42")
            .with_file("file", "tree.tre", b"(A,B);");

        match Submission::parse(Target::Source, &form) {
            Submission::Request(request) => assert_eq!(request.mode(), "newick_from_file"),
            other => panic!("unexpected submission: {:?}", other),
        }

        let form = FormFields::new()
            .with_text(NEXSON_FROM_FILE, "")
            .with_text(NEXSON_FROM_GIT, "")
            .with_text("recenthash", "abc123")
            .with_text("nexsonid", "42")
            .with_file("file", "study.json", b"{}");

        match Submission::parse(Target::Source, &form) {
            Submission::Request(request) => assert_eq!(request.mode(), "nexson_from_git"),
            other => panic!("unexpected submission: {:?}", other),
        }
    }

    #[test]
    fn test_nexson_from_file() {
        let form = FormFields::new()
            .with_text(NEXSON_FROM_FILE, "")
            .with_file("file", "study.json", b"{}");

        assert_eq!(
            Submission::parse(Target::Study, &form),
            Submission::Request(UploadRequest::FileNexson {
                id: String::new(),
                filename: "study.json".to_string(),
                bytes: b"{}".to_vec(),
            })
        );
    }

    #[test]
    fn test_nexson_from_file_without_file() {
        let form = FormFields::new()
            .with_text(NEXSON_FROM_FILE, "")
            .with_file("file", "", b"");

        assert_eq!(
            Submission::parse(Target::Source, &form),
            Submission::Request(UploadRequest::FileNexson {
                id: String::new(),
                filename: String::new(),
                bytes: Vec::new(),
            })
        );
        assert_eq!(
            Submission::parse(Target::Study, &FormFields::new().with_text(NEXSON_FROM_FILE, "")),
            Submission::Request(UploadRequest::FileNexson {
                id: String::new(),
                filename: String::new(),
                bytes: Vec::new(),
            })
        );
    }

    #[test]
    fn test_field_names_in_order() {
        let form = FormFields::new()
            .with_text("b", "1")
            .with_file("a", "x.txt", b"x");
        assert_eq!(form.field_names(), vec!["b", "a"]);
        assert!(form.text("a").is_none());
        assert!(form.file("b").is_none());
    }
}
