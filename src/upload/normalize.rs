//! Upload normalizer
//!
//! Turns raw uploads and remote documents into [`Envelope`]s. Only the
//! first non-empty line of a Newick file is kept; multi-tree files are not
//! supported.

use std::convert::Infallible;

use crate::error::RelayError;

use super::types::{Envelope, EnvelopeKind};

pub const NEXSON_FILE_NOT_IMPLEMENTED: &str = "Manual nexson upload not implemented";

/// Wrap the first non-empty line of a Newick upload
pub fn normalize_newick(id: &str, raw: &[u8]) -> Result<Envelope, RelayError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| RelayError::MalformedInput(format!("newick file is not valid UTF-8: {}", e)))?;

    let line = text
        .lines()
        .map(str::trim_end)
        .find(|line| !line.trim_start().is_empty())
        .ok_or_else(|| RelayError::MalformedInput("newick file is empty".to_string()))?;

    Envelope::new(id, EnvelopeKind::Newick, line)
}

/// Validate a NexSON document and wrap its compact re-serialization
pub fn normalize_nexson(id: &str, json_text: &str) -> Result<Envelope, RelayError> {
    let value: serde_json::Value = serde_json::from_str(json_text)
        .map_err(|e| RelayError::MalformedInput(format!("nexson is not valid JSON: {}", e)))?;

    let content = serde_json::to_string(&value)
        .map_err(|e| RelayError::MalformedInput(format!("nexson could not be serialized: {}", e)))?;

    Envelope::new(id, EnvelopeKind::Nexson, content)
}

/// Uploading NexSON files directly is not supported; this never yields an envelope
pub fn normalize_file_nexson(_id: &str, _filename: &str, _raw: &[u8]) -> Result<Infallible, RelayError> {
    Err(RelayError::NotImplemented(NEXSON_FILE_NOT_IMPLEMENTED.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newick_keeps_first_line_only() {
        let envelope = normalize_newick("src1", b"(A,B,(C,D));\nignored second line").unwrap();
        assert_eq!(envelope.id(), "src1");
        assert_eq!(envelope.kind(), EnvelopeKind::Newick);
        assert_eq!(envelope.content(), "(A,B,(C,D));");
    }

    #[test]
    fn test_newick_skips_blank_lines_and_strips_trailing_whitespace() {
        let envelope = normalize_newick("src1", b"\r\n   \n(A,B);  \t\r\n(C,D);\n").unwrap();
        assert_eq!(envelope.content(), "(A,B);");
    }

    #[test]
    fn test_newick_rejects_empty_file() {
        assert!(matches!(
            normalize_newick("src1", b""),
            Err(RelayError::MalformedInput(_))
        ));
        assert!(matches!(
            normalize_newick("src1", b"\n  \n"),
            Err(RelayError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_newick_rejects_missing_id() {
        assert!(matches!(
            normalize_newick("  ", b"(A,B);"),
            Err(RelayError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_newick_rejects_binary() {
        assert!(matches!(
            normalize_newick("src1", &[0xff, 0xfe, 0x00]),
            Err(RelayError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_nexson_content_is_equivalent_json() {
        let text = r#"{ "nexml": { "@id": "study", "otus": [1, 2, 3] }, "extra": null }"#;
        let envelope = normalize_nexson("42", text).unwrap();

        assert_eq!(envelope.kind(), EnvelopeKind::Nexson);
        let original: serde_json::Value = serde_json::from_str(text).unwrap();
        let relayed: serde_json::Value = serde_json::from_str(&envelope.content()).unwrap();
        assert_eq!(original, relayed);
        assert!(!envelope.content().contains('\n'));
    }

    #[test]
    fn test_nexson_rejects_malformed_json() {
        assert!(matches!(
            normalize_nexson("42", "{\"nexml\": "),
            Err(RelayError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_file_nexson_is_not_implemented() {
        assert_eq!(
            normalize_file_nexson("42", "study.json", b"{}"),
            Err(RelayError::NotImplemented(NEXSON_FILE_NOT_IMPLEMENTED.to_string()))
        );
    }
}
