//! Upload Module
//!
//! Submission model and normalization:
//! - [`UploadRequest`]: the three mutually exclusive submission modes
//! - [`Envelope`]: the JSON payload relayed to the database
//! - normalizers turning raw uploads into envelopes

pub mod normalize;
pub mod types;

pub use normalize::{
    normalize_file_nexson, normalize_newick, normalize_nexson, NEXSON_FILE_NOT_IMPLEMENTED,
};
pub use types::*;
