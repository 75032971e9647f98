//! Remote Listing Client
//!
//! Reads the public nexsons repository on the code-hosting service:
//! - the most recent revision hash
//! - numeric file names present at a revision
//! - raw file content at a revision

mod client;

pub use client::{HostingClient, RemoteRepository};

#[cfg(test)]
pub use client::MockRepository;

/// Selectable remote files at one revision. Rebuilt on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteFileList {
    pub revision: String,
    pub files: Vec<String>,
}

impl RemoteFileList {
    pub fn new(revision: impl Into<String>, files: Vec<String>) -> Self {
        Self {
            revision: revision.into(),
            files,
        }
    }
}

/// Keep entries whose trimmed text is an integer of any length, in order
pub fn numeric_entries(listing: &str) -> Vec<String> {
    listing
        .lines()
        .map(str::trim)
        .filter(|entry| is_integer(entry))
        .map(str::to_string)
        .collect()
}

fn is_integer(entry: &str) -> bool {
    let digits = entry.strip_prefix(['-', '+']).unwrap_or(entry);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
