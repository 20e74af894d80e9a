// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! The split is deliberate: load-time failures are fatal and surface here;
//! query-time oddities never do. An unknown qualifier, an empty query, a
//! deadline expiry - all of those degrade to empty or partial results with
//! a structured diagnostic inside [`crate::SearchResults`], because a search
//! box should not 500 on user input.

use std::fmt;
use std::path::PathBuf;

/// Failures the library reports to callers.
#[derive(Debug)]
pub enum SearchError {
    /// A registry lookup named an index that was never installed.
    UnknownIndex(String),
    /// The snapshot path does not exist.
    SnapshotMissing { path: PathBuf },
    /// The snapshot exists but failed validation: bad header, checksum
    /// mismatch, version skew, or undecodable payload.
    SnapshotCorrupt { path: PathBuf, detail: String },
    /// An underlying read or write failed.
    Io(std::io::Error),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::UnknownIndex(name) => {
                write!(f, "unknown index '{}'", name)
            }
            SearchError::SnapshotMissing { path } => {
                write!(f, "snapshot missing: {}", path.display())
            }
            SearchError::SnapshotCorrupt { path, detail } => {
                write!(f, "snapshot corrupt: {}: {}", path.display(), detail)
            }
            SearchError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Io(err)
    }
}
