// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Snapshot persistence: dump a built index, load it at startup.
//!
//! The on-disk layout is a one-line JSON header followed by the JSON
//! payload:
//!
//! ```text
//! {"magic":"talpa","version":1,"checksum":3735928559}
//! {"name":"books","tokenizer":{...},"categories":[...],...}
//! ```
//!
//! The checksum is CRC32 over the payload bytes, verified before the
//! payload is decoded. Load-time failures are fatal and typed: a missing
//! path is [`SearchError::SnapshotMissing`], everything else that is wrong
//! with the file is [`SearchError::SnapshotCorrupt`] with a detail string.

use crate::error::SearchError;
use crate::index::Snapshot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAGIC: &str = "talpa";
const VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotHeader {
    magic: String,
    version: u32,
    checksum: u32,
}

impl Snapshot {
    /// Write this snapshot to `path`, overwriting any existing file.
    pub fn dump(&self, path: &Path) -> Result<(), SearchError> {
        let payload = serde_json::to_string(self).map_err(|err| {
            SearchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;
        let header = SnapshotHeader {
            magic: MAGIC.to_string(),
            version: VERSION,
            checksum: crc32fast::hash(payload.as_bytes()),
        };
        let header_line = serde_json::to_string(&header).map_err(|err| {
            SearchError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err))
        })?;

        fs::write(path, format!("{}\n{}", header_line, payload))?;
        Ok(())
    }

    /// Load a snapshot from `path`, validating magic, version and checksum
    /// before decoding the payload.
    pub fn load(path: &Path) -> Result<Snapshot, SearchError> {
        if !path.exists() {
            return Err(SearchError::SnapshotMissing {
                path: path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(path)?;
        let (header_line, payload) =
            contents
                .split_once('\n')
                .ok_or_else(|| SearchError::SnapshotCorrupt {
                    path: path.to_path_buf(),
                    detail: "missing header line".to_string(),
                })?;

        let header: SnapshotHeader =
            serde_json::from_str(header_line).map_err(|err| SearchError::SnapshotCorrupt {
                path: path.to_path_buf(),
                detail: format!("undecodable header: {}", err),
            })?;

        if header.magic != MAGIC {
            return Err(SearchError::SnapshotCorrupt {
                path: path.to_path_buf(),
                detail: format!("bad magic '{}'", header.magic),
            });
        }
        if header.version != VERSION {
            return Err(SearchError::SnapshotCorrupt {
                path: path.to_path_buf(),
                detail: format!(
                    "version mismatch: file has {}, this build reads {}",
                    header.version, VERSION
                ),
            });
        }

        let checksum = crc32fast::hash(payload.as_bytes());
        if checksum != header.checksum {
            return Err(SearchError::SnapshotCorrupt {
                path: path.to_path_buf(),
                detail: format!(
                    "checksum mismatch: header says {:#010x}, payload is {:#010x}",
                    header.checksum, checksum
                ),
            });
        }

        serde_json::from_str(payload).map_err(|err| SearchError::SnapshotCorrupt {
            path: path.to_path_buf(),
            detail: format!("undecodable payload: {}", err),
        })
    }
}
