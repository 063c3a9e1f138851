//! Core types for the update subsystem

use crate::core::error::{Result, UpdateError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One applied version in the persisted history.
///
/// The history is an ordered, append-only sequence; the last entry is
/// always the current version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    pub version: String,
    pub date: String,
    pub description: String,
}

impl VersionEntry {
    /// Create an entry dated now
    pub fn new(version: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            description: description.into(),
        }
    }
}

/// Remote version manifest, as returned by the manifest endpoint.
///
/// Transient: fetched, consumed, discarded. Never persisted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteManifest {
    pub latest_version: String,
    pub update_time: String,
    pub description: String,
    pub download_url: String,
    /// SHA-256 hex of the artifact; empty means the publisher chose to
    /// skip integrity verification.
    #[serde(default)]
    pub file_hash: String,
}

/// A stored copy of the artifact, immutable once written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// Version of the artifact at capture time
    pub version: String,
    /// Capture time (seconds since the epoch, as encoded in the name)
    pub created_at: DateTime<Utc>,
    /// Location of the backup file
    pub path: PathBuf,
}

/// Numeric comparison key for a dotted version string.
///
/// A `major.minor` string keys as `major * 100 + minor`; a bare `major`
/// keys as `major`. Only the first two segments are considered and the
/// semantics for a minor component >= 100 are unspecified — this
/// matches the manifest format, which only ever carries two segments.
pub fn version_key(version: &str) -> Result<u64> {
    let mut parts = version.split('.');

    let major: u64 = parts
        .next()
        .unwrap_or("")
        .parse()
        .map_err(|_| UpdateError::invalid_version(version))?;

    match parts.next() {
        Some(minor) => {
            let minor: u64 = minor
                .parse()
                .map_err(|_| UpdateError::invalid_version(version))?;
            // The version string comes from the remote manifest; an
            // absurd major must be a typed error, not an overflow
            major
                .checked_mul(100)
                .and_then(|key| key.checked_add(minor))
                .ok_or_else(|| UpdateError::invalid_version(version))
        }
        None => Ok(major),
    }
}
