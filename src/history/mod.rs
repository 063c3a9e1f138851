//! Persisted version history
//!
//! The history file is an ordered JSON array of applied versions. It is
//! append-only from the caller's view and the last entry is always the
//! current version. A rewrite goes through a temporary file and a
//! rename, so no partial-write state is ever observable.

use crate::core::error::Result;
use crate::core::types::VersionEntry;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Version used when the history is empty (unreadable store)
pub const DEFAULT_VERSION: &str = "1.0";

/// Owns the persisted version history and the "current version" value
pub struct VersionStore {
    path: PathBuf,
    entries: Vec<VersionEntry>,
}

impl VersionStore {
    /// Open the history at `path`, seeding an initial entry if no
    /// persisted history exists.
    ///
    /// Fails soft: an unreadable or corrupt store logs a warning and
    /// yields an empty in-memory history rather than an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = Self::load(&path)?;
        Ok(Self { path, entries })
    }

    fn load(path: &Path) -> Result<Vec<VersionEntry>> {
        if !path.exists() {
            let seeded = vec![VersionEntry::new(
                DEFAULT_VERSION,
                "Initial version (seeded history)",
            )];
            Self::persist(path, &seeded)?;
            return Ok(seeded);
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => Ok(entries),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "version history is corrupt, continuing with empty history");
                    Ok(Vec::new())
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "version history is unreadable, continuing with empty history");
                Ok(Vec::new())
            }
        }
    }

    fn persist(path: &Path, entries: &[VersionEntry]) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let content = serde_json::to_string_pretty(entries)?;
        let tmp = tempfile::NamedTempFile::new_in(parent)?;
        std::fs::write(tmp.path(), content)?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    /// The last entry's version, or the default if the history is empty
    pub fn current_version(&self) -> &str {
        self.entries
            .last()
            .map(|entry| entry.version.as_str())
            .unwrap_or(DEFAULT_VERSION)
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[VersionEntry] {
        &self.entries
    }

    /// Append one entry and persist the full history
    pub fn append(&mut self, entry: VersionEntry) -> Result<()> {
        self.entries.push(entry);
        if let Err(e) = Self::persist(&self.path, &self.entries) {
            // Keep the in-memory history consistent with disk
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }
}
