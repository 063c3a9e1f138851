//! Artifact backups
//!
//! One immutable file per backup attempt, named from the source version
//! and the capture time. Backups are never overwritten and never
//! auto-pruned; they are the manual-recovery escape hatch when
//! everything else has gone wrong.

use crate::core::error::{Result, UpdateError};
use crate::core::types::BackupRecord;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// Owns the backup directory for the process lifetime
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    /// Create a manager for `backup_dir`; the directory is created
    /// lazily on the first backup.
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
        }
    }

    /// Copy `source` into the backup store, named from `version` and
    /// the current time.
    ///
    /// Any failure here must abort the update before a destructive step
    /// is taken; the caller relies on that ordering.
    pub fn backup(&self, source: &Path, version: &str) -> Result<BackupRecord> {
        self.backup_at(source, version, Utc::now())
    }

    fn backup_at(
        &self,
        source: &Path,
        version: &str,
        created_at: DateTime<Utc>,
    ) -> Result<BackupRecord> {
        if !source.exists() {
            return Err(UpdateError::BackupSourceNotFound {
                path: source.to_path_buf(),
            });
        }

        std::fs::create_dir_all(&self.backup_dir).map_err(|e| {
            UpdateError::backup(format!(
                "cannot create backup directory {}: {}",
                self.backup_dir.display(),
                e
            ))
        })?;

        let path = self.backup_path(source, version, created_at);

        // Backups are immutable once written; a name collision must be
        // a typed error, never an overwrite
        let mut dest = std::fs::File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    UpdateError::backup(format!(
                        "backup already exists, not overwriting: {}",
                        path.display()
                    ))
                } else {
                    UpdateError::backup(format!("cannot create {}: {}", path.display(), e))
                }
            })?;
        let mut src = std::fs::File::open(source).map_err(|e| {
            UpdateError::backup(format!("cannot read {}: {}", source.display(), e))
        })?;
        std::io::copy(&mut src, &mut dest).map_err(|e| {
            UpdateError::backup(format!("cannot copy to {}: {}", path.display(), e))
        })?;

        info!(backup = %path.display(), version = %version, "artifact backed up");

        Ok(BackupRecord {
            version: version.to_string(),
            created_at,
            path,
        })
    }

    /// Enumerate existing backups, most-recent-last
    pub fn list(&self) -> Result<Vec<BackupRecord>> {
        let mut records = Vec::new();

        if !self.backup_dir.exists() {
            return Ok(records);
        }

        for entry in std::fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(record) = Self::parse_backup_name(&entry.path()) {
                records.push(record);
            }
        }

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(records)
    }

    /// Path of the backup directory
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Backup file name: `<stem>_<version>_<unix-ts>[.<ext>]`
    fn backup_path(&self, source: &Path, version: &str, created_at: DateTime<Utc>) -> PathBuf {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("artifact");
        let name = match source.extension().and_then(|s| s.to_str()) {
            Some(ext) => format!("{}_{}_{}.{}", stem, version, created_at.timestamp(), ext),
            None => format!("{}_{}_{}", stem, version, created_at.timestamp()),
        };
        self.backup_dir.join(name)
    }

    /// Recover `{version, created_at}` from a backup file name; files
    /// that do not follow the naming scheme are skipped.
    fn parse_backup_name(path: &Path) -> Option<BackupRecord> {
        let stem = path.file_stem()?.to_str()?;
        let mut parts = stem.rsplitn(3, '_');
        let timestamp: i64 = parts.next()?.parse().ok()?;
        let version = parts.next()?.to_string();
        parts.next()?;

        Some(BackupRecord {
            version,
            created_at: DateTime::from_timestamp(timestamp, 0)?,
            path: path.to_path_buf(),
        })
    }
}
