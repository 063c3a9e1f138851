//! The update state machine
//!
//! Pipeline: fetch manifest → compare versions → back up → download →
//! verify → swap → record. Every step either leaves state untouched or
//! rolls back; one backup always exists before any destructive
//! mutation of the artifact. That ordering is the safety invariant the
//! rest of this module is built around.

use crate::backup::BackupManager;
use crate::config::UpdateConfig;
use crate::core::error::{Result, UpdateError};
use crate::core::types::{version_key, BackupRecord, RemoteManifest, VersionEntry};
use crate::history::VersionStore;
use crate::integrity;
use crate::remote::RemoteSource;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Outcome of a check-only run (no mutation)
#[derive(Debug, Clone)]
pub enum CheckOutcome {
    /// The remote manifest does not advertise a strictly newer version
    UpToDate { current: String },
    /// A newer version is available; nothing has been written
    UpdateAvailable { manifest: RemoteManifest },
}

/// Outcome of a full update run
#[derive(Debug)]
pub enum ApplyOutcome {
    /// The remote manifest does not advertise a strictly newer version;
    /// zero filesystem writes were performed.
    AlreadyUpToDate { current: String },
    /// The artifact was replaced; a restart is required for it to take
    /// effect. The `.old` file is retained as a secondary recovery
    /// point alongside the backup.
    Updated {
        new_version: String,
        backup: BackupRecord,
        old_artifact: PathBuf,
    },
}

/// Orchestrates the end-to-end update pipeline.
///
/// Sequential and single-flow: no step starts before the previous one
/// resolves, and the surrounding application is expected to serialize
/// update requests.
pub struct Updater<S: RemoteSource> {
    config: UpdateConfig,
    history: VersionStore,
    backups: BackupManager,
    remote: S,
}

impl<S: RemoteSource> Updater<S> {
    /// Create an updater from its configuration and a remote source
    pub fn new(config: UpdateConfig, remote: S) -> Result<Self> {
        let history = VersionStore::open(&config.history_path)?;
        let backups = BackupManager::new(&config.backup_dir);
        Ok(Self {
            config,
            history,
            backups,
            remote,
        })
    }

    /// The version the history currently reports
    pub fn current_version(&self) -> &str {
        self.history.current_version()
    }

    /// The version history, oldest first
    pub fn history(&self) -> &VersionStore {
        &self.history
    }

    /// The backup store
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Check the remote manifest for a newer version. Never mutates.
    ///
    /// `automatic` marks the startup-time check; it only changes how
    /// the finding is logged, never what is done.
    pub fn check_for_updates(&self, automatic: bool) -> Result<CheckOutcome> {
        debug!("checking remote manifest");
        let manifest = self.remote.fetch_manifest()?;

        let current = self.history.current_version().to_string();
        if !is_newer(&manifest.latest_version, &current)? {
            debug!(current = %current, "already up to date");
            return Ok(CheckOutcome::UpToDate { current });
        }

        if automatic {
            info!(
                current = %current,
                latest = %manifest.latest_version,
                "newer version available, apply when convenient"
            );
        } else {
            info!(
                current = %current,
                latest = %manifest.latest_version,
                "newer version available"
            );
        }
        Ok(CheckOutcome::UpdateAvailable { manifest })
    }

    /// Run the full update pipeline.
    ///
    /// When `manifest` is `None` the remote is consulted first. Safe to
    /// re-invoke at will: every failure except the unrecoverable swap
    /// leaves the artifact and the history exactly as before.
    pub fn apply_update(&mut self, manifest: Option<RemoteManifest>) -> Result<ApplyOutcome> {
        let manifest = match manifest {
            Some(manifest) => manifest,
            None => self.remote.fetch_manifest()?,
        };

        let current = self.history.current_version().to_string();
        if !is_newer(&manifest.latest_version, &current)? {
            return Ok(ApplyOutcome::AlreadyUpToDate { current });
        }

        info!(
            from = %current,
            to = %manifest.latest_version,
            "starting update"
        );

        // One backup must exist before any destructive step
        let backup = self.backups.backup(&self.config.artifact_path, &current)?;

        let candidate = self.download_candidate(&manifest)?;
        self.verify_candidate(&candidate, &manifest)?;

        let old_artifact = swap_artifact(&self.config.artifact_path, candidate, &backup.path)?;

        // The artifact is already replaced at this point; a history
        // write failure is logged but does not fail the update.
        let entry = VersionEntry {
            version: manifest.latest_version.clone(),
            date: manifest.update_time.clone(),
            description: manifest.description.clone(),
        };
        if let Err(e) = self.history.append(entry) {
            warn!(error = %e, "artifact updated but version history could not be written");
        }

        info!(
            version = %manifest.latest_version,
            old = %old_artifact.display(),
            "update applied, restart required"
        );

        Ok(ApplyOutcome::Updated {
            new_version: manifest.latest_version,
            backup,
            old_artifact,
        })
    }

    /// Download the candidate artifact to a fresh temporary path next
    /// to the artifact (same filesystem, so the later rename is atomic).
    /// The temporary file is deleted on any failure.
    fn download_candidate(&self, manifest: &RemoteManifest) -> Result<tempfile::TempPath> {
        let artifact_dir = self
            .config
            .artifact_path
            .parent()
            .unwrap_or_else(|| Path::new("."));

        let candidate = tempfile::Builder::new()
            .prefix(".candidate-")
            .tempfile_in(artifact_dir)
            .map_err(|e| UpdateError::download(format!("cannot create temp file: {}", e)))?
            .into_temp_path();

        // TempPath removes the partial file on drop if we bail here
        self.remote.download(&manifest.download_url, &candidate)?;
        Ok(candidate)
    }

    /// Verify the candidate against the manifest digest, if one was
    /// published. An empty `file_hash` skips verification by manifest
    /// choice.
    fn verify_candidate(&self, candidate: &Path, manifest: &RemoteManifest) -> Result<()> {
        if manifest.file_hash.is_empty() {
            debug!("manifest carries no digest, skipping verification");
            return Ok(());
        }

        if !integrity::verify(candidate, &manifest.file_hash)? {
            return Err(UpdateError::IntegrityMismatch {
                expected: manifest.file_hash.clone(),
                actual: integrity::digest(candidate)?,
            });
        }
        debug!(digest = %manifest.file_hash, "candidate digest verified");
        Ok(())
    }
}

/// `<artifact>.old`, the retained pre-swap copy
pub fn old_artifact_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".old");
    artifact.with_file_name(name)
}

/// Replace `artifact` with `candidate` as one logical unit.
///
/// The current artifact is renamed to its `.old` path (any stale `.old`
/// removed first), then the candidate moves into the original path. If
/// the second step fails after the first succeeded, the original is
/// restored from `.old`; if that restoration itself fails, the result
/// is the one fatal error, carrying `backup` for manual recovery.
fn swap_artifact(
    artifact: &Path,
    candidate: tempfile::TempPath,
    backup: &Path,
) -> Result<PathBuf> {
    let old = old_artifact_path(artifact);

    if old.exists() {
        std::fs::remove_file(&old)
            .map_err(|e| UpdateError::swap(format!("cannot remove stale {}: {}", old.display(), e)))?;
    }

    std::fs::rename(artifact, &old).map_err(|e| {
        UpdateError::swap(format!(
            "cannot move {} aside: {}",
            artifact.display(),
            e
        ))
    })?;

    // From here the artifact path is vacant; any failure must restore
    // the original before returning.
    if let Err(persist_err) = candidate.persist(artifact) {
        let reason = persist_err.error.to_string();
        match restore_original(artifact, &old) {
            Ok(()) => {
                warn!(reason = %reason, "swap failed, original artifact restored");
                Err(UpdateError::swap(reason))
            }
            Err(restore_err) => {
                error!(
                    reason = %reason,
                    restore_error = %restore_err,
                    backup = %backup.display(),
                    "swap failed and restoration failed, manual recovery required"
                );
                Err(UpdateError::UnrecoverableSwap {
                    backup: backup.to_path_buf(),
                    reason: format!("{} (restore: {})", reason, restore_err),
                })
            }
        }
    } else {
        Ok(old)
    }
}

/// Undo a half-finished swap: drop any partially-placed new artifact
/// and rename the `.old` copy back to the original name.
fn restore_original(artifact: &Path, old: &Path) -> std::io::Result<()> {
    if artifact.exists() {
        std::fs::remove_file(artifact)?;
    }
    std::fs::rename(old, artifact)
}

/// Strictly-newer comparison on version keys
fn is_newer(remote: &str, current: &str) -> Result<bool> {
    Ok(version_key(remote)? > version_key(current)?)
}
