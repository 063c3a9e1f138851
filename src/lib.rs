//! selfup - a self-contained self-update subsystem
//!
//! selfup checks a remote version manifest, backs up the running
//! artifact, downloads and integrity-verifies the replacement, swaps it
//! into place atomically, and rolls back on any failure. The artifact
//! is never left corrupted or half-replaced; after a successful swap
//! the host process restarts to observe the new artifact.
//!
//! # Core Guarantees
//!
//! - **Backup before mutation**: a backup exists before any destructive
//!   step touches the artifact
//! - **Typed failures**: every network, download, verification, and
//!   swap failure comes back as a typed error, never a crash
//! - **Rollback**: a failed swap restores the original artifact
//!   byte-for-byte; the sole fatal case names the backup for manual
//!   recovery
//! - **Idempotent invocation**: checking and applying are safe to
//!   repeat at will
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use selfup::{HttpSource, UpdateConfig, Updater};
//! use std::path::Path;
//!
//! let config = UpdateConfig::load(Path::new("config.toml"))?;
//! let remote = HttpSource::new(&config.manifest_url, config.timeout())?;
//! let mut updater = Updater::new(config, remote)?;
//!
//! if let selfup::CheckOutcome::UpdateAvailable { manifest } = updater.check_for_updates(false)? {
//!     updater.apply_update(Some(manifest))?;
//! }
//! # Ok::<(), selfup::UpdateError>(())
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod core;
pub mod history;
pub mod integrity;
pub mod remote;
pub mod update;

// Re-export commonly used types
pub use crate::core::{
    error::{Result, UpdateError},
    types::{version_key, BackupRecord, RemoteManifest, VersionEntry},
};

pub use backup::BackupManager;
pub use config::UpdateConfig;
pub use history::VersionStore;
pub use remote::{HttpSource, RemoteSource};
pub use update::{ApplyOutcome, CheckOutcome, Updater};

/// Current version of selfup
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
