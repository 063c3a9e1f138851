//! Core functionality: shared types and errors

pub mod error;
pub mod types;

pub use error::{Result, UpdateError};
pub use types::{version_key, BackupRecord, RemoteManifest, VersionEntry};
