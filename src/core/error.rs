//! Error types for the update subsystem

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for update operations
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Network errors, one variant per failure kind
    #[error("Request to {url} timed out")]
    NetworkTimeout { url: String },

    #[error("Could not connect to {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Server returned status {status} for {url}")]
    BadStatus { url: String, status: u16 },

    /// Manifest body was fetched but is not a well-formed manifest
    #[error("Manifest parsing failed: {reason}")]
    ManifestParse { reason: String },

    /// Version string outside the supported dotted-numeric shape
    #[error("Invalid version string: {version}")]
    InvalidVersion { version: String },

    /// Backup errors
    #[error("Backup failed: {reason}")]
    Backup { reason: String },

    #[error("Backup source not found: {path}")]
    BackupSourceNotFound { path: PathBuf },

    /// Download errors
    #[error("Download failed: {reason}")]
    Download { reason: String },

    /// Integrity verification errors
    #[error("Digest mismatch: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    /// Swap errors
    #[error("Artifact swap failed: {reason}")]
    Swap { reason: String },

    /// The one fatal condition: the swap failed and rollback failed too.
    /// The artifact may be missing or inconsistent; manual recovery from
    /// the named backup is required.
    #[error("Swap failed and rollback failed: {reason}; restore manually from {backup}")]
    UnrecoverableSwap { backup: PathBuf, reason: String },

    /// Configuration errors
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Home directory not found")]
    HomeDirectoryNotFound,

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

impl UpdateError {
    /// Create a new manifest parse error
    pub fn manifest_parse(reason: impl Into<String>) -> Self {
        Self::ManifestParse {
            reason: reason.into(),
        }
    }

    /// Create a new invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create a new backup error
    pub fn backup(reason: impl Into<String>) -> Self {
        Self::Backup {
            reason: reason.into(),
        }
    }

    /// Create a new download error
    pub fn download(reason: impl Into<String>) -> Self {
        Self::Download {
            reason: reason.into(),
        }
    }

    /// Create a new swap error
    pub fn swap(reason: impl Into<String>) -> Self {
        Self::Swap {
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}

/// Result type alias for update operations
pub type Result<T> = std::result::Result<T, UpdateError>;
