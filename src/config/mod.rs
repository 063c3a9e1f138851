//! Update configuration
//!
//! All knobs are supplied at construction time; there is no implicit
//! global state. The CLI persists the configuration as TOML in
//! `~/.selfup/config.toml` by default.

use crate::core::error::{Result, UpdateError};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    10
}

fn default_auto_check() -> bool {
    true
}

/// Configuration surface of the update subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// URL of the remote version manifest
    pub manifest_url: String,
    /// The artifact this subsystem updates
    pub artifact_path: PathBuf,
    /// Where backups are stored
    pub backup_dir: PathBuf,
    /// Where the version history is stored
    pub history_path: PathBuf,
    /// Network timeout in seconds, applied to the fetch and the download
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Check for updates automatically on startup (check-only, no mutation)
    #[serde(default = "default_auto_check")]
    pub auto_check: bool,
}

impl UpdateConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Err(UpdateError::configuration(format!(
                "config file not found: {} (create it or pass --config)",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| {
            UpdateError::configuration(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| UpdateError::configuration(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Default config file location: `~/.selfup/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        let user_dirs = UserDirs::new().ok_or(UpdateError::HomeDirectoryNotFound)?;
        Ok(user_dirs.home_dir().join(".selfup").join("config.toml"))
    }

    /// Network timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
