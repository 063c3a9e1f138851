//! CLI command implementations

pub mod apply;
pub mod backups;
pub mod check;
pub mod completion;
pub mod history;

use crate::config::UpdateConfig;
use crate::core::error::Result;
use crate::remote::HttpSource;
use crate::update::Updater;
use std::time::Duration;

/// Build the updater every command runs against
pub fn build_updater(config: UpdateConfig, timeout: Option<Duration>) -> Result<Updater<HttpSource>> {
    let timeout = timeout.unwrap_or_else(|| config.timeout());
    let remote = HttpSource::new(&config.manifest_url, timeout)?;
    Updater::new(config, remote)
}
