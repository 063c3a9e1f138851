//! Check command implementation

use crate::config::UpdateConfig;
use crate::update::CheckOutcome;
use anyhow::Result;
use colored::Colorize;
use std::time::Duration;

/// Execute the check command (states 1-2 only, no mutation)
pub fn execute(config: UpdateConfig, timeout: Option<Duration>, automatic: bool) -> Result<()> {
    // Automatic startup checks honor the configured opt-out; an
    // explicit `selfup check` always runs.
    if automatic && !config.auto_check {
        return Ok(());
    }

    let updater = super::build_updater(config, timeout)?;

    if !automatic {
        println!("{}", "Checking for updates...".bright_blue());
    }

    match updater.check_for_updates(automatic)? {
        CheckOutcome::UpToDate { current } => {
            println!(
                "{} You're running the latest version: {}",
                "✓".green(),
                current.bright_green()
            );
        }
        CheckOutcome::UpdateAvailable { manifest } => {
            println!(
                "{} Update available: {} → {}",
                "!".bright_yellow(),
                updater.current_version().dimmed(),
                manifest.latest_version.bright_green().bold()
            );
            println!("  Published: {}", manifest.update_time);
            if !manifest.description.trim().is_empty() {
                println!("  {}", manifest.description.trim());
            }
            println!();
            println!("  Run {} to install it.", "selfup apply".bright_cyan());
        }
    }

    Ok(())
}
