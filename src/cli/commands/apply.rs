//! Apply command implementation

use crate::config::UpdateConfig;
use crate::core::error::UpdateError;
use crate::update::{ApplyOutcome, CheckOutcome};
use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use std::time::Duration;

/// Execute the apply command: the full update pipeline
pub fn execute(
    config: UpdateConfig,
    timeout: Option<Duration>,
    force: bool,
    yes: bool,
) -> Result<()> {
    let mut updater = super::build_updater(config, timeout)?;

    println!("{}", "Checking for updates...".bright_blue());
    let manifest = match updater.check_for_updates(false)? {
        CheckOutcome::UpToDate { current } => {
            println!(
                "{} You're running the latest version: {}",
                "✓".green(),
                current.bright_green()
            );
            return Ok(());
        }
        CheckOutcome::UpdateAvailable { manifest } => manifest,
    };

    println!(
        "{} Update available: {} → {}",
        "!".bright_yellow(),
        updater.current_version().dimmed(),
        manifest.latest_version.bright_green().bold()
    );
    if !manifest.description.trim().is_empty() {
        println!("  {}", manifest.description.trim());
    }
    println!();

    let should_apply = if force || yes {
        true
    } else if !atty::is(atty::Stream::Stdin) {
        // Never mutate from a non-interactive invocation without --force
        false
    } else {
        Confirm::new()
            .with_prompt("Download and install this update?")
            .default(true)
            .interact()?
    };

    if !should_apply {
        println!("Update cancelled.");
        return Ok(());
    }

    match updater.apply_update(Some(manifest)) {
        Ok(ApplyOutcome::Updated {
            new_version,
            backup,
            old_artifact,
        }) => {
            println!();
            println!(
                "{} Updated to version {}",
                "✓".green().bold(),
                new_version.bright_green()
            );
            println!(
                "  Backup: {}",
                backup.path.display().to_string().dimmed()
            );
            println!(
                "  Previous artifact retained: {}",
                old_artifact.display().to_string().dimmed()
            );
            println!(
                "{}",
                "Restart the application for the update to take effect.".yellow()
            );
        }
        Ok(ApplyOutcome::AlreadyUpToDate { current }) => {
            println!(
                "{} Already up to date: {}",
                "✓".green(),
                current.bright_green()
            );
        }
        Err(e @ UpdateError::UnrecoverableSwap { .. }) => {
            // The one condition that needs a human
            eprintln!("{} {}", "FATAL:".red().bold(), e);
            return Err(e.into());
        }
        Err(e) => {
            println!("{} Update failed: {}", "✗".red(), e);
            println!("  The current artifact and version history are unchanged.");
        }
    }

    Ok(())
}
