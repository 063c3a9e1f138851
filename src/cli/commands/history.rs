//! History command implementation

use crate::config::UpdateConfig;
use crate::history::VersionStore;
use anyhow::Result;
use colored::Colorize;

/// Execute the history command
pub fn execute(config: UpdateConfig, limit: Option<usize>) -> Result<()> {
    let store = VersionStore::open(&config.history_path)?;
    let entries = store.entries();

    if entries.is_empty() {
        println!("No version history recorded.");
        return Ok(());
    }

    let skip = limit.map(|n| entries.len().saturating_sub(n)).unwrap_or(0);

    println!("{}", "Version history:".bright_blue());
    for (i, entry) in entries.iter().enumerate().skip(skip) {
        println!(
            "{}. {} {} - {}",
            i + 1,
            "Version".dimmed(),
            entry.version.bright_cyan(),
            entry.date
        );
        if !entry.description.is_empty() {
            println!("   {}", entry.description);
        }
    }
    println!();
    println!(
        "Current version: {}",
        store.current_version().bright_green()
    );

    Ok(())
}
