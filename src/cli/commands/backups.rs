//! Backups command implementation

use crate::backup::BackupManager;
use crate::config::UpdateConfig;
use anyhow::Result;
use colored::Colorize;

/// Execute the backups command
pub fn execute(config: UpdateConfig) -> Result<()> {
    let manager = BackupManager::new(&config.backup_dir);
    let records = manager.list()?;

    if records.is_empty() {
        println!(
            "No backups in {}",
            manager.backup_dir().display().to_string().dimmed()
        );
        return Ok(());
    }

    println!("{}", "Backups (most recent last):".bright_blue());
    for record in &records {
        println!(
            "  {} {} {}",
            record.version.bright_cyan(),
            record
                .created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
                .dimmed(),
            record.path.display()
        );
    }

    Ok(())
}
