//! selfup CLI
//!
//! Command-line interface for the selfup update subsystem.

use anyhow::Result;
use clap::Parser;
use selfup::cli::{commands, Cli, Commands};
use selfup::config::UpdateConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Completion needs no configuration
    if let Commands::Completion { shell } = &cli.command {
        return commands::completion::execute(*shell);
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => UpdateConfig::default_path()?,
    };
    let config = UpdateConfig::load(&config_path)?;
    let timeout = cli.timeout.map(Into::into);

    // Execute the command
    match cli.command {
        Commands::Check { automatic } => commands::check::execute(config, timeout, automatic),
        Commands::Apply { force } => commands::apply::execute(config, timeout, force, cli.yes),
        Commands::History { limit } => commands::history::execute(config, limit),
        Commands::Backups => commands::backups::execute(config),
        Commands::Completion { .. } => unreachable!("handled above"),
    }
}
