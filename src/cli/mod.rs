//! Command-line interface for selfup

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

/// selfup - self-update toolkit
#[derive(Parser)]
#[command(
    name = "selfup",
    version,
    about = "Check a remote manifest, back up, verify, and atomically swap an artifact",
    long_about = "selfup keeps a managed artifact up to date against a remote version manifest: it backs up the current artifact, downloads and integrity-verifies the replacement, swaps it into place atomically, and rolls back on any failure."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: ~/.selfup/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured network timeout (e.g. "10s", "2m")
    #[arg(long, global = true)]
    pub timeout: Option<humantime::Duration>,

    /// Auto-answer yes to all prompts
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check the remote manifest for a newer version (never mutates)
    Check {
        /// Report in the terse form used by automatic startup checks
        #[arg(long)]
        automatic: bool,
    },

    /// Download, verify, and apply the latest version
    Apply {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show the applied-version history
    History {
        /// Limit output to the last N entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List artifact backups, most recent last
    Backups,

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
