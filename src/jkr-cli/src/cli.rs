//! CLI argument definitions for jkr

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jkr")]
#[command(about = "Balatro save backup manager", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the save folder and capture a backup on every save
    #[command(visible_alias = "w")]
    Watch {
        /// Save folder (uses the configured default, or auto-detection)
        #[arg(short, long)]
        save_folder: Option<PathBuf>,
    },

    /// List captured backups, newest first
    #[command(visible_alias = "l")]
    List {
        /// Save folder (uses the configured default, or auto-detection)
        #[arg(short, long)]
        save_folder: Option<PathBuf>,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },

    /// Restore a backup over the live save
    #[command(visible_alias = "r")]
    Restore {
        /// Backup to restore: a 1-based index from `jkr list`, or a filename
        backup: String,

        /// Save folder (uses the configured default, or auto-detection)
        #[arg(short, long)]
        save_folder: Option<PathBuf>,
    },

    /// Show which backup matches the live save
    Current {
        /// Save folder (uses the configured default, or auto-detection)
        #[arg(short, long)]
        save_folder: Option<PathBuf>,
    },

    /// Configure default settings
    #[command(visible_alias = "c")]
    Configure {
        /// Set the default save folder
        #[arg(long)]
        save_folder: Option<PathBuf>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}
