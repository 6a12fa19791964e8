mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jkr=info,jkr_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { save_folder } => {
            commands::watch::handle(save_folder)?;
        }

        Commands::List { save_folder, json } => {
            commands::backups::list(save_folder, json)?;
        }

        Commands::Restore {
            backup,
            save_folder,
        } => {
            commands::backups::restore(&backup, save_folder)?;
        }

        Commands::Current { save_folder } => {
            commands::backups::current(save_folder)?;
        }

        Commands::Configure { save_folder, show } => {
            commands::configure::handle(save_folder, show)?;
        }
    }

    Ok(())
}
