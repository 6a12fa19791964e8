//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting up jkr CLI defaults.

use anyhow::{bail, Result};
use std::path::PathBuf;

use jkr::SavePaths;

use crate::config::Config;

/// Handle the configure command
///
/// # Arguments
/// * `save_folder` - Optional save folder to set as default
/// * `show` - If true, show current configuration
pub fn handle(save_folder: Option<PathBuf>, show: bool) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config)?;
        return Ok(());
    }

    if let Some(folder) = save_folder {
        set_save_folder(&mut config, folder)?;
    } else {
        show_usage();
    }

    Ok(())
}

/// Display current configuration
fn show_config(config: &Config) -> Result<()> {
    if let Some(folder) = config.get_save_folder() {
        println!("Save folder: {}", folder);
    } else {
        println!("No save folder configured");
        if let Some(detected) = jkr::detect_save_directory() {
            println!("Detected: {}", detected.display());
        }
    }

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }

    Ok(())
}

/// Set the save folder in configuration
fn set_save_folder(config: &mut Config, folder: PathBuf) -> Result<()> {
    let paths = SavePaths::new(&folder);
    if !paths.is_balatro_folder() {
        bail!(
            "{} does not look like a Balatro save folder (expected a path ending in {})",
            folder.display(),
            jkr::SAVE_FOLDER_SUFFIX
        );
    }

    let folder = folder.to_string_lossy().into_owned();
    config.set_save_folder(folder.clone());
    config.save()?;

    println!("Save folder configured: {}", folder);
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: jkr configure --save-folder PATH");
    println!("   or: jkr configure --show");
    println!();
    println!("Note: the save folder is Balatro's data directory, ending in");
    println!("      AppData/Roaming/Balatro (under the Proton prefix on Linux).");
}
