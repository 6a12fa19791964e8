//! Command handlers for jkr CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod backups;
pub mod configure;
pub mod watch;

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use jkr::SavePaths;

use crate::config::Config;

/// Resolve the save folder from argument, configuration, or detection, and
/// reject anything that does not look like a Balatro save folder.
pub fn resolve_paths(provided: Option<PathBuf>) -> Result<SavePaths> {
    let folder = match provided {
        Some(folder) => folder,
        None => configured_or_detected()?,
    };

    let paths = SavePaths::new(folder);
    if !paths.is_balatro_folder() {
        bail!(
            "{} does not look like a Balatro save folder (expected a path ending in {})",
            paths.save_folder().display(),
            jkr::SAVE_FOLDER_SUFFIX
        );
    }

    Ok(paths)
}

fn configured_or_detected() -> Result<PathBuf> {
    let config = Config::load()?;
    if let Some(folder) = config.get_save_folder() {
        return Ok(PathBuf::from(folder));
    }

    jkr::detect_save_directory().context(
        "No save folder configured and none detected. \
         Run 'jkr configure --save-folder PATH' or pass --save-folder.",
    )
}
