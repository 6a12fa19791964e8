//! Watch command handler

use anyhow::{bail, Result};
use std::path::PathBuf;
use std::thread;
use tracing::info;

use jkr::SaveCoordinator;

use super::resolve_paths;

/// Run the headless auto-backup loop until the process is killed.
pub fn handle(save_folder: Option<PathBuf>) -> Result<()> {
    let paths = resolve_paths(save_folder)?;
    let mut coordinator = SaveCoordinator::new(paths);

    let started = coordinator.start_auto_backup(|backup| {
        info!(
            "captured {} (seed {}, ante {}, round {})",
            backup.path.display(),
            backup.seed,
            backup.ante,
            backup.round
        );
    });
    if !started {
        bail!("failed to subscribe to file change notifications for the save folder");
    }

    info!(
        "watching {}",
        coordinator.paths().save_folder().display()
    );

    // Captures arrive on the monitor thread; nothing left to do here.
    loop {
        thread::park();
    }
}
