//! Backup listing and restore handlers

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::PathBuf;

use jkr::{SaveCoordinator, SaveRecord};

use super::resolve_paths;

/// Handle `jkr list`
pub fn list(save_folder: Option<PathBuf>, json: bool) -> Result<()> {
    let coordinator = coordinator(save_folder)?;
    let backups = sorted_backups(&coordinator);

    if json {
        let serialized =
            serde_json::to_string_pretty(&backups).context("Failed to serialize backups")?;
        println!("{}", serialized);
        return Ok(());
    }

    if backups.is_empty() {
        println!("No backups yet");
        return Ok(());
    }

    let current = coordinator.current_backup();
    for (index, backup) in backups.iter().enumerate() {
        let marker = if is_current(backup, current.as_ref()) {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:>3}  {}  seed {}  ante {}  round {}",
            marker,
            index + 1,
            format_captured_at(backup),
            backup.seed,
            backup.ante,
            backup.round
        );
    }

    Ok(())
}

/// Handle `jkr restore`
pub fn restore(selector: &str, save_folder: Option<PathBuf>) -> Result<()> {
    let coordinator = coordinator(save_folder)?;
    let backups = sorted_backups(&coordinator);
    let backup = select_backup(&backups, selector)
        .with_context(|| format!("No backup matching '{}' (try 'jkr list')", selector))?;

    coordinator.restore(backup);
    println!(
        "Restored {} (seed {}, ante {}, round {})",
        format_captured_at(backup),
        backup.seed,
        backup.ante,
        backup.round
    );

    Ok(())
}

/// Handle `jkr current`
pub fn current(save_folder: Option<PathBuf>) -> Result<()> {
    let coordinator = coordinator(save_folder)?;

    match coordinator.current_backup() {
        Some(backup) => println!(
            "{} (seed {}, ante {}, round {})",
            format_captured_at(&backup),
            backup.seed,
            backup.ante,
            backup.round
        ),
        None => println!("Live save does not match any backup"),
    }

    Ok(())
}

fn coordinator(save_folder: Option<PathBuf>) -> Result<SaveCoordinator> {
    Ok(SaveCoordinator::new(resolve_paths(save_folder)?))
}

/// Backups sorted newest first - the order `list` prints and `restore`
/// indexes into.
fn sorted_backups(coordinator: &SaveCoordinator) -> Vec<SaveRecord> {
    let mut backups = coordinator.all_backups();
    backups.sort_by(|a, b| {
        b.captured_at
            .partial_cmp(&a.captured_at)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    backups
}

/// Find a backup by 1-based index into the sorted listing, or by filename.
fn select_backup<'a>(backups: &'a [SaveRecord], selector: &str) -> Option<&'a SaveRecord> {
    if let Ok(index) = selector.parse::<usize>() {
        if index == 0 {
            return None;
        }
        return backups.get(index - 1);
    }

    backups
        .iter()
        .find(|backup| backup.path.file_name().and_then(|name| name.to_str()) == Some(selector))
}

fn is_current(backup: &SaveRecord, current: Option<&SaveRecord>) -> bool {
    current.is_some_and(|current| current.path == backup.path)
}

fn format_captured_at(backup: &SaveRecord) -> String {
    let Some(timestamp) = backup.captured_at else {
        return "unknown time".to_string();
    };

    let secs = timestamp as i64;
    let nanos = ((timestamp - secs as f64) * 1e9) as u32;
    DateTime::from_timestamp(secs, nanos)
        .map(|utc| {
            utc.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| timestamp.to_string())
}
