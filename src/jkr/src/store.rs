//! Backup storage.
//!
//! Backups are plain copies of the live save named
//! `{seed}-{ante}-{round}-{epoch seconds}` in a dedicated directory. The
//! filename carries everything needed to list them later; there is no
//! index file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, warn};

use crate::save::SaveRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lists, captures, and restores backup copies in one directory.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        BackupStore { dir: dir.into() }
    }

    /// The backup directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Enumerate backups, dropping entries that do not parse as saves.
    ///
    /// Order is whatever directory enumeration produces; callers sort. A
    /// missing directory is an empty list, not an error.
    pub fn list_backups(&self) -> Vec<SaveRecord> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| SaveRecord::parse(&entry.path()))
            .collect()
    }

    /// Copy the live save into the store, named after its parsed fields and
    /// the current time.
    ///
    /// Returns `None` when the live file is not a parseable save (nothing to
    /// back up yet) or when the copy fails. I/O failures are logged and
    /// swallowed; nothing fatal may escape this path while the game is
    /// running.
    pub fn capture(&self, live: &Path) -> Option<SaveRecord> {
        match self.capture_at(live, unix_now()) {
            Ok(record) => record,
            Err(err) => {
                warn!("backup capture failed for {}: {}", live.display(), err);
                None
            }
        }
    }

    /// Capture with an explicit timestamp (epoch seconds).
    pub fn capture_at(
        &self,
        live: &Path,
        timestamp: f64,
    ) -> Result<Option<SaveRecord>, StoreError> {
        let Some(mut record) = SaveRecord::parse(live) else {
            debug!("{} is not a parseable save, nothing to capture", live.display());
            return Ok(None);
        };

        fs::create_dir_all(&self.dir)?;
        let destination = self.dir.join(backup_file_name(&record, timestamp));
        fs::copy(live, &destination)?;

        record.path = destination;
        record.captured_at = Some(timestamp);
        Ok(Some(record))
    }

    /// Overwrite the live save with a chosen backup.
    ///
    /// Best-effort: the stale live file may legitimately be absent, and a
    /// failed copy is logged and swallowed - the user retries a visibly
    /// failed restore by hand.
    pub fn restore_to(&self, live: &Path, backup: &SaveRecord) {
        let _ = fs::remove_file(live);
        if let Err(err) = fs::copy(&backup.path, live) {
            warn!("restore of {} failed: {}", backup.path.display(), err);
        }
    }
}

/// Canonical backup filename: `{seed}-{ante}-{round}-{epoch seconds}`.
///
/// The timestamp keeps its fractional part, so two captures in quick
/// succession still get distinct names.
fn backup_file_name(record: &SaveRecord, timestamp: f64) -> String {
    format!(
        "{}-{}-{}-{}",
        record.seed, record.ante, record.round, timestamp
    )
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
