//! Auto-backup orchestration.
//!
//! [`SaveCoordinator`] owns the change monitor subscription and the backup
//! store, and layers the one piece of real state on top: a suppression
//! window that keeps a restore's own filesystem echo from being captured as
//! a fresh backup.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::monitor::{ChangeFlags, FileMonitor};
use crate::paths::SavePaths;
use crate::save::SaveRecord;
use crate::store::BackupStore;

/// Default length of the post-restore suppression window.
///
/// Must outlast the watcher's coalescing latency around the restore copy.
pub const DEFAULT_SUPPRESS_WINDOW: Duration = Duration::from_secs(2);

/// Time-bounded blind spot for self-triggered change events.
///
/// Armed right before a restore and considered active until the deadline
/// passes. Re-arming overwrites the deadline, so overlapping restores hold
/// the window until the later of the two. Expiry is a plain clock
/// comparison - there is no timer to cancel.
#[derive(Debug)]
struct SuppressionWindow {
    window: Duration,
    until: Mutex<Option<Instant>>,
}

impl SuppressionWindow {
    fn new(window: Duration) -> Self {
        SuppressionWindow {
            window,
            until: Mutex::new(None),
        }
    }

    fn arm(&self) {
        let deadline = Instant::now() + self.window;
        *self.until.lock().unwrap_or_else(PoisonError::into_inner) = Some(deadline);
    }

    fn active(&self) -> bool {
        self.until
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|deadline| Instant::now() < deadline)
    }
}

/// Event-side half of the coordinator, shared with the monitor thread.
struct AutoBackupHandler {
    live: PathBuf,
    store: BackupStore,
    suppression: Arc<SuppressionWindow>,
    on_new_backup: Box<dyn Fn(SaveRecord) + Send + Sync>,
}

impl AutoBackupHandler {
    /// React to one delivered change event.
    fn handle(&self, path: &Path, _flags: ChangeFlags) {
        if self.suppression.active() {
            debug!("suppression window active, ignoring {}", path.display());
            return;
        }
        if path != self.live {
            return;
        }
        if let Some(record) = self.store.capture(&self.live) {
            (self.on_new_backup)(record);
        }
    }
}

/// Watches one save folder, capturing backups on change and restoring them
/// on request.
pub struct SaveCoordinator {
    paths: SavePaths,
    store: BackupStore,
    suppression: Arc<SuppressionWindow>,
    monitor: Option<FileMonitor>,
}

impl SaveCoordinator {
    /// Create a coordinator for one save folder.
    pub fn new(paths: SavePaths) -> Self {
        Self::with_suppress_window(paths, DEFAULT_SUPPRESS_WINDOW)
    }

    /// Create a coordinator with a custom suppression window.
    pub fn with_suppress_window(paths: SavePaths, window: Duration) -> Self {
        let store = BackupStore::new(paths.backup_dir());
        SaveCoordinator {
            paths,
            store,
            suppression: Arc::new(SuppressionWindow::new(window)),
            monitor: None,
        }
    }

    /// Start capturing a backup for every external change to the live save.
    ///
    /// Watches the save folder and invokes `on_new_backup` from the monitor
    /// thread for each successful capture. Returns whether the watcher
    /// subscription was established; calling again while running is a no-op
    /// that returns `false`.
    pub fn start_auto_backup<F>(&mut self, on_new_backup: F) -> bool
    where
        F: Fn(SaveRecord) + Send + Sync + 'static,
    {
        if self.monitor.is_none() {
            let handler = self.auto_backup_handler(on_new_backup);
            self.monitor = Some(FileMonitor::new(
                self.paths.save_folder(),
                move |path, flags| handler.handle(path, flags),
            ));
        }
        match self.monitor.as_mut() {
            Some(monitor) => monitor.start(),
            None => false,
        }
    }

    /// Stop watching.
    ///
    /// Redundant stops are no-ops. A still-armed suppression window is left
    /// to expire on its own; idle is the safe state anyway.
    pub fn stop_auto_backup(&mut self) {
        if let Some(monitor) = self.monitor.as_mut() {
            monitor.stop();
        }
    }

    /// Restore a backup over the live save.
    ///
    /// Arms the suppression window first: the restore copy below generates a
    /// change event for the watched file, which must not be captured as a
    /// new backup.
    pub fn restore(&self, backup: &SaveRecord) {
        self.suppression.arm();
        self.store.restore_to(&self.paths.live_save(), backup);
    }

    /// The backup whose payload matches the live save byte for byte, if any.
    ///
    /// A linear scan; backup counts stay small enough that an index would be
    /// overhead without payoff.
    pub fn current_backup(&self) -> Option<SaveRecord> {
        let live = SaveRecord::parse(&self.paths.live_save())?;
        self.store
            .list_backups()
            .into_iter()
            .find(|backup| *backup == live)
    }

    /// All stored backups, unordered.
    pub fn all_backups(&self) -> Vec<SaveRecord> {
        self.store.list_backups()
    }

    /// The paths this coordinator operates on.
    pub fn paths(&self) -> &SavePaths {
        &self.paths
    }

    fn auto_backup_handler<F>(&self, on_new_backup: F) -> AutoBackupHandler
    where
        F: Fn(SaveRecord) + Send + Sync + 'static,
    {
        AutoBackupHandler {
            live: self.paths.live_save(),
            store: self.store.clone(),
            suppression: Arc::clone(&self.suppression),
            on_new_backup: Box::new(on_new_backup),
        }
    }
}
