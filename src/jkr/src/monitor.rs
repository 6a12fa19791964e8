//! Directory change monitoring.
//!
//! Wraps the platform file watcher behind a start/stop interface that
//! delivers `(path, ChangeFlags)` pairs to one registered handler on a
//! dedicated dispatch thread. Watcher backends disagree about granularity
//! and batching, so raw events are reduced to a small semantic flag set and
//! batches are coalesced per path before dispatch.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;

use notify::event::{AccessKind, AccessMode, ModifyKind};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, warn};

/// Semantic change classification bitmask.
///
/// Folds the watcher backend's event vocabulary into the handful of
/// distinctions callers care about.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeFlags(pub u32);

impl ChangeFlags {
    pub(crate) const CREATED: u32 = 1; // bit 0 - path came into existence
    pub(crate) const REMOVED: u32 = 2; // bit 1 - path deleted
    pub(crate) const MODIFIED: u32 = 4; // bit 2 - content changed
    pub(crate) const RENAMED: u32 = 8; // bit 3 - path renamed
    pub(crate) const METADATA: u32 = 16; // bit 4 - permissions/timestamps changed

    /// Create flags from a raw u32 value.
    pub fn from_raw(bits: u32) -> Self {
        Self(bits)
    }

    /// Get the raw u32 value.
    pub fn to_raw(self) -> u32 {
        self.0
    }

    /// Classify a raw watcher event kind.
    ///
    /// A close-after-write counts as a modification: on inotify platforms it
    /// is the signal that the game finished writing the save.
    pub fn from_event_kind(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => Self(Self::CREATED),
            EventKind::Remove(_) => Self(Self::REMOVED),
            EventKind::Modify(ModifyKind::Name(_)) => Self(Self::RENAMED),
            EventKind::Modify(ModifyKind::Metadata(_)) => Self(Self::METADATA),
            EventKind::Modify(_) => Self(Self::MODIFIED),
            EventKind::Access(AccessKind::Close(AccessMode::Write)) => Self(Self::MODIFIED),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => Self(0),
        }
    }

    /// Check if the path came into existence.
    pub fn is_created(&self) -> bool {
        self.0 & Self::CREATED != 0
    }

    /// Check if the path was deleted.
    pub fn is_removed(&self) -> bool {
        self.0 & Self::REMOVED != 0
    }

    /// Check if the content changed.
    pub fn is_modified(&self) -> bool {
        self.0 & Self::MODIFIED != 0
    }

    /// Check if the path was renamed.
    pub fn is_renamed(&self) -> bool {
        self.0 & Self::RENAMED != 0
    }

    /// Check if only metadata changed.
    pub fn is_metadata(&self) -> bool {
        self.0 & Self::METADATA != 0
    }

    /// True when the event carried no classification we track.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Callback receiving one `(path, flags)` pair per changed path.
pub type ChangeHandler = dyn Fn(&Path, ChangeFlags) + Send + Sync;

type WatchResult = Result<notify::Event, notify::Error>;

/// Watches one directory subtree and feeds change events to a handler.
///
/// `start` and `stop` are both idempotent. The underlying watcher handle is
/// released exactly once - it is taken out of its slot on the first `stop`
/// (or on drop), which closes the event channel and ends the dispatch
/// thread.
///
/// Events originating from this process are not filtered out here; a caller
/// that rewrites files under the watched directory must arrange its own
/// suppression.
pub struct FileMonitor {
    dir: PathBuf,
    handler: Arc<ChangeHandler>,
    watcher: Option<RecommendedWatcher>,
}

impl FileMonitor {
    /// Create a monitor for `dir`. No subscription exists until
    /// [`start`](Self::start) is called.
    pub fn new(
        dir: impl Into<PathBuf>,
        handler: impl Fn(&Path, ChangeFlags) + Send + Sync + 'static,
    ) -> Self {
        FileMonitor {
            dir: dir.into(),
            handler: Arc::new(handler),
            watcher: None,
        }
    }

    /// Establish the subscription and start dispatching events.
    ///
    /// Returns `false` if already started, or if the watcher could not be
    /// registered. On success, events flow to the handler on a dedicated
    /// thread until [`stop`](Self::stop).
    pub fn start(&mut self) -> bool {
        if self.watcher.is_some() {
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let mut watcher = match RecommendedWatcher::new(
            move |result| {
                let _ = tx.send(result);
            },
            Config::default(),
        ) {
            Ok(watcher) => watcher,
            Err(err) => {
                warn!("failed to create file watcher: {}", err);
                return false;
            }
        };

        if let Err(err) = watcher.watch(&self.dir, RecursiveMode::Recursive) {
            warn!("failed to watch {}: {}", self.dir.display(), err);
            return false;
        }

        let handler = Arc::clone(&self.handler);
        thread::spawn(move || dispatch_events(&rx, &*handler));

        self.watcher = Some(watcher);
        true
    }

    /// Tear down the subscription.
    ///
    /// Safe to call repeatedly or when never started.
    pub fn stop(&mut self) {
        self.watcher.take();
    }

    /// Whether a subscription is currently live.
    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }
}

impl Drop for FileMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Receive loop for the dispatch thread.
///
/// Each wakeup drains whatever the watcher has queued, coalescing flags per
/// path (last classification wins; batches carry no ordering guarantee worth
/// preserving), then invokes the handler once per distinct path. Exits when
/// the watcher is dropped and the channel disconnects.
fn dispatch_events(rx: &mpsc::Receiver<WatchResult>, handler: &ChangeHandler) {
    while let Ok(first) = rx.recv() {
        let mut batch: HashMap<PathBuf, ChangeFlags> = HashMap::new();
        coalesce(&mut batch, first);
        while let Ok(result) = rx.try_recv() {
            coalesce(&mut batch, result);
        }

        for (path, flags) in batch {
            if flags.is_empty() {
                debug!("ignoring unclassified event for {}", path.display());
                continue;
            }
            handler(&path, flags);
        }
    }
}

fn coalesce(batch: &mut HashMap<PathBuf, ChangeFlags>, result: WatchResult) {
    match result {
        Ok(event) => {
            let flags = ChangeFlags::from_event_kind(&event.kind);
            for path in event.paths {
                batch.insert(path, flags);
            }
        }
        Err(err) => warn!("file watcher error: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
    use std::time::Duration;

    #[test]
    fn test_flag_classification() {
        assert!(ChangeFlags::from_event_kind(&EventKind::Create(CreateKind::File)).is_created());
        assert!(ChangeFlags::from_event_kind(&EventKind::Remove(RemoveKind::File)).is_removed());
        assert!(ChangeFlags::from_event_kind(&EventKind::Modify(ModifyKind::Data(
            DataChange::Content
        )))
        .is_modified());
        assert!(ChangeFlags::from_event_kind(&EventKind::Modify(ModifyKind::Name(
            RenameMode::Both
        )))
        .is_renamed());
        assert!(ChangeFlags::from_event_kind(&EventKind::Modify(ModifyKind::Metadata(
            MetadataKind::WriteTime
        )))
        .is_metadata());
        assert!(ChangeFlags::from_event_kind(&EventKind::Access(AccessKind::Close(
            AccessMode::Write
        )))
        .is_modified());
        assert!(ChangeFlags::from_event_kind(&EventKind::Other).is_empty());
    }

    #[test]
    fn test_batch_coalescing_is_last_one_wins() {
        let mut batch = HashMap::new();
        let path = PathBuf::from("/watched/save.jkr");

        let removed = notify::Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(path.clone());
        let modified = notify::Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Any)))
            .add_path(path.clone());

        coalesce(&mut batch, Ok(removed));
        coalesce(&mut batch, Ok(modified));

        assert_eq!(batch.len(), 1);
        assert!(batch[&path].is_modified());
        assert!(!batch[&path].is_removed());
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut monitor = FileMonitor::new(dir.path(), |_, _| {});

        assert!(monitor.start());
        assert!(!monitor.start());
        assert!(monitor.is_running());

        monitor.stop();
        monitor.stop();
        assert!(!monitor.is_running());
    }

    #[test]
    fn test_start_fails_for_missing_directory() {
        let mut monitor = FileMonitor::new("/nonexistent/jkr-monitor-test", |_, _| {});
        assert!(!monitor.start());
        assert!(!monitor.is_running());
    }

    #[test]
    fn test_delivers_change_for_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = mpsc::channel();
        let mut monitor = FileMonitor::new(dir.path(), move |path, flags| {
            let _ = tx.send((path.to_path_buf(), flags));
        });
        assert!(monitor.start());

        std::fs::write(dir.path().join("save.jkr"), b"return {}").unwrap();

        let (path, flags) = rx
            .recv_timeout(Duration::from_secs(10))
            .expect("no event within timeout");
        assert_eq!(path.file_name().unwrap(), "save.jkr");
        assert!(flags.is_created() || flags.is_modified());
    }
}
