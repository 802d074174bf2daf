//! Timer state persisted across app restarts.

use std::path::{Path, PathBuf};

use client_core::backend::models::TimerState;
use serde::{Deserialize, Serialize};

/// Bump when the snapshot layout changes; files from other versions are
/// discarded on load.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    timer: TimerState,
}

/// Reads and writes the timer snapshot file.
///
/// Loading never fails: a missing, unreadable, corrupt, or out-of-date
/// snapshot all come back as the idle timer.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> TimerState {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no timer snapshot");
                return TimerState::default();
            }
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to read timer snapshot"
                );
                return TimerState::default();
            }
        };

        let snapshot: Snapshot = match serde_json::from_slice(&bytes) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding corrupt timer snapshot"
                );
                return TimerState::default();
            }
        };

        if snapshot.version != SNAPSHOT_VERSION {
            tracing::warn!(
                found = snapshot.version,
                expected = SNAPSHOT_VERSION,
                "discarding timer snapshot from another version"
            );
            return TimerState::default();
        }
        snapshot.timer
    }

    /// Best effort. A snapshot that cannot be written only costs the next
    /// launch its restored timer, so failures are logged and swallowed.
    pub fn save(&self, timer: &TimerState) {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            timer: timer.clone(),
        };
        let bytes = match serde_json::to_vec(&snapshot) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize timer snapshot");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                tracing::warn!(
                    path = %parent.display(),
                    error = %err,
                    "failed to create snapshot directory"
                );
                return;
            }
        }
        if let Err(err) = std::fs::write(&self.path, bytes) {
            tracing::warn!(
                path = %self.path.display(),
                error = %err,
                "failed to write timer snapshot"
            );
        }
    }
}
