//! Shared harness for end-to-end workflow tests.
//!
//! Wires the real stores to the in-memory backend the way the desktop
//! shell wires them to the real one, with a throwaway snapshot location
//! per context.

use std::path::PathBuf;
use std::sync::{Arc, Once};

use anyhow::Result;
use client_core::backend::MockBackend;
use client_core::settings::SettingsStore;
use tempfile::TempDir;
use timer_sync::{SnapshotStore, TimerStore};

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,workflow_tests=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Everything a workflow test works with.
///
/// Each test creates its own context, so backends and snapshot files are
/// never shared between tests.
pub struct WorkflowContext {
    pub backend: Arc<MockBackend>,
    pub timer: TimerStore,
    pub settings: SettingsStore,
    pub snapshot_path: PathBuf,
    _snapshot_dir: TempDir,
}

impl WorkflowContext {
    /// Create a context with a fresh backend and an empty snapshot dir.
    pub fn new() -> Result<Self> {
        init_tracing();

        let backend = Arc::new(MockBackend::new());
        let snapshot_dir = tempfile::tempdir()?;
        let snapshot_path = snapshot_dir.path().join("timer-snapshot.json");
        let timer = TimerStore::new(backend.clone(), SnapshotStore::new(snapshot_path.clone()));
        let settings = SettingsStore::new(backend.clone());

        Ok(Self {
            backend,
            timer,
            settings,
            snapshot_path,
            _snapshot_dir: snapshot_dir,
        })
    }

    /// Rebuild the stores on the same backend and snapshot file, as if
    /// the app was closed and reopened.
    pub fn restart(self) -> Self {
        let timer = TimerStore::new(
            self.backend.clone(),
            SnapshotStore::new(self.snapshot_path.clone()),
        );
        let settings = SettingsStore::new(self.backend.clone());
        Self {
            timer,
            settings,
            backend: self.backend,
            snapshot_path: self.snapshot_path,
            _snapshot_dir: self._snapshot_dir,
        }
    }
}
