//! Read-through cache over the backend's timer.

use std::sync::Arc;

use client_core::backend::models::TimerState;
use client_core::backend::Backend;
use tokio::sync::Mutex;
use tracing::instrument;
use uuid::Uuid;

use crate::snapshot::SnapshotStore;
use crate::ticker::Ticker;

struct TimerStoreState {
    timer: TimerState,
    loading: bool,
    error: Option<String>,
    ticker: Option<Ticker>,
}

pub(crate) struct TimerInner {
    snapshot: SnapshotStore,
    state: Mutex<TimerStoreState>,
}

impl TimerInner {
    /// Advance the displayed timer by one second while it runs unpaused.
    pub(crate) async fn tick(&self) {
        let mut state = self.state.lock().await;
        if state.timer.is_running && !state.timer.is_paused {
            state.timer.elapsed_secs += 1;
            self.snapshot.save(&state.timer);
        }
    }
}

fn start_ticking(state: &mut TimerStoreState, inner: &Arc<TimerInner>) {
    if state.ticker.is_none() {
        state.ticker = Some(Ticker::spawn(Arc::downgrade(inner)));
    }
}

/// Local copy of the backend timer that the UI reads synchronously.
///
/// The backend stays authoritative: every mutating call goes to it first
/// and the cache adopts whatever it confirms. Command failures land in
/// [`TimerStore::error`] as display text and leave the cached timer
/// untouched, so the worst case is a stale display, never a silently
/// discarded timer.
pub struct TimerStore {
    backend: Arc<dyn Backend>,
    inner: Arc<TimerInner>,
}

impl TimerStore {
    /// Build the store, restoring the last persisted timer for display.
    /// Nothing ticks until [`TimerStore::refresh`] confirms the state
    /// against the backend.
    pub fn new(backend: Arc<dyn Backend>, snapshot: SnapshotStore) -> Self {
        let timer = snapshot.load();
        Self {
            backend,
            inner: Arc::new(TimerInner {
                snapshot,
                state: Mutex::new(TimerStoreState {
                    timer,
                    loading: false,
                    error: None,
                    ticker: None,
                }),
            }),
        }
    }

    /// Cached timer as of the last confirmation or tick.
    pub async fn timer(&self) -> TimerState {
        self.inner.state.lock().await.timer.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.inner.state.lock().await.loading
    }

    /// Display text of the last failed command, cleared by the next one.
    pub async fn error(&self) -> Option<String> {
        self.inner.state.lock().await.error.clone()
    }

    /// Re-read the authoritative state from the backend and adopt it.
    ///
    /// On failure the cached timer is kept as-is; a stale display beats a
    /// wrongly idle one.
    #[instrument(skip(self))]
    pub async fn refresh(&self) {
        match self.backend.get_timer_state().await {
            Ok(timer) => {
                let mut state = self.inner.state.lock().await;
                let ticking = timer.is_running && !timer.is_paused;
                state.timer = timer;
                state.error = None;
                if ticking {
                    start_ticking(&mut state, &self.inner);
                } else {
                    state.ticker = None;
                }
                self.inner.snapshot.save(&state.timer);
            }
            Err(err) => {
                tracing::error!(error = %err, "timer state fetch failed");
                self.inner.state.lock().await.error = Some(err.user_message());
            }
        }
    }

    /// Start a timer on `project_id`, then adopt the confirmed state.
    #[instrument(skip(self))]
    pub async fn start(&self, project_id: Uuid, description: Option<String>) {
        {
            let mut state = self.inner.state.lock().await;
            state.loading = true;
            state.error = None;
        }
        match self.backend.start_timer(project_id, description).await {
            Ok(_) => self.refresh().await,
            Err(err) => {
                tracing::error!(error = %err, "timer start failed");
                self.inner.state.lock().await.error = Some(err.user_message());
            }
        }
        self.inner.state.lock().await.loading = false;
    }

    /// Pause the running timer. The tick task stops before the request so
    /// a late tick cannot advance a timer the backend already paused.
    #[instrument(skip(self))]
    pub async fn pause(&self) {
        {
            let mut state = self.inner.state.lock().await;
            state.ticker = None;
            state.loading = true;
            state.error = None;
        }
        match self.backend.pause_timer().await {
            Ok(_) => self.refresh().await,
            Err(err) => {
                tracing::error!(error = %err, "timer pause failed");
                self.inner.state.lock().await.error = Some(err.user_message());
            }
        }
        self.inner.state.lock().await.loading = false;
    }

    /// Resume the paused timer, then adopt the confirmed state.
    #[instrument(skip(self))]
    pub async fn resume(&self) {
        {
            let mut state = self.inner.state.lock().await;
            state.loading = true;
            state.error = None;
        }
        match self.backend.resume_timer().await {
            Ok(_) => self.refresh().await,
            Err(err) => {
                tracing::error!(error = %err, "timer resume failed");
                self.inner.state.lock().await.error = Some(err.user_message());
            }
        }
        self.inner.state.lock().await.loading = false;
    }

    /// Stop the timer and let the backend turn it into a time entry.
    ///
    /// The tick task stops before the request. The cache resets to idle
    /// only once the backend confirms; on failure the last display stays
    /// frozen until the next refresh.
    #[instrument(skip(self))]
    pub async fn stop(&self) {
        {
            let mut state = self.inner.state.lock().await;
            state.ticker = None;
            state.loading = true;
            state.error = None;
        }
        match self.backend.stop_timer().await {
            Ok(entry) => {
                tracing::info!(
                    duration_secs = entry.duration_secs,
                    "timer stopped, time entry saved"
                );
                let mut state = self.inner.state.lock().await;
                state.timer = TimerState::default();
                self.inner.snapshot.save(&state.timer);
            }
            Err(err) => {
                tracing::error!(error = %err, "timer stop failed");
                self.inner.state.lock().await.error = Some(err.user_message());
            }
        }
        self.inner.state.lock().await.loading = false;
    }

    /// Advance the cached timer by one second if it runs unpaused. The
    /// background task drives this once a second; callers can also drive
    /// it directly.
    pub async fn tick(&self) {
        self.inner.tick().await;
    }

    /// Cancel the background tick task. Call before tearing down the
    /// runtime.
    pub async fn shutdown(&self) {
        self.inner.state.lock().await.ticker = None;
    }
}
