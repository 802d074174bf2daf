//! One-second tick task behind the running timer display.

use std::sync::Weak;
use std::time::Duration;

use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

use crate::store::TimerInner;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Handle to the background tick task. Dropping it cancels the task.
pub(crate) struct Ticker {
    token: CancellationToken,
}

impl Ticker {
    /// Spawn a task that advances the cached timer once a second until the
    /// handle is dropped or the store is gone.
    pub(crate) fn spawn(inner: Weak<TimerInner>) -> Self {
        let token = CancellationToken::new();
        let task_token = token.clone();
        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            loop {
                tokio::select! {
                    _ = task_token.cancelled() => break,
                    _ = interval.tick() => {
                        let Some(inner) = inner.upgrade() else { break };
                        inner.tick().await;
                    }
                }
            }
        });
        Self { token }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
