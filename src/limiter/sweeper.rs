//! Background idle-bucket sweep.

use std::sync::Weak;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::RateLimiter;

/// Handle to a running idle sweep.
///
/// Call [`shutdown`](Self::shutdown) to stop the task and wait for it.
/// Dropping the handle without calling it also signals the task to stop.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub(super) fn spawn(limiter: Weak<RateLimiter>, interval: Duration) -> Self {
        // tokio intervals reject a zero period
        let interval = interval.max(Duration::from_millis(1));
        let (stop, stopped) = watch::channel(false);
        let task = tokio::spawn(run(limiter, interval, stopped));
        info!(interval_secs = interval.as_secs(), "rate limiter sweep started");
        Self { stop, task }
    }

    /// Signal the sweep to stop and wait for the task to exit.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        if let Err(e) = self.task.await {
            debug!(error = %e, "rate limiter sweep task ended abnormally");
        }
    }

    /// Whether the sweep task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn run(limiter: Weak<RateLimiter>, interval: Duration, mut stopped: watch::Receiver<bool>) {
    // interval_at: the first sweep is one full period after start
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let Some(limiter) = limiter.upgrade() else {
                    break;
                };
                let reclaimed = limiter.sweep_idle();
                debug!(reclaimed, tracked = limiter.len(), "rate limiter sweep");
            }
            changed = stopped.changed() => {
                if changed.is_err() || *stopped.borrow() {
                    break;
                }
            }
        }
    }

    info!("rate limiter sweep stopped");
}
