use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ttl::Sweep;

/// Handle to the periodic expired-entry sweep. Dropping it leaves the task
/// running until the runtime shuts down; call [`shutdown`](Self::shutdown) to
/// stop it explicitly.
pub struct SweeperHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
        info!("cache sweeper stopped");
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Shortest period the sweeper will tick at.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Spawn a task that prunes every cache in `targets` once per `interval`,
/// clamped to at least [`MIN_SWEEP_INTERVAL`].
/// Must be called from within a tokio runtime.
pub fn spawn_sweeper(targets: Vec<Arc<dyn Sweep>>, interval: Duration) -> SweeperHandle {
    let interval = interval.max(MIN_SWEEP_INTERVAL);
    let (stop, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // first tick completes immediately
        ticker.tick().await;
        info!(interval_secs = interval.as_secs(), caches = targets.len(), "cache sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    for target in &targets {
                        let removed = target.sweep_expired();
                        if removed > 0 {
                            debug!(cache = target.sweep_name(), removed, "swept expired entries");
                        }
                    }
                }
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
            }
        }
    });

    SweeperHandle { stop, task }
}
