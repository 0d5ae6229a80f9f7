use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::monitor::Monitor;

struct Timer {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Timer {
    /// First tick fires immediately. A stop request lets an in-flight tick finish.
    fn start(monitor: Arc<Monitor>, period: Duration) -> Self {
        let (stop, mut stopped) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stopped => break,
                    _ = ticker.tick() => monitor.on_tick().await,
                }
            }
        });
        Self { stop, task }
    }

    async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            warn!("monitor timer ended abnormally: {}", e);
        }
    }
}

/// Owns the single polling timer.
pub struct Scheduler {
    monitor: Arc<Monitor>,
    timer: Mutex<Option<Timer>>,
}

impl Scheduler {
    pub fn new(monitor: Arc<Monitor>) -> Self {
        Self { monitor, timer: Mutex::new(None) }
    }

    pub fn monitor(&self) -> &Arc<Monitor> {
        &self.monitor
    }

    /// Stops the current timer, then starts a new one if settings allow.
    /// Called at startup and after every settings change.
    pub async fn restart(&self) {
        let mut slot = self.timer.lock().await;
        if let Some(timer) = slot.take() {
            debug!("stopping timer");
            timer.stop().await;
        }

        let settings = self.monitor.settings();
        if let Some(period) = settings.tick_interval() {
            debug!("starting timer, every {}s", settings.interval);
            *slot = Some(Timer::start(self.monitor.clone(), period));
        }
    }

    pub async fn shutdown(&self) {
        if let Some(timer) = self.timer.lock().await.take() {
            debug!("stopping timer");
            timer.stop().await;
        }
    }

    pub async fn is_running(&self) -> bool {
        self.timer.lock().await.is_some()
    }
}
