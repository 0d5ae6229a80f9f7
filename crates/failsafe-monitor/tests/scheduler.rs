mod support;

use std::sync::Arc;
use std::time::Duration;

use failsafe_monitor::{Monitor, MonitorSettings, Scheduler, SharedSettings, ThresholdSettings};

use support::{FixedSource, Recorder};

fn hot_bed() -> (Arc<FixedSource>, Arc<Recorder>) {
    (Arc::new(FixedSource::new(&[("bed", 90.0, 0.0)], false)), Arc::new(Recorder::default()))
}

fn enabled(interval: i64) -> MonitorSettings {
    MonitorSettings {
        enabled: true,
        interval,
        thresholds: ThresholdSettings { bed: 60, ..Default::default() },
    }
}

#[tokio::test]
async fn restart_runs_first_tick_immediately() {
    let (source, rec) = hot_bed();
    let shared = SharedSettings::new(enabled(60));
    let m = Monitor::new(Arc::new(shared), source, rec.clone()).with_hook(rec.clone());
    let sched = Scheduler::new(Arc::new(m));

    sched.restart().await;
    assert!(sched.is_running().await);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(rec.faults().len(), 1);

    sched.shutdown().await;
    assert!(!sched.is_running().await);
}

#[tokio::test]
async fn disabled_settings_keep_timer_off() {
    let (source, rec) = hot_bed();
    let shared = SharedSettings::new(MonitorSettings { enabled: false, ..enabled(1) });
    let m = Monitor::new(Arc::new(shared.clone()), source.clone(), rec.clone());
    let sched = Scheduler::new(Arc::new(m));

    sched.restart().await;
    assert!(!sched.is_running().await);

    shared.replace(enabled(0));
    sched.restart().await;
    assert!(!sched.is_running().await);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.reads(), 0);
}

#[tokio::test]
async fn settings_change_replaces_timer() {
    let (source, rec) = hot_bed();
    let shared = SharedSettings::new(enabled(60));
    let m = Monitor::new(Arc::new(shared.clone()), source.clone(), rec.clone());
    let sched = Scheduler::new(Arc::new(m));

    sched.restart().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.reads(), 1);

    // new timer ticks right away; disabling afterwards stops polling
    sched.restart().await;
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.reads(), 2);

    shared.replace(MonitorSettings { enabled: false, ..enabled(60) });
    sched.restart().await;
    assert!(!sched.is_running().await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(source.reads(), 2);
}
