#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::Result;
use failsafe_monitor::{
    FailsafeHook, FailsafePayload, Monitor, MonitorSettings, NotificationSink, TemperatureSource,
    ThresholdSettings,
};
use failsafe_proto::{ChannelReading, FaultEvent, Notification, Snapshot};

pub struct FixedSource {
    pub snapshot: Mutex<Option<Snapshot>>,
    pub printing: bool,
    pub reads: Mutex<usize>,
}

impl FixedSource {
    pub fn new(readings: &[(&str, f64, f64)], printing: bool) -> Self {
        let snap: Snapshot = readings
            .iter()
            .map(|(ch, actual, target)| (ch.to_string(), ChannelReading::new(*actual, *target)))
            .collect();
        Self { snapshot: Mutex::new(Some(snap)), printing, reads: Mutex::new(0) }
    }

    /// A source whose query fails outright.
    pub fn broken() -> Self {
        Self { snapshot: Mutex::new(None), printing: false, reads: Mutex::new(0) }
    }

    pub fn reads(&self) -> usize {
        *self.reads.lock().unwrap()
    }
}

impl TemperatureSource for FixedSource {
    fn current_temperatures(&self) -> Result<Snapshot> {
        *self.reads.lock().unwrap() += 1;
        self.snapshot
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("printer not connected"))
    }

    fn is_printing(&self) -> bool {
        self.printing
    }
}

#[derive(Default)]
pub struct Recorder {
    pub notes: Mutex<Vec<Notification>>,
    pub faults: Mutex<Vec<(FaultEvent, FailsafePayload)>>,
}

impl Recorder {
    pub fn notes(&self) -> Vec<Notification> {
        self.notes.lock().unwrap().clone()
    }

    pub fn faults(&self) -> Vec<(FaultEvent, FailsafePayload)> {
        self.faults.lock().unwrap().clone()
    }
}

impl NotificationSink for Recorder {
    fn notify(&self, note: &Notification) {
        self.notes.lock().unwrap().push(note.clone());
    }
}

impl FailsafeHook for Recorder {
    fn on_fault(&self, event: &FaultEvent, payload: &FailsafePayload) {
        self.faults.lock().unwrap().push((event.clone(), payload.clone()));
    }
}

pub fn settings(thresholds: ThresholdSettings) -> MonitorSettings {
    MonitorSettings { enabled: true, interval: 1, thresholds }
}

pub fn monitor(
    settings: MonitorSettings,
    source: Arc<FixedSource>,
    recorder: Arc<Recorder>,
) -> Monitor {
    Monitor::new(Arc::new(settings), source, recorder.clone()).with_hook(recorder)
}
