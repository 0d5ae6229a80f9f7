use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::threshold::{ThresholdClass, Thresholds};

/// Raw per-class bounds as configured. 0 disables a bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThresholdSettings {
    pub bed: i64,
    pub bed_low: i64,
    /// Shared by every non-bed heater.
    pub hotend: i64,
    pub hotend_low: i64,
    pub soc: i64,
    pub soc_low: i64,
}

impl ThresholdSettings {
    pub fn for_class(&self, class: ThresholdClass) -> Thresholds {
        match class {
            ThresholdClass::Bed => Thresholds::from_config(self.bed, self.bed_low),
            ThresholdClass::Hotend => Thresholds::from_config(self.hotend, self.hotend_low),
            ThresholdClass::Soc => Thresholds::from_config(self.soc, self.soc_low),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorSettings {
    pub enabled: bool,
    /// Seconds between ticks.
    pub interval: i64,
    pub thresholds: ThresholdSettings,
}

impl MonitorSettings {
    /// Tick period, or `None` when the timer should not run.
    pub fn tick_interval(&self) -> Option<Duration> {
        if self.enabled && self.interval > 0 {
            Some(Duration::from_secs(self.interval as u64))
        } else {
            None
        }
    }
}

/// Source of current settings; read on every tick and on every restart.
pub trait SettingsProvider: Send + Sync {
    fn settings(&self) -> MonitorSettings;
}

impl SettingsProvider for MonitorSettings {
    fn settings(&self) -> MonitorSettings {
        self.clone()
    }
}

/// Settings that can be swapped at runtime, e.g. on a config reload.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings(Arc<Mutex<MonitorSettings>>);

impl SharedSettings {
    pub fn new(settings: MonitorSettings) -> Self {
        Self(Arc::new(Mutex::new(settings)))
    }

    pub fn replace(&self, settings: MonitorSettings) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = settings;
    }
}

impl SettingsProvider for SharedSettings {
    fn settings(&self) -> MonitorSettings {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
