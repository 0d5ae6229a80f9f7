//! Periodic temperature checks against configured bounds.
//!
//! [`Monitor::on_tick`] pulls one snapshot, folds in the SoC reading, and
//! raises a fault for each channel outside its bounds. [`Scheduler`] owns the
//! timer that drives it and is restarted whenever settings change.

pub mod doctor;
pub mod monitor;
pub mod payload;
pub mod scheduler;
pub mod settings;
pub mod threshold;

pub use monitor::{FailsafeHook, InertHook, Monitor, NotificationSink, TemperatureSource};
pub use payload::FailsafePayload;
pub use scheduler::Scheduler;
pub use settings::{MonitorSettings, SettingsProvider, SharedSettings, ThresholdSettings};
pub use threshold::{evaluate, ThresholdClass, Thresholds, Violation};
