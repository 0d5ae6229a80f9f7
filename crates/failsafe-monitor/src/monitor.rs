use std::sync::Arc;

use anyhow::Result;
use failsafe_proto::{ChannelReading, FaultEvent, Notification, Snapshot, SOC_CHANNEL};
use failsafe_sbc::SocReader;
use tracing::{debug, error};

use crate::payload::FailsafePayload;
use crate::settings::{MonitorSettings, SettingsProvider};
use crate::threshold::{evaluate, ThresholdClass};

/// Live heater readings from the printer host.
pub trait TemperatureSource: Send + Sync {
    /// Empty when the host has no data yet.
    fn current_temperatures(&self) -> Result<Snapshot>;
    fn is_printing(&self) -> bool;
}

pub trait NotificationSink: Send + Sync {
    fn notify(&self, note: &Notification);
}

/// Receives every fault together with its environment payload.
pub trait FailsafeHook: Send + Sync {
    fn on_fault(&self, event: &FaultEvent, payload: &FailsafePayload);
}

/// Builds nothing on top of the payload; it is only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertHook;

impl FailsafeHook for InertHook {
    fn on_fault(&self, event: &FaultEvent, payload: &FailsafePayload) {
        debug!(channel = %event.channel, vars = payload.len(), "failsafe payload ready, dispatch disabled");
    }
}

pub struct Monitor {
    settings: Arc<dyn SettingsProvider>,
    source: Arc<dyn TemperatureSource>,
    sink: Arc<dyn NotificationSink>,
    hook: Arc<dyn FailsafeHook>,
    soc: Option<SocReader>,
}

impl Monitor {
    pub fn new(
        settings: Arc<dyn SettingsProvider>,
        source: Arc<dyn TemperatureSource>,
        sink: Arc<dyn NotificationSink>,
    ) -> Self {
        Self { settings, source, sink, hook: Arc::new(InertHook), soc: None }
    }

    pub fn with_hook(mut self, hook: Arc<dyn FailsafeHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn with_soc(mut self, soc: SocReader) -> Self {
        self.soc = Some(soc);
        self
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings.settings()
    }

    pub fn soc(&self) -> Option<&SocReader> {
        self.soc.as_ref()
    }

    /// One polling cycle. Never fails: missing data skips the cycle and
    /// violations are reported through the sink and hook.
    pub async fn on_tick(&self) {
        let mut snapshot = match self.source.current_temperatures() {
            Ok(s) if !s.is_empty() => s,
            Ok(_) => {
                debug!("no temperature data");
                return;
            }
            Err(e) => {
                debug!("no temperature data: {:#}", e);
                return;
            }
        };
        debug!("check temps: {:?}", snapshot);

        if let Some(soc) = self.soc.as_ref().filter(|s| s.is_supported()) {
            let temp = soc.read_temperature().await;
            if temp != 0.0 {
                snapshot.insert(SOC_CHANNEL.to_string(), ChannelReading::new(temp, 0.0));
            }
        }

        let settings = self.settings.settings();
        let printing = self.source.is_printing();

        for (channel, reading) in &snapshot {
            let thresholds = settings.thresholds.for_class(ThresholdClass::for_channel(channel));
            let Some(violation) = evaluate(channel, reading.actual, &thresholds, printing) else {
                continue;
            };

            let event = violation.into_event();
            let msg = event.message();
            error!("{}", msg);
            self.sink.notify(&Notification::popup(msg));

            let payload = FailsafePayload::build(channel, &thresholds, &snapshot);
            self.hook.on_fault(&event, &payload);
        }
    }
}
