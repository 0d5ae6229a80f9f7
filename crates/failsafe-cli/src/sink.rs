use failsafe_monitor::{FailsafeHook, FailsafePayload, NotificationSink};
use failsafe_proto::{FaultEvent, Notification};
use tracing::warn;

/// Writes each notification to stdout as one JSON line for the host UI to pick up.
pub struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&self, note: &Notification) {
        match serde_json::to_string(note) {
            Ok(line) => println!("{}", line),
            Err(e) => warn!("notification not serialisable: {}", e),
        }
    }
}

/// Prints the payload as `KEY=VALUE` lines, used by `failsafe check`.
pub struct EnvPrintHook;

impl FailsafeHook for EnvPrintHook {
    fn on_fault(&self, _event: &FaultEvent, payload: &FailsafePayload) {
        for (k, v) in payload.iter() {
            println!("{}={}", k, v);
        }
    }
}
