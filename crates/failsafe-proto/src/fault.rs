use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Which threshold direction was crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bound {
    High,
    Low,
}

impl Bound {
    pub fn symbol(self) -> &'static str {
        match self {
            Bound::High => ">",
            Bound::Low => "<",
        }
    }
}

/// A single threshold violation, built when detected and handed off right away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultEvent {
    pub ts_unix_ms: i64,
    pub channel: String,
    pub value: f64,
    pub bound: Bound,
    pub threshold: i64,
}

impl FaultEvent {
    pub fn now(channel: impl Into<String>, value: f64, bound: Bound, threshold: i64) -> Self {
        Self {
            ts_unix_ms: (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64,
            channel: channel.into(),
            value,
            bound,
            threshold,
        }
    }

    /// Human-readable line shown to the user and written to the error log.
    pub fn message(&self) -> String {
        format!(
            "TemperatureFailSafe violation, heater: {}: {}C {} {}C",
            self.channel,
            fmt_celsius(self.value),
            self.bound.symbol(),
            self.threshold
        )
    }
}

/// Renders a reading with at least one decimal place (`65.0`, `42.8`).
pub fn fmt_celsius(v: f64) -> String {
    format!("{:?}", v)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Popup,
}

/// Message delivered to whatever UI or log the host provides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub msg: String,
}

impl Notification {
    pub fn popup(msg: impl Into<String>) -> Self {
        Self { kind: NotificationKind::Popup, msg: msg.into() }
    }
}
