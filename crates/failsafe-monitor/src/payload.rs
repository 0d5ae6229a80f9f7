use std::collections::BTreeMap;

use failsafe_proto::fault::fmt_celsius;
use failsafe_proto::Snapshot;
use serde::Serialize;

use crate::threshold::Thresholds;

pub const ENV_PREFIX: &str = "TEMPERATURE_FAILSAFE";

/// Flat string map describing a fault, shaped as environment variables for
/// an external handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailsafePayload(BTreeMap<String, String>);

impl FailsafePayload {
    pub fn build(fault_channel: &str, thresholds: &Thresholds, snapshot: &Snapshot) -> Self {
        let mut env = BTreeMap::new();
        env.insert(format!("{}_FAULT_TOOL", ENV_PREFIX), fault_channel.to_string());
        env.insert(
            format!("{}_FAULT_HIGH_THRESHOLD", ENV_PREFIX),
            thresholds.high.unwrap_or(0).to_string(),
        );
        env.insert(
            format!("{}_FAULT_LOW_THRESHOLD", ENV_PREFIX),
            thresholds.low.unwrap_or(0).to_string(),
        );

        for (channel, reading) in snapshot {
            let ch = channel.to_uppercase();
            env.insert(format!("{}_{}_ACTUAL", ENV_PREFIX, ch), fmt_celsius(reading.actual));
            env.insert(format!("{}_{}_TARGET", ENV_PREFIX, ch), fmt_celsius(reading.target));
        }
        Self(env)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_env(self) -> BTreeMap<String, String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use failsafe_proto::ChannelReading;

    #[test]
    fn payload_keys() {
        let mut snap = Snapshot::new();
        snap.insert("bed".into(), ChannelReading::new(65.0, 60.0));
        snap.insert("tool0".into(), ChannelReading::new(210.5, 215.0));

        let p = FailsafePayload::build("bed", &Thresholds { high: Some(60), low: None }, &snap);
        assert_eq!(p.len(), 7);
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_FAULT_TOOL"), Some("bed"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_FAULT_HIGH_THRESHOLD"), Some("60"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_FAULT_LOW_THRESHOLD"), Some("0"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_BED_ACTUAL"), Some("65.0"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_BED_TARGET"), Some("60.0"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_TOOL0_ACTUAL"), Some("210.5"));
        assert_eq!(p.get("TEMPERATURE_FAILSAFE_TOOL0_TARGET"), Some("215.0"));
    }
}
