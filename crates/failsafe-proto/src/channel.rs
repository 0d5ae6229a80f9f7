use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Channel id of the print bed. Every other id falls in the hotend class.
pub const BED_CHANNEL: &str = "bed";

/// Channel id under which the board's own SoC reading is folded in.
pub const SOC_CHANNEL: &str = "soc";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelReading {
    pub actual: f64,
    #[serde(default)]
    pub target: f64,
}

impl ChannelReading {
    pub fn new(actual: f64, target: f64) -> Self {
        Self { actual, target }
    }
}

/// Channel id -> reading. Ordered so payloads and scans are deterministic.
pub type Snapshot = BTreeMap<String, ChannelReading>;
