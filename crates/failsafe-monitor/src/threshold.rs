use failsafe_proto::{Bound, FaultEvent, BED_CHANNEL, SOC_CHANNEL};

/// Which configured bound pair a channel is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdClass {
    Bed,
    /// Every extruder shares one pair.
    Hotend,
    Soc,
}

impl ThresholdClass {
    pub fn for_channel(channel: &str) -> Self {
        match channel {
            BED_CHANNEL => ThresholdClass::Bed,
            SOC_CHANNEL => ThresholdClass::Soc,
            _ => ThresholdClass::Hotend,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub high: Option<i64>,
    pub low: Option<i64>,
}

impl Thresholds {
    /// A configured value of 0 means the bound is not checked.
    pub fn from_config(high: i64, low: i64) -> Self {
        Self {
            high: (high != 0).then_some(high),
            low: (low != 0).then_some(low),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub channel: String,
    pub actual: f64,
    pub bound: Bound,
    pub threshold: i64,
}

impl Violation {
    pub fn into_event(self) -> FaultEvent {
        FaultEvent::now(self.channel, self.actual, self.bound, self.threshold)
    }
}

/// High wins over low. Low is only checked while printing: a cold idle
/// heater is expected.
pub fn evaluate(channel: &str, actual: f64, thresholds: &Thresholds, is_printing: bool) -> Option<Violation> {
    let hit = |bound, threshold| Violation { channel: channel.to_string(), actual, bound, threshold };

    if let Some(high) = thresholds.high {
        if actual > high as f64 {
            return Some(hit(Bound::High, high));
        }
    }
    if is_printing {
        if let Some(low) = thresholds.low {
            if actual < low as f64 {
                return Some(hit(Bound::Low, low));
            }
        }
    }
    None
}
