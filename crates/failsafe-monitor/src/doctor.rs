use anyhow::Result;

use crate::settings::{MonitorSettings, ThresholdSettings};

pub fn check_schedule(settings: &MonitorSettings) -> Result<()> {
    if settings.enabled {
        anyhow::ensure!(settings.interval > 0, "monitor.interval must be > 0 when enabled");
        anyhow::ensure!(settings.interval <= 3600, "monitor.interval should be <= 3600s");
    }
    Ok(())
}

pub fn check_thresholds(t: &ThresholdSettings) -> Result<()> {
    for (name, high, low) in [
        ("bed", t.bed, t.bed_low),
        ("hotend", t.hotend, t.hotend_low),
        ("soc", t.soc, t.soc_low),
    ] {
        anyhow::ensure!(high >= 0 && low >= 0, "thresholds.{} bounds must not be negative", name);
        if high != 0 && low != 0 {
            anyhow::ensure!(low < high, "thresholds.{}_low must be below thresholds.{}", name, name);
        }
    }
    Ok(())
}
