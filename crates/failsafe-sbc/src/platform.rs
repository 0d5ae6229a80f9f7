use std::fmt;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

/// Present on Armbian images that ship the armbianmonitor tooling.
pub const ARMBIAN_MARKER: &str = "/etc/armbianmonitor";
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Broadcom SoCs used across the Raspberry Pi line.
pub const PI_SOC_TYPES: [&str; 3] = ["BCM2708", "BCM2709", "BCM2835"];

// Matches a line like 'Hardware   : BCM2709'
static HARDWARE_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)Hardware\s+:\s+(\w+)").expect("hardware line pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformVariant {
    Generic,
    RaspberryPi,
    Armbian,
}

impl fmt::Display for PlatformVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlatformVariant::Generic => "generic",
            PlatformVariant::RaspberryPi => "raspberry-pi",
            PlatformVariant::Armbian => "armbian",
        })
    }
}

/// Looks at two system files to decide which board we are on.
#[derive(Debug, Clone)]
pub struct PlatformProbe {
    armbian_marker: PathBuf,
    cpuinfo: PathBuf,
}

impl Default for PlatformProbe {
    fn default() -> Self {
        Self::new(ARMBIAN_MARKER, CPUINFO_PATH)
    }
}

impl PlatformProbe {
    pub fn new(armbian_marker: impl Into<PathBuf>, cpuinfo: impl Into<PathBuf>) -> Self {
        Self { armbian_marker: armbian_marker.into(), cpuinfo: cpuinfo.into() }
    }

    pub fn armbian_marker(&self) -> &Path {
        &self.armbian_marker
    }

    pub fn cpuinfo(&self) -> &Path {
        &self.cpuinfo
    }

    /// Armbian wins over cpuinfo; anything unrecognised is `Generic`.
    /// Callers are expected to run this once and keep the result.
    pub fn detect(&self) -> PlatformVariant {
        if self.armbian_marker.exists() {
            info!("armbian monitor found at {}", self.armbian_marker.display());
            return PlatformVariant::Armbian;
        }
        if self.is_rpi() {
            return PlatformVariant::RaspberryPi;
        }
        PlatformVariant::Generic
    }

    fn is_rpi(&self) -> bool {
        let cpuinfo = match std::fs::read_to_string(&self.cpuinfo) {
            Ok(s) => s,
            Err(e) => {
                debug!("platform: cannot read {}: {}", self.cpuinfo.display(), e);
                return false;
            }
        };
        match hardware_id(&cpuinfo) {
            Some(id) if PI_SOC_TYPES.contains(&id) => {
                info!("Broadcom detected ({})", id);
                true
            }
            Some(id) => {
                debug!("platform: hardware {} is not a known Pi SoC", id);
                false
            }
            None => false,
        }
    }
}

/// First `Hardware : <id>` token in a cpuinfo dump.
pub fn hardware_id(cpuinfo: &str) -> Option<&str> {
    HARDWARE_LINE
        .captures(cpuinfo)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
