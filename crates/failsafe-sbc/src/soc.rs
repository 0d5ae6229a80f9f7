//! SoC temperature through vendor tools.
//!
//! Every supported platform is one row in [`profile`]: the command to run,
//! the pattern that pulls the number out of its output, and how to turn that
//! text into degrees Celsius. The first failed probe disables the reader for
//! the rest of the process.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::platform::PlatformVariant;
use crate::runner::{CommandRunner, SocCommand};
use crate::SocError;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub const VCGENCMD: SocCommand = SocCommand {
    program: "/opt/vc/bin/vcgencmd",
    args: &["measure_temp"],
};

pub const ARMBIAN_SOCTEMP: SocCommand = SocCommand {
    program: "cat",
    args: &["/etc/armbianmonitor/datasources/soctemp"],
};

// vcgencmd prints `temp=42.8'C`
static VCGENCMD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"=(.*)'").expect("vcgencmd pattern"));
static ARMBIAN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("soctemp pattern"));

/// How one platform exposes its SoC temperature.
#[derive(Clone, Copy)]
pub struct SocProfile {
    pub command: SocCommand,
    pub pattern: &'static Regex,
    pub scale: fn(&str) -> Option<f64>,
}

pub fn profile(variant: PlatformVariant) -> Option<SocProfile> {
    match variant {
        PlatformVariant::RaspberryPi => Some(SocProfile {
            command: VCGENCMD,
            pattern: &*VCGENCMD_PATTERN,
            scale: decimal_celsius,
        }),
        PlatformVariant::Armbian => Some(SocProfile {
            command: ARMBIAN_SOCTEMP,
            pattern: &*ARMBIAN_PATTERN,
            scale: armbian_celsius,
        }),
        PlatformVariant::Generic => None,
    }
}

/// Text is already degrees.
pub fn decimal_celsius(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

/// Odroid boards report millidegrees (`44000`), Orange Pi plain degrees (`26`).
pub fn armbian_celsius(digits: &str) -> Option<f64> {
    let raw: f64 = digits.parse().ok()?;
    match digits.len() {
        2 | 3 => Some(raw),
        n if n >= 4 => Some(raw / 1000.0),
        _ => Some(raw),
    }
}

/// Applies a profile's pattern and scaling to raw command output.
pub fn parse_output(profile: &SocProfile, output: &str) -> Result<f64, SocError> {
    let text = profile
        .pattern
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| SocError::NoMatch { output: output.to_string() })?;
    (profile.scale)(text).ok_or_else(|| SocError::Unparsable { text: text.to_string() })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocSupport {
    /// Platform has a probe that has not run yet.
    Unknown,
    Supported,
    /// Terminal: never probed again in this process.
    Unsupported,
}

pub struct SocReader {
    platform: PlatformVariant,
    profile: Option<SocProfile>,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
    state: Mutex<SocSupport>,
}

impl SocReader {
    pub fn new(platform: PlatformVariant, runner: Arc<dyn CommandRunner>) -> Self {
        let profile = profile(platform);
        let state = if profile.is_some() { SocSupport::Unknown } else { SocSupport::Unsupported };
        Self {
            platform,
            profile,
            runner,
            timeout: DEFAULT_PROBE_TIMEOUT,
            state: Mutex::new(state),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn platform(&self) -> PlatformVariant {
        self.platform
    }

    pub fn state(&self) -> SocSupport {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_supported(&self) -> bool {
        self.state() != SocSupport::Unsupported
    }

    fn set_state(&self, next: SocSupport) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = next;
    }

    /// Degrees Celsius, or 0.0 when there is no value.
    pub async fn read_temperature(&self) -> f64 {
        let Some(profile) = self.profile else { return 0.0 };
        if !self.is_supported() {
            return 0.0;
        }

        debug!("checking soc internal temperature");
        match self.sample(&profile).await {
            Ok(temp) => {
                self.set_state(SocSupport::Supported);
                debug!("soc: {} C", temp);
                temp
            }
            Err(e) => {
                info!("soc temperature not found, probe disabled: {}", e);
                self.set_state(SocSupport::Unsupported);
                0.0
            }
        }
    }

    async fn sample(&self, profile: &SocProfile) -> Result<f64, SocError> {
        let out = self.runner.run(&profile.command, self.timeout).await?;
        if !out.success {
            return Err(SocError::ExitStatus { command: profile.command.to_string(), code: out.code });
        }
        debug!("soc: response {:?}, pattern {:?}", out.stdout, profile.pattern.as_str());
        parse_output(profile, &out.stdout)
    }
}
