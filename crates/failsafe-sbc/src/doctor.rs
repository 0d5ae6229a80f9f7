use anyhow::Result;
use std::path::Path;
use std::time::Duration;

use crate::platform::PlatformVariant;
use crate::soc::profile;

pub fn check_probe_timeout(timeout: Duration) -> Result<()> {
    anyhow::ensure!(timeout >= Duration::from_millis(100), "sbc.probe_timeout_ms too low");
    anyhow::ensure!(timeout <= Duration::from_secs(30), "sbc.probe_timeout_ms should be <= 30000");
    Ok(())
}

/// Every absolute path in the platform's probe command must exist.
pub fn check_soc_tooling(variant: PlatformVariant) -> Result<()> {
    let Some(p) = profile(variant) else { return Ok(()) };
    let cmd = p.command;
    for part in std::iter::once(cmd.program).chain(cmd.args.iter().copied()) {
        if part.starts_with('/') {
            anyhow::ensure!(Path::new(part).exists(), "{} probe needs {} (missing)", variant, part);
        }
    }
    Ok(())
}
