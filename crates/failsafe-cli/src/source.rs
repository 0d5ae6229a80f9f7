use anyhow::{Context, Result};
use failsafe_monitor::TemperatureSource;
use failsafe_proto::Snapshot;
use std::path::PathBuf;
use tracing::debug;

/// What the printer host writes to the snapshot file.
#[derive(Debug, serde::Deserialize)]
struct HostState {
    #[serde(default)]
    printing: bool,
    #[serde(default)]
    temperatures: Snapshot,
}

/// Reads host state from a JSON file, e.g.
/// `{"printing": true, "temperatures": {"bed": {"actual": 60.1, "target": 60.0}}}`
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<HostState> {
        let s = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read snapshot {}", self.path.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse snapshot {}", self.path.display()))
    }
}

impl TemperatureSource for SnapshotFile {
    fn current_temperatures(&self) -> Result<Snapshot> {
        Ok(self.read()?.temperatures)
    }

    fn is_printing(&self) -> bool {
        match self.read() {
            Ok(state) => state.printing,
            Err(e) => {
                debug!("printing state unknown: {:#}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn reads_host_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r#"{"printing": true, "temperatures": {"bed": {"actual": 60.1, "target": 60.0, "offset": 0},
                                                 "tool0": {"actual": 215.3, "target": 215.0}}}"#,
        )
        .unwrap();

        let src = SnapshotFile::new(&path);
        let snap = src.current_temperatures().unwrap();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap["tool0"].actual, 215.3);
        assert!(src.is_printing());
    }

    #[test]
    fn idle_host_without_temps() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{}").unwrap();

        let src = SnapshotFile::new(&path);
        assert!(src.current_temperatures().unwrap().is_empty());
        assert!(!src.is_printing());
    }

    #[test]
    fn missing_file_is_an_error_not_printing() {
        let dir = TempDir::new().unwrap();
        let src = SnapshotFile::new(dir.path().join("nope.json"));
        assert!(src.current_temperatures().is_err());
        assert!(!src.is_printing());
    }
}
