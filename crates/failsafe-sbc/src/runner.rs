//! Subprocess execution for SoC probes.
//!
//! `CommandRunner` is the seam the reader talks to. `TokioRunner` spawns the
//! real vendor tool with a bounded wait; `ScriptedRunner` replays canned
//! outputs and counts invocations for tests.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::SocError;

/// A fixed vendor command line, e.g. `/opt/vc/bin/vcgencmd measure_temp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocCommand {
    pub program: &'static str,
    pub args: &'static [&'static str],
}

impl fmt::Display for SocCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program)?;
        for a in self.args {
            write!(f, " {}", a)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
}

impl CommandOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self { success: true, code: Some(0), stdout: stdout.into() }
    }

    pub fn failed(code: i32) -> Self {
        Self { success: false, code: Some(code), stdout: String::new() }
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, cmd: &SocCommand, timeout: Duration) -> Result<CommandOutput, SocError>;
}

/// Spawns the command directly (no shell) and kills it if the wait times out.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRunner;

#[async_trait]
impl CommandRunner for TokioRunner {
    async fn run(&self, cmd: &SocCommand, timeout: Duration) -> Result<CommandOutput, SocError> {
        let mut child = Command::new(cmd.program);
        child.args(cmd.args).kill_on_drop(true);

        debug!("soc: running `{}`", cmd);
        let out = tokio::time::timeout(timeout, child.output())
            .await
            .map_err(|_| SocError::Timeout { command: cmd.to_string(), timeout })?
            .map_err(|source| SocError::Spawn { command: cmd.to_string(), source })?;

        Ok(CommandOutput {
            success: out.status.success(),
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
        })
    }
}

/// Test double: pops one scripted response per call, then keeps repeating the last one.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    responses: Mutex<VecDeque<CommandOutput>>,
    last: Mutex<Option<CommandOutput>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn with_responses(responses: Vec<CommandOutput>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls().len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, cmd: &SocCommand, _timeout: Duration) -> Result<CommandOutput, SocError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(cmd.to_string());
        }
        let next = self.responses.lock().ok().and_then(|mut r| r.pop_front());
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(out) = next {
            *last = Some(out);
        }
        // An unscripted runner behaves like a missing binary.
        Ok(last.clone().unwrap_or_else(|| CommandOutput::failed(127)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: SocCommand = SocCommand { program: "echo", args: &["temp=42.8'C"] };

    #[test]
    fn command_renders_as_shell_line() {
        let cmd = SocCommand { program: "cat", args: &["/etc/armbianmonitor/datasources/soctemp"] };
        assert_eq!(cmd.to_string(), "cat /etc/armbianmonitor/datasources/soctemp");
    }

    #[tokio::test]
    async fn scripted_runner_replays_then_repeats() {
        let runner = ScriptedRunner::with_responses(vec![CommandOutput::ok("a"), CommandOutput::failed(1)]);
        let t = Duration::from_secs(1);
        assert_eq!(runner.run(&ECHO, t).await.unwrap().stdout, "a");
        assert!(!runner.run(&ECHO, t).await.unwrap().success);
        assert!(!runner.run(&ECHO, t).await.unwrap().success);
        assert_eq!(runner.call_count(), 3);
        assert_eq!(runner.calls()[0], "echo temp=42.8'C");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_captures_stdout() {
        let out = TokioRunner.run(&ECHO, Duration::from_secs(5)).await.unwrap();
        assert!(out.success);
        assert_eq!(out.stdout.trim(), "temp=42.8'C");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_reports_missing_binary() {
        let missing = SocCommand { program: "/nonexistent/vcgencmd", args: &[] };
        let err = TokioRunner.run(&missing, Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err, SocError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tokio_runner_times_out() {
        let slow = SocCommand { program: "sleep", args: &["5"] };
        let err = TokioRunner.run(&slow, Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, SocError::Timeout { .. }));
    }
}
