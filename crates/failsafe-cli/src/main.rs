mod sink;
mod source;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use failsafe_monitor::{
    doctor as monitor_doctor, FailsafeHook, InertHook, Monitor, MonitorSettings, Scheduler,
    SettingsProvider, SharedSettings, ThresholdSettings,
};
use failsafe_sbc::{doctor as sbc_doctor, PlatformProbe, SocReader, TokioRunner};

use sink::{EnvPrintHook, StdoutSink};
use source::SnapshotFile;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "failsafe", version, about = "Temperature failsafe - heater and SoC threshold monitor")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the configuration and platform tooling.
    Doctor,
    /// Poll on the configured interval until Ctrl-C. SIGHUP reloads the config.
    Run,
    /// Run a single check and print any fault payload.
    Check,
    /// Show the detected board and one SoC reading.
    Probe,
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    #[serde(default)]
    monitor: MonitorCfg,
    #[serde(default)]
    thresholds: ThresholdSettings,
    source: SourceCfg,
    #[serde(default)]
    sbc: SbcCfg,
}

#[derive(Debug, Default, serde::Deserialize)]
struct MonitorCfg {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    interval: i64,
}

#[derive(Debug, serde::Deserialize)]
struct SourceCfg {
    snapshot_path: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct SbcCfg {
    probe_timeout_ms: Option<u64>,
    armbian_marker: Option<String>,
    cpuinfo_path: Option<String>,
}

impl Config {
    fn monitor_settings(&self) -> MonitorSettings {
        MonitorSettings {
            enabled: self.monitor.enabled,
            interval: self.monitor.interval,
            thresholds: self.thresholds,
        }
    }
}

impl SbcCfg {
    fn probe(&self) -> PlatformProbe {
        let default = PlatformProbe::default();
        PlatformProbe::new(
            self.armbian_marker.as_deref().map(Path::new).unwrap_or(default.armbian_marker()),
            self.cpuinfo_path.as_deref().map(Path::new).unwrap_or(default.cpuinfo()),
        )
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms.unwrap_or(2000))
    }
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).context("read config")?;
    toml::from_str(&s).context("parse config toml")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Run => run(&cli.config, &cfg).await?,
        Command::Check => check(&cfg).await,
        Command::Probe => probe(&cfg).await,
    }
    Ok(())
}

fn soc_reader(cfg: &Config) -> SocReader {
    // detected once per process
    let platform = cfg.sbc.probe().detect();
    info!("platform: {}", platform);
    SocReader::new(platform, Arc::new(TokioRunner)).with_timeout(cfg.sbc.probe_timeout())
}

fn build_monitor(cfg: &Config, settings: Arc<dyn SettingsProvider>, hook: Arc<dyn FailsafeHook>) -> Monitor {
    Monitor::new(settings, Arc::new(SnapshotFile::new(&cfg.source.snapshot_path)), Arc::new(StdoutSink))
        .with_hook(hook)
        .with_soc(soc_reader(cfg))
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");

    let settings = cfg.monitor_settings();
    monitor_doctor::check_schedule(&settings)?;
    monitor_doctor::check_thresholds(&settings.thresholds)?;
    sbc_doctor::check_probe_timeout(cfg.sbc.probe_timeout())?;

    let platform = cfg.sbc.probe().detect();
    sbc_doctor::check_soc_tooling(platform).or_else(|e| {
        warn!("soc probe will be disabled: {:#}", e);
        Ok::<(), anyhow::Error>(())
    })?;

    if !Path::new(&cfg.source.snapshot_path).exists() {
        warn!("source.snapshot_path {} does not exist yet", cfg.source.snapshot_path);
    }

    info!("doctor: OK");
    Ok(())
}

async fn check(cfg: &Config) {
    let m = build_monitor(cfg, Arc::new(cfg.monitor_settings()), Arc::new(EnvPrintHook));
    m.on_tick().await;
}

async fn probe(cfg: &Config) {
    let soc = soc_reader(cfg);
    let temp = soc.read_temperature().await;
    println!("platform={}", soc.platform());
    println!("soc_temp_c={}", temp);
    println!("soc_state={:?}", soc.state());
}

async fn run(config_path: &str, cfg: &Config) -> Result<()> {
    info!("run: starting");

    let shared = SharedSettings::new(cfg.monitor_settings());
    let monitor = build_monitor(cfg, Arc::new(shared.clone()), Arc::new(InertHook));
    let sched = Scheduler::new(Arc::new(monitor));

    sched.restart().await;
    if !sched.is_running().await {
        warn!("monitor disabled or interval is 0; waiting for a config reload");
    }

    let mut reload = ReloadSignal::new()?;
    loop {
        tokio::select! {
            _ = reload.recv() => {
                match load_config(config_path) {
                    Ok(new) => {
                        // source and sbc sections only apply on process restart
                        shared.replace(new.monitor_settings());
                        info!("config reloaded");
                        sched.restart().await;
                    }
                    Err(e) => warn!("config reload failed, keeping previous settings: {:#}", e),
                }
            }
            res = tokio::signal::ctrl_c() => {
                res.context("wait for ctrl-c")?;
                info!("run: shutting down");
                break;
            }
        }
    }

    sched.shutdown().await;
    Ok(())
}

/// SIGHUP on unix; never fires elsewhere.
struct ReloadSignal {
    #[cfg(unix)]
    hup: tokio::signal::unix::Signal,
}

impl ReloadSignal {
    fn new() -> Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let hup = signal(SignalKind::hangup()).context("install SIGHUP handler")?;
            Ok(Self { hup })
        }
        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    async fn recv(&mut self) {
        #[cfg(unix)]
        {
            self.hup.recv().await;
        }
        #[cfg(not(unix))]
        {
            std::future::pending::<()>().await
        }
    }
}
