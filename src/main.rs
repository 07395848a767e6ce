use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pulsewatch::config::Settings;
use pulsewatch::detect::HeartbeatMonitor;
use pulsewatch::report;
use pulsewatch::source::{EventSource, FileSource};

#[derive(Parser, Debug)]
#[command(name = "pulsewatch")]
#[command(about = "Detect missed heartbeats across services and report alerts")]
struct Args {
    /// Path to a JSON file containing an array of heartbeat events
    #[arg(short, long, default_value = "heartbeat_events.json")]
    file: PathBuf,

    /// Optional TOML settings file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Expected heartbeat interval in seconds (1-3600)
    #[arg(short, long)]
    interval: Option<i64>,

    /// Consecutive misses before an alert fires (1-10)
    #[arg(short = 'm', long)]
    allowed_misses: Option<u32>,

    /// Margin around each expected beat, as a fraction of the interval (0.0-1.0)
    #[arg(short, long)]
    tolerance: Option<f64>,

    /// Reserved future-timestamp bound in seconds (accepted, not yet consulted)
    #[arg(long)]
    future_limit: Option<i64>,

    /// Interval multiplier beyond which a silent service counts as retired
    #[arg(short, long)]
    gap_limit: Option<u32>,

    /// Emit the report as JSON instead of the human-readable summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    // Defaults < settings file < environment < CLI flags
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(interval) = args.interval {
        settings.interval_seconds = interval;
    }
    if let Some(allowed_misses) = args.allowed_misses {
        settings.allowed_misses = allowed_misses;
    }
    if let Some(tolerance) = args.tolerance {
        settings.tolerance = tolerance;
    }
    if let Some(future_limit) = args.future_limit {
        settings.future_limit_seconds = future_limit;
    }
    if let Some(gap_limit) = args.gap_limit {
        settings.gap_limit = gap_limit;
    }

    let config = settings.into_monitor_config()?;
    let monitor = HeartbeatMonitor::new(config);

    let mut source = FileSource::new(&args.file);
    let Some(events) = source.fetch() else {
        bail!(
            "no events loaded from {}: {}",
            source.description(),
            source.error().unwrap_or("unknown error")
        );
    };

    let report = monitor.run(&events);

    if args.json {
        println!("{}", report::render_json(&report)?);
    } else {
        print!("{}", report::render_text(&report, monitor.config()));
    }

    Ok(())
}

/// Diagnostics go to stderr so `--json` output stays machine-readable.
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
