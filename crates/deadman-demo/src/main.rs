//! deadman-demo - Deadman watchdog demonstration
//!
//! Arms a watchdog, then stalls longer than the deadline so the hang
//! callback fires. Pass `--stop-after-ms` to service the watchdog in time
//! instead.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod error;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use deadman_watchdog::{ExpiryFn, Watchdog, WatchdogConfig, WatchdogMetrics};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::DemoError;

#[derive(Parser, Debug)]
#[command(name = "deadman-demo")]
#[command(about = "Arm a deadman watchdog and stall past its deadline")]
#[command(version)]
struct Cli {
    /// Watchdog deadline in milliseconds [default: the config's default_delay, 2000 without --config]
    #[arg(long)]
    delay_ms: Option<u64>,

    /// How long the simulated work stalls, in milliseconds
    #[arg(long, default_value_t = 4000)]
    sleep_ms: u64,

    /// Service (stop) the watchdog after this many milliseconds
    #[arg(long)]
    stop_after_ms: Option<u64>,

    /// Watchdog configuration file (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Descriptor attached to the watchdog's log output
    #[arg(long, default_value = "demo")]
    name: String,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Outcome of one demonstration run.
#[derive(Debug, Serialize)]
struct DemoReport {
    descriptor: String,
    delay_ms: u64,
    slept_ms: u64,
    serviced: bool,
    hangs_detected: u32,
    metrics: WatchdogMetrics,
}

/// Deadline used when neither `--delay-ms` nor `--config` is given.
const DEMO_DELAY: Duration = Duration::from_millis(2000);

fn on_hang(hangs: &AtomicU32) {
    let total = hangs.fetch_add(1, Ordering::SeqCst).saturating_add(1);
    tracing::error!(hangs = total, "Watchdog expired, the application stopped responding");
}

fn load_config(path: Option<&Path>) -> Result<WatchdogConfig, DemoError> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<WatchdogConfig>(&text)?
        }
        None => WatchdogConfig {
            default_delay: DEMO_DELAY,
            ..WatchdogConfig::default()
        },
    };
    config
        .validate()
        .map_err(|err| DemoError::InvalidConfiguration(err.to_string()))?;
    Ok(config)
}

fn run(cli: &Cli, config: WatchdogConfig) -> Result<DemoReport, DemoError> {
    let callback: ExpiryFn<AtomicU32> = on_hang;
    let mut watchdog = Watchdog::with_config(&cli.name, config, Some(callback), AtomicU32::new(0));
    if let Some(err) = watchdog.construction_error() {
        return Err(err.clone().into());
    }

    watchdog.start(cli.delay_ms.map(Duration::from_millis));
    let delay_ms = u64::try_from(watchdog.delay().as_millis()).unwrap_or(u64::MAX);
    tracing::info!(descriptor = %cli.name, delay_ms, "Arming watchdog");

    let serviced = match cli.stop_after_ms {
        Some(stop_after) if stop_after < cli.sleep_ms => {
            thread::sleep(Duration::from_millis(stop_after));
            watchdog.stop();
            tracing::info!(after_ms = stop_after, "Watchdog serviced");
            thread::sleep(Duration::from_millis(cli.sleep_ms.saturating_sub(stop_after)));
            true
        }
        _ => {
            thread::sleep(Duration::from_millis(cli.sleep_ms));
            false
        }
    };
    watchdog.stop();
    watchdog.shutdown();

    Ok(DemoReport {
        descriptor: cli.name.clone(),
        delay_ms,
        slept_ms: cli.sleep_ms,
        serviced,
        hangs_detected: watchdog.context().load(Ordering::SeqCst),
        metrics: watchdog.metrics(),
    })
}

fn print_report(report: &DemoReport, json: bool) -> Result<(), DemoError> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Watchdog:        {}", report.descriptor);
    println!("Deadline:        {} ms", report.delay_ms);
    println!("Stalled for:     {} ms", report.slept_ms);
    println!(
        "Serviced:        {}",
        if report.serviced { "yes" } else { "no" }
    );
    println!("Hangs detected:  {}", report.hangs_detected);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("deadman_demo={log_level},deadman_watchdog={log_level},deadman_timer={log_level}")
                    .into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = load_config(cli.config.as_deref())?;
    let report = run(&cli, config)?;
    print_report(&report, cli.json)?;
    Ok(())
}
