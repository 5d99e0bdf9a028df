//! Speedpulse - Scheduled speedtest metrics exporter
//!
//! Periodically runs the Ookla speedtest CLI and writes the parsed results
//! to InfluxDB as time-series points.

mod config;
mod schedule;
mod sink;
mod speedtest;

use anyhow::{Context, Result};
use clap::Parser;
use measurement::build_records;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "speedpulse")]
#[command(version)]
#[command(about = "Periodic speedtest metrics exporter for InfluxDB", long_about = None)]
struct Args {
    /// Run every registered job once and exit
    #[arg(long)]
    run_once: bool,

    /// Override the measurement interval, e.g. 30m or 6h
    #[arg(long)]
    interval: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration; flags override the environment
    let mut config = config::Config::from_env().context("failed to load configuration")?;
    if args.run_once {
        config.run_once = true;
    }
    if let Some(raw) = &args.interval {
        config.test_interval = schedule::IntervalSpec::parse(raw)
            .with_context(|| format!("invalid --interval {:?}", raw))?;
    }

    init_tracing(&config.log_level);

    info!("Starting speedpulse v{}", env!("CARGO_PKG_VERSION"));

    // Fail fast when the backend is unreachable
    sink::InfluxSink::new(&config.database)?
        .check_ready()
        .await
        .context("InfluxDB liveness check failed")?;

    let config = Arc::new(config);
    let mut scheduler = schedule::Scheduler::new();

    let job_config = config.clone();
    scheduler.register("speedtest", &config.test_interval, move || {
        let config = job_config.clone();
        async move { run_cycle(&config).await }
    });

    if config.run_once {
        info!("Run once mode");
        scheduler.run_all().await;
    } else {
        info!("Running speedtest every {}", config.test_interval);
        scheduler.run().await;
    }

    Ok(())
}

/// One measurement cycle: run the external tool, build the records, write
/// them. Every failure past spawning is logged here and ends the cycle
/// normally; nothing is retried within a tick.
async fn run_cycle(config: &config::Config) -> Result<()> {
    // Fresh backend session per cycle
    let sink = sink::InfluxSink::new(&config.database)?;

    let outcome = speedtest::run_speedtest().await?;

    if !outcome.status.success() {
        error!("Speedtest failure (exit {:?})", outcome.status.code());
        error!("{}", outcome.stderr.trim());
        info!("{}", outcome.stdout.trim());
        return Ok(());
    }

    info!("Speedtest successful");

    let records = build_records(&outcome.stdout)?;
    if let Err(e) = sink.write(&records).await {
        error!("InfluxDB write failed: {:#}", e);
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let directive = level
        .parse::<tracing_subscriber::filter::Directive>()
        .unwrap_or_else(|_| tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        )
        .init();
}
