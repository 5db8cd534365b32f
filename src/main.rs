//! quakeshake - ground-motion estimation for earthquake early warning.
//!
//! Computes expected shaking (PGA, PGV, response spectra, intensity) at
//! points of interest and on a shake-map grid from an event solution, using
//! interchangeable attenuation relations.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::error;

mod arrival;
mod attenuation;
mod calculator;
mod cli;
mod config;
mod errors;
mod event;
mod filters;
mod float_table;
mod geodesy;
mod gmice;
mod gmpe;
mod ipe;
mod output;
mod points;
mod registry;
mod shaking;

use attenuation::Site;
use calculator::{Calculator, Engine};
use cli::{Cli, Command};
use config::Config;
use event::Event;
use output::{DistanceRow, PointKind, PointRow};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Command::Run(args) => cmd_run(&args),
        Command::Replay(args) => cmd_replay(&args),
        Command::Models => cmd_models(),
        Command::Distance(args) => cmd_distance(&args),
    }
}

/// Initialize tracing subscriber.
fn init_tracing(verbose: bool, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn load_event(path: &Path) -> Result<Event> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read event {}", path.display()))?;
    Event::from_json(&text).with_context(|| format!("invalid event in {}", path.display()))
}

/// Execute the `run` command - a single pass, then print every point.
fn cmd_run(args: &cli::RunArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let event = load_event(&args.event)?;
    let engine = Engine::from_config(&config).context("failed to set up engine")?;

    if !config.filter.matches(&event) {
        tracing::warn!("event {} does not pass the configured filter", event.id);
    }
    if event.fake {
        tracing::info!("event {} is flagged as a test event", event.id);
    }

    let report = engine.run_pass(&event, 0);

    let snapshots: Vec<_> = engine
        .targets
        .iter()
        .map(|t| (t, PointKind::Target, t.snapshot()))
        .chain(engine.stations.iter().map(|s| (s, PointKind::Station, s.snapshot())))
        .collect();
    let rows: Vec<PointRow<'_>> = snapshots
        .iter()
        .map(|(point, kind, state)| PointRow::new(point, *kind, state))
        .collect();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_points(&mut handle, &rows, args.format)?;
    if let Some(map) = &engine.shake_map {
        output::write_grid_summary(&mut handle, &map.snapshot(), args.format)?;
    }
    output::write_report(&mut handle, &report, args.format)?;

    Ok(())
}

/// Execute the `replay` command - stream events through the worker.
fn cmd_replay(args: &cli::ReplayArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let text = std::fs::read_to_string(&args.events)
        .with_context(|| format!("failed to read events {}", args.events.display()))?;

    let mut events = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match Event::from_json(line) {
            Ok(event) if config.filter.matches(&event) => events.push(event),
            Ok(event) => tracing::debug!("event {} filtered out", event.id),
            Err(e) => tracing::warn!("{}:{}: skipping event: {e}", args.events.display(), i + 1),
        }
    }
    tracing::info!("replaying {} events", events.len());

    let engine = Engine::from_config(&config).context("failed to set up engine")?;

    tokio::runtime::Runtime::new()
        .context("failed to create tokio runtime")?
        .block_on(replay(engine, events, &config, args))
}

async fn replay(engine: Engine, events: Vec<Event>, config: &Config, args: &cli::ReplayArgs) -> Result<()> {
    let calculator = Calculator::spawn(engine, config.max_restarts);
    let mut reports = BroadcastStream::new(calculator.subscribe());
    let delay = Duration::from_millis(args.delay_ms);
    let format = args.format;

    let printer = tokio::spawn(async move {
        while let Some(report) = reports.next().await {
            match report {
                Ok(report) => {
                    let stdout = io::stdout();
                    let mut handle = stdout.lock();
                    if let Err(e) = output::emit_report(&mut handle, &report, format) {
                        tracing::warn!("failed to write report {}: {e}", report.event_id);
                    }
                }
                Err(e) => tracing::warn!("report stream: {e}"),
            }
        }
    });

    for event in events {
        calculator.process_event(event)?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    calculator.shutdown().await;
    printer.await.context("report printer failed")?;
    Ok(())
}

/// Execute the `models` command - list the registry.
fn cmd_models() -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for entry in registry::MODELS {
        let capabilities: Vec<&str> = entry.capabilities.iter().map(registry::Capability::as_str).collect();
        writeln!(
            handle,
            "\x1b[1m{:<16}\x1b[0m {:<40} \x1b[2m{}\x1b[0m",
            entry.name,
            capabilities.join(", "),
            entry.description
        )?;
    }
    Ok(())
}

/// Execute the `distance` command - distances and S-wave ETA for one site.
fn cmd_distance(args: &cli::DistanceArgs) -> Result<()> {
    let event = load_event(&args.event)?;
    let wave_model = match &args.config {
        Some(path) => load_config(path)?.wave_model(),
        None => arrival::WaveModel::default(),
    };

    let site = Site {
        latitude: args.lat,
        longitude: args.lon,
        elevation_m: args.alt,
        amplification_type: "",
        amplification: f64::NAN,
    };
    let row = DistanceRow {
        event_id: event.id.clone(),
        distance_km: event.source().distance_km(&site),
        arrival: wave_model.arrival(&event, &site, chrono::Utc::now()),
        origin_time: event.origin_time(),
        wave_fronts: args.elapsed.map(|t| wave_model.wave_fronts(&event, t)),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_distance(&mut handle, &row, args.format)?;
    Ok(())
}
