//! Command-line interface definitions.
//!
//! Uses clap derive API for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::Format;

/// Ground-motion estimation for earthquake early warning.
#[derive(Parser, Debug)]
#[command(name = "quakeshake")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute shaking for one event and print the results
    Run(RunArgs),

    /// Stream an NDJSON event file through the calculator
    Replay(ReplayArgs),

    /// List registered attenuation models
    Models,

    /// Show distances and S-wave arrival between an event and a location
    Distance(DistanceArgs),
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Event file (JSON)
    #[arg(long, short = 'e')]
    pub event: PathBuf,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `replay` command.
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Configuration file (JSON)
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Events, one JSON object per line
    #[arg(long)]
    pub events: PathBuf,

    /// Pause between events in milliseconds; 0 queues them all at once
    #[arg(long, default_value = "0")]
    pub delay_ms: u64,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Arguments for the `distance` command.
#[derive(Parser, Debug)]
pub struct DistanceArgs {
    /// Event file (JSON)
    #[arg(long, short = 'e')]
    pub event: PathBuf,

    /// Site latitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Site longitude (degrees)
    #[arg(long, allow_hyphen_values = true)]
    pub lon: f64,

    /// Site altitude (m)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub alt: f64,

    /// Also show the P and S wavefront radii this many seconds after origin
    #[arg(long)]
    pub elapsed: Option<f64>,

    /// Configuration file for the velocity model
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'f', default_value = "human", value_parser = parse_format)]
    pub format: Format,
}

/// Parse an output format from string.
fn parse_format(s: &str) -> Result<Format, String> {
    s.parse()
}
