//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Discord voice-channel attendance tracker.
///
/// Correlates join/leave signals for one voice channel into sessions and
/// records per-user daily presence totals.
#[derive(Debug, Parser)]
#[command(name = "vt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the tracker, consuming voice-state transitions from stdin.
    ///
    /// This is the default when no subcommand is given.
    Run,

    /// Print stored daily totals.
    Report {
        /// Day to report on (YYYY-MM-DD, reference timezone). Defaults to today.
        #[arg(long)]
        day: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}
