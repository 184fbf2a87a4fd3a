#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the patrol-map analytics pipeline.
//!
//! Loads incidents from a JSON/CSV export (or simulates a month of them),
//! runs one analysis stage or the whole pass, and prints the result as
//! pretty JSON on stdout. Logging goes to stderr via `RUST_LOG`.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};

mod commands;

/// Incident hotspot, forecast and patrol planning toolkit.
#[derive(Parser)]
#[command(name = "patrol_map")]
#[command(about = "Incident hotspot, forecast and patrol planning toolkit")]
struct Cli {
    /// Incident export to analyze (`.json` or `.csv`). When omitted a
    /// synthetic data set is generated.
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// TOML file overriding analysis parameters.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Gazetteer TOML with the hotspot centroids (default: embedded
    /// Dehradun table).
    #[arg(long, global = true)]
    gazetteer: Option<PathBuf>,

    /// Seed for every randomized step, for reproducible output.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Days of synthetic history to generate when no input is given.
    #[arg(long, global = true, default_value_t = 30)]
    days: u32,

    /// Reference time (`YYYY-MM-DDTHH:MM:SS`, local wall clock). Defaults
    /// to now.
    #[arg(long, global = true)]
    now: Option<NaiveDateTime>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the incident data set being analyzed.
    Incidents,

    /// Detect hotspot zones around gazetteer centroids.
    Hotspots,

    /// Forecast incidents per location for an upcoming window.
    Forecast {
        /// Hours ahead of the reference time to forecast.
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Build risk heatmap points.
    Heatmap,

    /// Plan a patrol route through the hotspot zones.
    Route {
        /// Maximum number of stops on the route.
        #[arg(long)]
        max_waypoints: Option<usize>,
    },

    /// Distribute patrol units across hotspot zones.
    Allocate {
        /// Size of the patrol unit pool.
        #[arg(long)]
        units: Option<u32>,
    },

    /// Show hour-of-day and day-of-week incident distributions.
    Patterns,

    /// Run every stage and print the combined report.
    Report,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let mut ctx = commands::Context::load(&cli)?;
    let output = commands::run(&cli.command, &mut ctx)?;

    println!("{output}");

    Ok(())
}
