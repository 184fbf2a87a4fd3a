//! Subcommand execution.

use std::path::Path;

use chrono::{Local, NaiveDateTime};
use patrol_map_analytics::random::{RandomSource, SeededRandom, ThreadRandom};
use patrol_map_analytics::{
    analyze_day_patterns, analyze_time_patterns, calculate_patrol_distribution,
    generate_risk_heatmap, identify_hotspots, optimize_patrol_route, predict_hotspots,
    run_analysis,
};
use patrol_map_analytics_models::{AnalysisConfig, DayPattern, HourlyPattern};
use patrol_map_geography::registry;
use patrol_map_geography_models::Gazetteer;
use patrol_map_incident_models::IncidentRecord;
use patrol_map_source::synthetic::{SyntheticParams, generate_incidents};
use serde::Serialize;

use crate::{Cli, Commands};

/// Everything a subcommand needs, resolved from the global options.
pub struct Context {
    pub incidents: Vec<IncidentRecord>,
    pub gazetteer: Gazetteer,
    pub config: AnalysisConfig,
    pub now: NaiveDateTime,
    pub rng: Box<dyn RandomSource>,
}

impl Context {
    /// Resolves the gazetteer, configuration, randomness and incident set.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the referenced files cannot be read or
    /// parsed.
    pub fn load(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let gazetteer = match &cli.gazetteer {
            Some(path) => registry::load_gazetteer(path)?,
            None => registry::default_gazetteer(),
        };

        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => AnalysisConfig::default(),
        };

        let now = cli.now.unwrap_or_else(|| Local::now().naive_local());

        let mut rng: Box<dyn RandomSource> = match cli.seed {
            Some(seed) => {
                log::info!("Using fixed seed {seed}");
                Box::new(SeededRandom::new(seed))
            }
            None => Box::new(ThreadRandom::new()),
        };

        let incidents = if let Some(path) = &cli.input {
            patrol_map_source::file::load(path)?
        } else {
            let beats = registry::gazetteer(registry::BEATS_GAZETTEER_ID)
                .unwrap_or_else(|| gazetteer.clone());
            generate_incidents(
                &beats,
                &SyntheticParams { days: cli.days },
                now,
                rng.as_mut(),
            )
        };

        Ok(Self {
            incidents,
            gazetteer,
            config,
            now,
            rng,
        })
    }
}

fn load_config(path: &Path) -> Result<AnalysisConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: AnalysisConfig = toml::de::from_str(&contents)?;
    log::info!("Loaded analysis config from {}", path.display());
    Ok(config)
}

/// Output of the `patterns` subcommand.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Patterns {
    hourly: Vec<HourlyPattern>,
    daily: Vec<DayPattern>,
}

/// Runs `command` and returns its pretty-printed JSON output.
///
/// # Errors
///
/// Returns an error if the stage fails (e.g. route planning with no hotspot
/// zones) or the result cannot be serialized.
pub fn run(command: &Commands, ctx: &mut Context) -> Result<String, Box<dyn std::error::Error>> {
    let incidents = &ctx.incidents;
    let config = &mut ctx.config;
    let rng = ctx.rng.as_mut();

    let json = match command {
        Commands::Incidents => serde_json::to_string_pretty(incidents)?,
        Commands::Hotspots => serde_json::to_string_pretty(&identify_hotspots(
            incidents,
            &ctx.gazetteer,
            &config.hotspots,
            rng,
        ))?,
        Commands::Forecast { hours } => {
            if let Some(hours) = hours {
                config.forecast.horizon_hours = *hours;
            }
            serde_json::to_string_pretty(&predict_hotspots(incidents, ctx.now, &config.forecast))?
        }
        Commands::Heatmap => {
            let zones = identify_hotspots(incidents, &ctx.gazetteer, &config.hotspots, rng);
            let predictions = predict_hotspots(incidents, ctx.now, &config.forecast);
            serde_json::to_string_pretty(&generate_risk_heatmap(
                incidents,
                &zones,
                &predictions,
                &config.heatmap,
            ))?
        }
        Commands::Route { max_waypoints } => {
            if let Some(max) = max_waypoints {
                config.route.max_waypoints = *max;
            }
            let zones = identify_hotspots(incidents, &ctx.gazetteer, &config.hotspots, rng);
            serde_json::to_string_pretty(&optimize_patrol_route(&zones, &config.route, rng)?)?
        }
        Commands::Allocate { units } => {
            if let Some(units) = units {
                config.patrol_units = *units;
            }
            let zones = identify_hotspots(incidents, &ctx.gazetteer, &config.hotspots, rng);
            serde_json::to_string_pretty(&calculate_patrol_distribution(
                &zones,
                config.patrol_units,
                &config.allocation,
            ))?
        }
        Commands::Patterns => serde_json::to_string_pretty(&Patterns {
            hourly: analyze_time_patterns(incidents),
            daily: analyze_day_patterns(incidents),
        })?,
        Commands::Report => serde_json::to_string_pretty(&run_analysis(
            incidents,
            &ctx.gazetteer,
            config,
            ctx.now,
            rng,
        )?)?,
    };

    Ok(json)
}
