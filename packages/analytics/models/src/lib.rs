#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result and parameter types for the patrol analytics pipeline.
//!
//! Everything here is plain data: the analytics crate constructs these
//! values and the presentation layer renders or transmits them as-is. All
//! types serialize as camelCase JSON.

use chrono::Weekday;
use patrol_map_geography_models::Coordinate;
use patrol_map_incident_models::IncidentCategory;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Forecast risk classification for a location.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Classifies a predicted incident count.
    #[must_use]
    pub const fn from_predicted(predicted: u32) -> Self {
        match predicted {
            5.. => Self::Critical,
            3..=4 => Self::High,
            2 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// A gazetteer centroid that attracted enough incidents to be flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotZone {
    /// `ZONE-{n}`, where `n` is the 1-based gazetteer position.
    pub id: String,
    /// Name of the gazetteer entry.
    pub name: String,
    /// Gazetteer centroid.
    pub coordinate: Coordinate,
    /// Inclusion radius in degrees.
    pub radius: f64,
    /// Share of all incidents that fall in this zone, 0-100.
    pub risk_score: f64,
    /// Incidents within the radius.
    pub incident_count: usize,
    /// Naive short-horizon projection (15% of `incident_count`).
    pub predicted_incidents: u32,
    /// Confidence percentage.
    pub confidence: f64,
    /// Most frequent category within the zone.
    pub primary_category: IncidentCategory,
}

/// Forecast for a single location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Location name the incidents were reported under.
    pub location: String,
    /// Centroid of the incidents that contributed to the forecast.
    pub coordinate: Coordinate,
    /// Expected incidents in the target window. Always at least 1.
    pub predicted_incidents: u32,
    /// Confidence percentage, 70-95.
    pub confidence: f64,
    /// Human-readable target window (e.g. `"2024-11-06 21:00 - 23:00"`).
    pub time_window: String,
    pub risk_level: RiskLevel,
    /// Short justifications, most important first.
    pub reasoning: Vec<String>,
    /// Suggested patrol units for the window.
    pub recommended_patrols: u32,
}

/// A rendering hint for heatmap layers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskHeatmapPoint {
    pub coordinate: Coordinate,
    /// 0-1.
    pub intensity: f64,
    /// Degrees.
    pub radius: f64,
}

/// A patrol stop derived from a hotspot zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    pub coordinate: Coordinate,
    /// Zone name.
    pub name: String,
    /// Zone risk score.
    pub priority: f64,
    /// On-site dwell time in minutes (5-25).
    pub estimated_stay_minutes: u32,
}

/// An ordered patrol route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolRoute {
    pub id: String,
    /// Stops in visiting order.
    pub waypoints: Vec<Waypoint>,
    /// Kilometers, rounded to 2 decimals.
    pub total_distance_km: f64,
    /// Travel plus dwell time in whole minutes.
    pub estimated_duration_minutes: u32,
    /// Percentage of candidate waypoints visited.
    pub coverage_score: u32,
    /// Average priority per kilometer, scaled to 0-100.
    pub efficiency_score: u32,
    /// Waypoint names in visiting order.
    pub zones_visited: Vec<String>,
}

/// Summary numbers for the primary route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetrics {
    /// Kilometers, rounded to 1 decimal.
    pub total_distance_km: f64,
    /// Minutes per waypoint, rounded to 1 decimal.
    pub avg_response_time_minutes: f64,
    /// Percentage of all input zones on the route.
    pub coverage_percentage: u32,
    /// Heuristic 0-100, shorter routes score higher.
    pub fuel_efficiency: u32,
}

/// Everything produced by one route optimization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteOptimizationResult {
    pub route: PatrolRoute,
    /// Shuffled variants for comparison. Not guaranteed to be better.
    pub alternatives: Vec<PatrolRoute>,
    pub metrics: RouteMetrics,
    pub reasoning: Vec<String>,
}

/// Patrol units assigned to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatrolAllocation {
    /// Zone name.
    pub zone: String,
    pub units: u32,
    pub reasoning: String,
}

/// Incident volume for one hour of the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyPattern {
    /// 0-23.
    pub hour: u32,
    pub incident_count: usize,
    /// Volume relative to the busiest hour, 0-100.
    pub risk_level: f64,
}

/// Incident volume for one day of the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPattern {
    pub day: Weekday,
    pub incident_count: usize,
    /// Volume relative to the busiest day, 0-100.
    pub risk: f64,
}

/// Parameters for hotspot detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HotspotParams {
    /// Minimum incidents within the radius for a zone to be emitted.
    pub min_incidents: usize,
    /// Inclusion radius in degrees (0.015 is roughly 1.5 km).
    pub radius: f64,
}

impl Default for HotspotParams {
    fn default() -> Self {
        Self {
            min_incidents: 10,
            radius: 0.015,
        }
    }
}

/// Parameters for the forecast engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ForecastParams {
    /// How far ahead of "now" the target window starts.
    pub horizon_hours: i64,
    /// Keep only the top `limit` predictions. `None` returns all of them.
    pub limit: Option<usize>,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon_hours: 24,
            limit: Some(10),
        }
    }
}

/// Parameters for heatmap synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HeatmapParams {
    /// How many of the newest incidents feed ad-hoc clustering.
    pub recent_sample: usize,
    /// Maximum degree distance from a cluster seed.
    pub cluster_threshold: f64,
    /// Clusters smaller than this are not drawn.
    pub min_cluster_size: usize,
    /// Radius of prediction points in degrees.
    pub prediction_radius: f64,
    /// Radius of cluster points in degrees.
    pub cluster_radius: f64,
}

impl Default for HeatmapParams {
    fn default() -> Self {
        Self {
            recent_sample: 50,
            cluster_threshold: 0.005,
            min_cluster_size: 3,
            prediction_radius: 0.01,
            cluster_radius: 0.008,
        }
    }
}

/// Parameters for patrol route optimization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RouteParams {
    /// Where the patrol starts.
    pub start: Coordinate,
    /// Only the highest-priority `max_waypoints` zones are routed.
    pub max_waypoints: usize,
    /// Number of shuffled alternative routes to build.
    pub alternatives: usize,
    /// Average travel speed used for time estimates.
    pub speed_kmh: f64,
}

impl Default for RouteParams {
    fn default() -> Self {
        Self {
            start: Coordinate::new(30.3165, 78.0322),
            max_waypoints: 12,
            alternatives: 2,
            speed_kmh: 21.0,
        }
    }
}

/// Parameters for patrol unit allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AllocationParams {
    /// Give every zone at least one unit even when its proportional share
    /// rounds to zero. The allocated total can then exceed the pool.
    pub min_one_per_zone: bool,
}

impl Default for AllocationParams {
    fn default() -> Self {
        Self {
            min_one_per_zone: true,
        }
    }
}

/// Full pipeline configuration, usually loaded from TOML.
///
/// Every table and field is optional:
///
/// ```toml
/// patrol_units = 20
///
/// [hotspots]
/// min_incidents = 5
///
/// [route]
/// max_waypoints = 8
/// start = { lat = 30.32, lng = 78.04 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AnalysisConfig {
    /// Size of the patrol pool handed to the allocator.
    pub patrol_units: u32,
    pub hotspots: HotspotParams,
    pub forecast: ForecastParams,
    pub heatmap: HeatmapParams,
    pub route: RouteParams,
    pub allocation: AllocationParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            patrol_units: 15,
            hotspots: HotspotParams::default(),
            forecast: ForecastParams::default(),
            heatmap: HeatmapParams::default(),
            route: RouteParams::default(),
            allocation: AllocationParams::default(),
        }
    }
}

/// Every artifact of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub incident_count: usize,
    pub hotspots: Vec<HotspotZone>,
    pub predictions: Vec<PredictionResult>,
    pub heatmap: Vec<RiskHeatmapPoint>,
    /// `None` when no hotspot qualified, since there is nothing to route.
    pub route: Option<RouteOptimizationResult>,
    pub allocations: Vec<PatrolAllocation>,
    pub hourly_patterns: Vec<HourlyPattern>,
    pub day_patterns: Vec<DayPattern>,
}
