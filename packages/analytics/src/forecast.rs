//! Location- and hour-conditional incident forecasting.
//!
//! This is not a time-series model. For each location the engine looks at
//! incidents that happened around the same hour of day as the target window,
//! scales their daily rate by the week-over-week trend, and reports the
//! result with a confidence figure and human-readable reasoning.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDateTime, Timelike as _};
use patrol_map_analytics_models::{ForecastParams, PredictionResult, RiskLevel};
use patrol_map_geography::centroid;
use patrol_map_incident_models::{IncidentCategory, IncidentRecord};

use crate::sort_desc_by;

/// Incidents within this many hours of the target hour (either side,
/// wrapping across midnight) count as relevant.
const HOUR_WINDOW: u32 = 2;
/// Historical span the relevant count is averaged over.
const HISTORY_DAYS: f64 = 30.0;
const TREND_WINDOW_DAYS: i64 = 7;
const BASE_CONFIDENCE: f64 = 70.0;
const CONFIDENCE_SPAN: f64 = 25.0;
const MAX_CONFIDENCE: f64 = 95.0;
/// Patrol units recommended per predicted incident.
const PATROLS_PER_INCIDENT: f64 = 1.5;
/// Target hours flagged as peak (6 PM to midnight).
const PEAK_HOURS: std::ops::RangeInclusive<u32> = 18..=23;

/// Forecasts incident counts per location for the window starting
/// `params.horizon_hours` after `now`.
///
/// Locations with no incidents near the target hour are omitted. Results
/// are ordered by predicted count, highest first, and truncated to
/// `params.limit` when set. A horizon that takes the target outside the
/// representable date range yields no predictions.
#[must_use]
pub fn predict_hotspots(
    incidents: &[IncidentRecord],
    now: NaiveDateTime,
    params: &ForecastParams,
) -> Vec<PredictionResult> {
    let Some(target) = Duration::try_hours(params.horizon_hours)
        .and_then(|horizon| now.checked_add_signed(horizon))
    else {
        log::warn!(
            "Forecast horizon of {} hours from {now} is out of range; skipping forecast",
            params.horizon_hours
        );
        return Vec::new();
    };
    let target_hour = target.hour();

    let mut predictions: Vec<PredictionResult> = group_by_location(incidents)
        .into_iter()
        .filter_map(|(location, group)| predict_location(location, &group, now, target))
        .collect();

    sort_desc_by(&mut predictions, |p| f64::from(p.predicted_incidents));

    let total = predictions.len();
    if let Some(limit) = params.limit {
        predictions.truncate(limit);
    }

    log::info!(
        "Forecast for {target} (hour {target_hour}): {total} locations with relevant history, returning {}",
        predictions.len()
    );

    predictions
}

/// Groups incidents by location name, preserving first-encounter order.
fn group_by_location(incidents: &[IncidentRecord]) -> Vec<(&str, Vec<&IncidentRecord>)> {
    let mut positions: BTreeMap<&str, usize> = BTreeMap::new();
    let mut groups: Vec<(&str, Vec<&IncidentRecord>)> = Vec::new();

    for incident in incidents {
        let location = incident.location.as_str();
        if let Some(&pos) = positions.get(location) {
            groups[pos].1.push(incident);
        } else {
            positions.insert(location, groups.len());
            groups.push((location, vec![incident]));
        }
    }

    groups
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn predict_location(
    location: &str,
    group: &[&IncidentRecord],
    now: NaiveDateTime,
    target: NaiveDateTime,
) -> Option<PredictionResult> {
    let target_hour = target.hour();
    let relevant: Vec<&IncidentRecord> = group
        .iter()
        .copied()
        .filter(|i| hour_distance(i.hour(), target_hour) <= HOUR_WINDOW)
        .collect();

    if relevant.is_empty() {
        log::debug!("No incidents near {target_hour}:00 at {location}, skipping");
        return None;
    }

    let coordinate = centroid(relevant.iter().map(|i| i.coordinate))?;
    let trend = Trend::measure(group, now);

    let baseline = relevant.len() as f64 / HISTORY_DAYS;
    let adjusted = baseline.mul_add(trend.percentage / 100.0, baseline);
    let predicted_incidents = adjusted.round().max(1.0) as u32;

    let confidence = (relevant.len() as f64 / group.len() as f64)
        .mul_add(CONFIDENCE_SPAN, BASE_CONFIDENCE)
        .min(MAX_CONFIDENCE);

    let mut reasoning = vec![format!(
        "Historical pattern match: {}%",
        confidence.round()
    )];
    if let Some(line) = trend.describe() {
        reasoning.push(line);
    }
    reasoning.push(format!(
        "{} similar incidents in past 30 days",
        relevant.len()
    ));
    if PEAK_HOURS.contains(&target_hour) {
        reasoning.push("Peak incident hours (6 PM - 12 AM)".to_string());
    }
    let top = top_categories(relevant.iter().map(|i| i.category), 2);
    reasoning.push(format!(
        "Primary types: {}",
        top.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));

    log::debug!(
        "{location}: {} relevant of {}, trend {:+}, predicted {predicted_incidents}",
        relevant.len(),
        group.len(),
        trend.difference
    );

    Some(PredictionResult {
        location: location.to_string(),
        coordinate,
        predicted_incidents,
        confidence: confidence.round(),
        time_window: format!(
            "{} {target_hour}:00 - {}:00",
            target.format("%Y-%m-%d"),
            (target_hour + HOUR_WINDOW) % 24
        ),
        risk_level: RiskLevel::from_predicted(predicted_incidents),
        reasoning,
        recommended_patrols: (f64::from(predicted_incidents) * PATROLS_PER_INCIDENT).ceil() as u32,
    })
}

/// Circular distance between two hours of the day.
const fn hour_distance(a: u32, b: u32) -> u32 {
    let diff = a.abs_diff(b) % 24;
    if diff > 12 { 24 - diff } else { diff }
}

/// Week-over-week change in incident volume at a location.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Trend {
    /// Last 7 days minus the 7 days before that.
    difference: i64,
    /// `difference` as a percentage of the older window; 0 when the older
    /// window is empty.
    percentage: f64,
}

impl Trend {
    #[allow(clippy::cast_precision_loss)]
    fn measure(group: &[&IncidentRecord], now: NaiveDateTime) -> Self {
        let window = Duration::days(TREND_WINDOW_DAYS);
        let mut recent = 0_i64;
        let mut older = 0_i64;

        for incident in group {
            let age = now - incident.timestamp;
            if age < window {
                recent += 1;
            } else if age < window * 2 {
                older += 1;
            }
        }

        let difference = recent - older;
        let percentage = if older > 0 {
            difference as f64 / older as f64 * 100.0
        } else {
            0.0
        };

        Self {
            difference,
            percentage,
        }
    }

    /// Reasoning line for the trend, `None` when the volume is flat. With
    /// an empty older window the percentage reads 0.
    fn describe(&self) -> Option<String> {
        match self.difference {
            d if d > 0 => Some(format!(
                "Upward trend detected: +{}%",
                self.percentage.round()
            )),
            d if d < 0 => Some(format!("Downward trend: {}%", self.percentage.round())),
            _ => None,
        }
    }
}

/// The `n` most frequent categories, ties going to whichever was seen first.
fn top_categories<I>(categories: I, n: usize) -> Vec<IncidentCategory>
where
    I: IntoIterator<Item = IncidentCategory>,
{
    let mut counts: Vec<(IncidentCategory, usize)> = Vec::new();
    for category in categories {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, count)) => *count += 1,
            None => counts.push((category, 1)),
        }
    }

    // Stable sort keeps encounter order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(c, _)| c).collect()
}
