//! Synthetic incident history.
//!
//! Produces a plausible month of incidents over a gazetteer for demos and
//! tests. Volume is skewed toward evenings and the small hours so the
//! temporal patterns and forecasts have something to find.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use patrol_map_analytics::random::RandomSource;
use patrol_map_geography_models::{Coordinate, Gazetteer};
use patrol_map_incident_models::{IncidentCategory, IncidentRecord, IncidentSeverity};
use serde::{Deserialize, Serialize};

const MIN_PER_DAY: usize = 15;
/// Number of distinct daily volumes above [`MIN_PER_DAY`] (15-29 per day).
const PER_DAY_SPREAD: usize = 15;
/// Maximum offset from the location centroid in either axis, in degrees.
const JITTER_DEGREES: f64 = 0.005;
const RESOLVED_PROBABILITY: f64 = 0.7;

/// Parameters for [`generate_incidents`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SyntheticParams {
    /// Number of days of history, counting back from today.
    pub days: u32,
}

impl Default for SyntheticParams {
    fn default() -> Self {
        Self { days: 30 }
    }
}

/// Generates `params.days` days of incidents ending on `now`'s date, newest
/// first.
///
/// Each incident is placed at a uniformly chosen gazetteer location, jittered
/// by up to half a hundredth of a degree. Hours follow a fixed mix: 40% in
/// the evening (18-23h), 20% after midnight (0-3h) and the rest at any hour.
/// Incidents on the current day may be later than `now`.
#[must_use]
pub fn generate_incidents(
    gazetteer: &Gazetteer,
    params: &SyntheticParams,
    now: NaiveDateTime,
    rng: &mut dyn RandomSource,
) -> Vec<IncidentRecord> {
    if gazetteer.is_empty() {
        log::warn!(
            "Gazetteer '{}' has no locations; nothing to generate",
            gazetteer.id
        );
        return Vec::new();
    }

    let categories = IncidentCategory::all();
    let severities = IncidentSeverity::all();
    let mut incidents = Vec::new();
    let mut next_id = 1_u32;

    for day in 0..params.days {
        let midnight = (now.date() - Duration::days(i64::from(day))).and_time(NaiveTime::MIN);
        let per_day = MIN_PER_DAY + rng.next_index(PER_DAY_SPREAD);

        for _ in 0..per_day {
            let location = &gazetteer.locations[rng.next_index(gazetteer.len())];
            let category = categories[rng.next_index(categories.len())];
            let hour = draw_hour(rng);
            let minute = draw(rng, 60);

            let coordinate = Coordinate::new(
                location.lat + jitter(rng),
                location.lng + jitter(rng),
            );

            incidents.push(IncidentRecord {
                id: format!("C{next_id:04}"),
                category,
                location: location.name.clone(),
                coordinate,
                timestamp: midnight + Duration::hours(hour) + Duration::minutes(minute),
                severity: severities[rng.next_index(severities.len())],
                resolved: rng.next_f64() < RESOLVED_PROBABILITY,
            });
            next_id += 1;
        }
    }

    incidents.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    log::info!(
        "Generated {} synthetic incidents over {} days across {} locations",
        incidents.len(),
        params.days,
        gazetteer.len()
    );

    incidents
}

fn draw_hour(rng: &mut dyn RandomSource) -> i64 {
    let bucket = rng.next_f64();
    if bucket < 0.4 {
        18 + draw(rng, 6)
    } else if bucket < 0.6 {
        draw(rng, 4)
    } else {
        draw(rng, 24)
    }
}

fn draw(rng: &mut dyn RandomSource, n: usize) -> i64 {
    i64::try_from(rng.next_index(n)).unwrap_or(0)
}

fn jitter(rng: &mut dyn RandomSource) -> f64 {
    (rng.next_f64() - 0.5) * 2.0 * JITTER_DEGREES
}
