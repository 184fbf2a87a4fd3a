//! Hour-of-day and day-of-week incident distributions.

use chrono::{Datelike as _, Weekday};
use patrol_map_analytics_models::{DayPattern, HourlyPattern};
use patrol_map_incident_models::IncidentRecord;

/// Days in display order, Sunday first.
const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Incident counts for each hour 0-23, scored against the busiest hour.
#[must_use]
pub fn analyze_time_patterns(incidents: &[IncidentRecord]) -> Vec<HourlyPattern> {
    let mut counts = [0_usize; 24];
    for incident in incidents {
        counts[incident.hour() as usize] += 1;
    }

    let max = counts.iter().copied().max().unwrap_or(0);

    (0_u32..)
        .zip(counts)
        .map(|(hour, incident_count)| HourlyPattern {
            hour,
            incident_count,
            risk_level: relative(incident_count, max),
        })
        .collect()
}

/// Incident counts for each weekday (Sunday first), scored against the
/// busiest day.
#[must_use]
pub fn analyze_day_patterns(incidents: &[IncidentRecord]) -> Vec<DayPattern> {
    let mut counts = [0_usize; 7];
    for incident in incidents {
        counts[incident.timestamp.weekday().num_days_from_sunday() as usize] += 1;
    }

    let max = counts.iter().copied().max().unwrap_or(0);

    WEEK.iter()
        .zip(counts)
        .map(|(&day, incident_count)| DayPattern {
            day,
            incident_count,
            risk: relative(incident_count, max),
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn relative(count: usize, max: usize) -> f64 {
    if max == 0 {
        0.0
    } else {
        count as f64 / max as f64 * 100.0
    }
}
