//! Hotspot detection around gazetteer centroids.
//!
//! Each gazetteer entry is a candidate zone. Incidents are assigned to every
//! centroid whose inclusion radius covers them (zones may overlap), and a
//! zone is only materialized once it reaches the minimum incident count.

use patrol_map_analytics_models::{HotspotParams, HotspotZone};
use patrol_map_geography_models::Gazetteer;
use patrol_map_incident_models::{IncidentCategory, IncidentRecord};
use patrol_map_spatial::PointIndex;

use crate::random::RandomSource;
use crate::{clamp_percent, sort_desc_by};

/// Base confidence assigned to every zone.
const BASE_CONFIDENCE: f64 = 85.0;
/// Maximum random jitter added on top of [`BASE_CONFIDENCE`].
const CONFIDENCE_JITTER: f64 = 10.0;
const MAX_CONFIDENCE: f64 = 95.0;
/// Share of the zone's incident count projected as upcoming incidents.
const PREDICTED_SHARE: f64 = 0.15;

/// Clusters incidents into hotspot zones, highest risk first.
///
/// The zone confidence is a placeholder for a real scoring model: a fixed
/// base plus up to ten points of jitter drawn from `rng`, capped at 95.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn identify_hotspots(
    incidents: &[IncidentRecord],
    gazetteer: &Gazetteer,
    params: &HotspotParams,
    rng: &mut dyn RandomSource,
) -> Vec<HotspotZone> {
    if incidents.is_empty() {
        return Vec::new();
    }

    let index = PointIndex::build(incidents.iter().map(|i| i.coordinate));
    let total = incidents.len() as f64;
    let mut zones = Vec::new();

    for (idx, location) in gazetteer.locations.iter().enumerate() {
        let members = index.within_radius(location.coordinate(), params.radius);

        if members.len() < params.min_incidents {
            log::debug!(
                "Skipping {}: {} incidents (minimum {})",
                location.name,
                members.len(),
                params.min_incidents
            );
            continue;
        }

        let Some(primary_category) =
            primary_category(members.iter().map(|&i| incidents[i].category))
        else {
            // Only reachable with `min_incidents = 0` and an empty zone.
            continue;
        };

        let count = members.len();
        let risk_score = clamp_percent(count as f64 / total * 100.0);
        let confidence = CONFIDENCE_JITTER
            .mul_add(rng.next_f64(), BASE_CONFIDENCE)
            .min(MAX_CONFIDENCE);

        zones.push(HotspotZone {
            id: format!("ZONE-{}", idx + 1),
            name: location.name.clone(),
            coordinate: location.coordinate(),
            radius: params.radius,
            risk_score,
            incident_count: count,
            predicted_incidents: round_to_u32(count as f64 * PREDICTED_SHARE),
            confidence,
            primary_category,
        });
    }

    sort_desc_by(&mut zones, |z| z.risk_score);

    log::info!(
        "Identified {} hotspot zones from {} incidents across {} candidate centroids",
        zones.len(),
        incidents.len(),
        gazetteer.len()
    );

    zones
}

/// Most frequent category, ties going to whichever was seen first.
fn primary_category<I>(categories: I) -> Option<IncidentCategory>
where
    I: IntoIterator<Item = IncidentCategory>,
{
    let mut counts: Vec<(IncidentCategory, usize)> = Vec::new();
    for category in categories {
        match counts.iter_mut().find(|(c, _)| *c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category, 1)),
        }
    }

    let mut best: Option<(IncidentCategory, usize)> = None;
    for (category, n) in counts {
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((category, n));
        }
    }
    best.map(|(category, _)| category)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_to_u32(value: f64) -> u32 {
    value.round().max(0.0) as u32
}
