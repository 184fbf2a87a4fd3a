//! Patrol unit allocation proportional to zone risk.

use patrol_map_analytics_models::{AllocationParams, HotspotZone, PatrolAllocation};

/// Splits `total_units` across `zones` in proportion to their risk scores.
///
/// Each zone gets `round(risk / total_risk * total_units)` units. With
/// `params.min_one_per_zone` (the default) every zone gets at least one
/// unit, so the allocated sum can exceed `total_units` when there are many
/// zones relative to the pool. If every risk score is zero no zone has a
/// proportional share and only the floor applies.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn calculate_patrol_distribution(
    zones: &[HotspotZone],
    total_units: u32,
    params: &AllocationParams,
) -> Vec<PatrolAllocation> {
    let total_risk: f64 = zones.iter().map(|z| z.risk_score).sum();
    let floor = u32::from(params.min_one_per_zone);

    let allocations: Vec<PatrolAllocation> = zones
        .iter()
        .map(|zone| {
            let proportion = if total_risk > 0.0 {
                zone.risk_score / total_risk
            } else {
                0.0
            };
            let units = ((proportion * f64::from(total_units)).round() as u32).max(floor);

            let mut reasoning = format!("Risk score: {}/100", zone.risk_score.round());
            if zone.predicted_incidents > 0 {
                reasoning.push_str(&format!(
                    ", {} incidents predicted",
                    zone.predicted_incidents
                ));
            }

            PatrolAllocation {
                zone: zone.name.clone(),
                units,
                reasoning,
            }
        })
        .collect();

    let allocated: u32 = allocations.iter().map(|a| a.units).sum();
    if allocated > total_units {
        log::debug!(
            "Allocated {allocated} units across {} zones from a pool of {total_units}",
            zones.len()
        );
    }

    allocations
}
