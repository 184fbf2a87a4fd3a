//! Heatmap synthesis.
//!
//! Three independent layers are flattened into one list of heat points:
//! hotspot zones, forecast locations and ad-hoc clusters of the newest
//! incidents. Overlapping points are not merged; the renderer stacks them.

use patrol_map_analytics_models::{
    HeatmapParams, HotspotZone, PredictionResult, RiskHeatmapPoint, RiskLevel,
};
use patrol_map_geography::{centroid, planar_distance};
use patrol_map_geography_models::Coordinate;
use patrol_map_incident_models::IncidentRecord;

/// Cluster intensity never exceeds this, so clusters stay visually below
/// critical forecasts.
const MAX_CLUSTER_INTENSITY: f64 = 0.8;
/// Cluster size that would map to full intensity before the cap.
const CLUSTER_SATURATION: f64 = 10.0;

/// Heat intensity used for a forecast of the given risk level.
#[must_use]
pub const fn prediction_intensity(level: RiskLevel) -> f64 {
    match level {
        RiskLevel::Critical => 0.95,
        RiskLevel::High => 0.75,
        RiskLevel::Medium => 0.5,
        RiskLevel::Low => 0.25,
    }
}

/// Builds heat points for hotspots, predictions and recent-incident clusters,
/// in that order.
///
/// Deterministic: the same inputs always produce the same points.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn generate_risk_heatmap(
    incidents: &[IncidentRecord],
    hotspots: &[HotspotZone],
    predictions: &[PredictionResult],
    params: &HeatmapParams,
) -> Vec<RiskHeatmapPoint> {
    let mut points: Vec<RiskHeatmapPoint> = hotspots
        .iter()
        .map(|zone| RiskHeatmapPoint {
            coordinate: zone.coordinate,
            intensity: (zone.risk_score / 100.0).clamp(0.0, 1.0),
            radius: zone.radius,
        })
        .collect();

    points.extend(predictions.iter().map(|p| RiskHeatmapPoint {
        coordinate: p.coordinate,
        intensity: prediction_intensity(p.risk_level),
        radius: params.prediction_radius,
    }));

    let recent = most_recent(incidents, params.recent_sample);
    let clusters = cluster_points(&recent, params.cluster_threshold);
    let cluster_count = clusters.len();

    points.extend(
        clusters
            .into_iter()
            .filter(|c| c.size >= params.min_cluster_size)
            .map(|c| RiskHeatmapPoint {
                coordinate: c.center,
                intensity: (c.size as f64 / CLUSTER_SATURATION).min(MAX_CLUSTER_INTENSITY),
                radius: params.cluster_radius,
            }),
    );

    log::debug!(
        "Heatmap: {} zones, {} predictions, {cluster_count} clusters from {} recent incidents -> {} points",
        hotspots.len(),
        predictions.len(),
        recent.len(),
        points.len()
    );

    points
}

/// Coordinates of the `n` newest incidents, newest first. Incidents with the
/// same timestamp keep their input order.
fn most_recent(incidents: &[IncidentRecord], n: usize) -> Vec<Coordinate> {
    let mut sorted: Vec<&IncidentRecord> = incidents.iter().collect();
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    sorted.into_iter().take(n).map(|i| i.coordinate).collect()
}

/// A group of nearby points.
#[derive(Debug, Clone, PartialEq)]
struct Cluster {
    center: Coordinate,
    size: usize,
}

/// Greedy seed clustering: each unassigned point claims every other
/// unassigned point within `threshold` of itself.
///
/// Quadratic in the input size, which is bounded by the recent-sample size.
fn cluster_points(points: &[Coordinate], threshold: f64) -> Vec<Cluster> {
    let mut assigned = vec![false; points.len()];
    let mut clusters = Vec::new();

    for (i, &seed) in points.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let mut members = vec![seed];
        for (j, &other) in points.iter().enumerate() {
            if !assigned[j] && planar_distance(seed, other) <= threshold {
                assigned[j] = true;
                members.push(other);
            }
        }

        clusters.push(Cluster {
            center: centroid(members.iter().copied()).unwrap_or(seed),
            size: members.len(),
        });
    }

    clusters
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};
    use patrol_map_incident_models::IncidentCategory;

    use super::*;
    use crate::test_support::incident_at;

    fn zone(risk: f64) -> HotspotZone {
        HotspotZone {
            id: "ZONE-1".to_string(),
            name: "X".to_string(),
            coordinate: Coordinate::new(1.0, 1.0),
            radius: 0.015,
            risk_score: risk,
            incident_count: 10,
            predicted_incidents: 2,
            confidence: 90.0,
            primary_category: IncidentCategory::Theft,
        }
    }

    fn prediction(level: RiskLevel) -> PredictionResult {
        PredictionResult {
            location: "X".to_string(),
            coordinate: Coordinate::new(2.0, 2.0),
            predicted_incidents: 1,
            confidence: 80.0,
            time_window: String::new(),
            risk_level: level,
            reasoning: Vec::new(),
            recommended_patrols: 2,
        }
    }

    #[test]
    fn one_point_per_zone_and_prediction() {
        let points = generate_risk_heatmap(
            &[],
            &[zone(40.0), zone(120.0)],
            &[prediction(RiskLevel::High)],
            &HeatmapParams::default(),
        );
        assert_eq!(points.len(), 3);
        assert!((points[0].intensity - 0.4).abs() < 1e-12);
        assert!((points[1].intensity - 1.0).abs() < 1e-12);
        assert!((points[0].radius - 0.015).abs() < 1e-12);
        assert!((points[2].intensity - 0.75).abs() < 1e-12);
        assert!((points[2].radius - 0.01).abs() < 1e-12);
    }

    #[test]
    fn clusters_need_minimum_size() {
        let incidents = vec![
            incident_at("1", IncidentCategory::Theft, 0.0, 0.0),
            incident_at("2", IncidentCategory::Theft, 0.001, 0.0),
            incident_at("3", IncidentCategory::Theft, 0.0, 0.002),
            incident_at("4", IncidentCategory::Theft, 5.0, 5.0),
            incident_at("5", IncidentCategory::Theft, 5.001, 5.0),
        ];

        let points = generate_risk_heatmap(&incidents, &[], &[], &HeatmapParams::default());
        assert_eq!(points.len(), 1);

        let p = points[0];
        assert!((p.intensity - 0.3).abs() < 1e-12);
        assert!((p.radius - 0.008).abs() < 1e-12);
        assert!((p.coordinate.lat - 0.001 / 3.0).abs() < 1e-12);
        assert!((p.coordinate.lng - 0.002 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn cluster_intensity_is_capped() {
        let incidents: Vec<_> = (0..12)
            .map(|i| incident_at(&i.to_string(), IncidentCategory::Theft, 0.0, 0.0))
            .collect();
        let points = generate_risk_heatmap(&incidents, &[], &[], &HeatmapParams::default());
        assert_eq!(points.len(), 1);
        assert!((points[0].intensity - 0.8).abs() < 1e-12);
    }

    #[test]
    fn membership_is_measured_from_the_seed() {
        // b is within range of a, c only within range of b.
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.004, 0.0),
            Coordinate::new(0.008, 0.0),
        ];
        let clusters = cluster_points(&points, 0.005);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].size, 2);
        assert_eq!(clusters[1].size, 1);
        assert_eq!(clusters[1].center, Coordinate::new(0.008, 0.0));
    }

    #[test]
    fn only_newest_incidents_are_clustered() {
        let base = NaiveDate::from_ymd_opt(2024, 11, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let mut incidents = Vec::new();
        // Three old incidents stacked together, then three newer scattered ones.
        for i in 0..3 {
            let mut old = incident_at(&format!("old{i}"), IncidentCategory::Theft, 0.0, 0.0);
            old.timestamp = base - Duration::days(10);
            incidents.push(old);
        }
        for i in 0..3 {
            let mut new = incident_at(
                &format!("new{i}"),
                IncidentCategory::Theft,
                f64::from(i),
                0.0,
            );
            new.timestamp = base;
            incidents.push(new);
        }

        let params = HeatmapParams {
            recent_sample: 3,
            ..HeatmapParams::default()
        };
        assert!(generate_risk_heatmap(&incidents, &[], &[], &params).is_empty());
    }

    #[test]
    fn generation_is_idempotent() {
        let incidents: Vec<_> = (0..60)
            .map(|i| {
                incident_at(
                    &i.to_string(),
                    IncidentCategory::Robbery,
                    f64::from(i % 7) * 0.002,
                    f64::from(i % 5) * 0.002,
                )
            })
            .collect();
        let zones = [zone(55.0)];
        let predictions = [prediction(RiskLevel::Critical), prediction(RiskLevel::Low)];
        let params = HeatmapParams::default();

        let first = generate_risk_heatmap(&incidents, &zones, &predictions, &params);
        let second = generate_risk_heatmap(&incidents, &zones, &predictions, &params);
        assert_eq!(first, second);
        assert!(first.iter().all(|p| (0.0..=1.0).contains(&p.intensity)));
    }
}
