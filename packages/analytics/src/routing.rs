//! Patrol route construction.
//!
//! Routes are built with a priority-biased nearest-neighbor heuristic: from
//! the current position, the next stop is the unvisited waypoint with the
//! best `priority / (distance + 0.1)` ratio. The heuristic is greedy and
//! never backtracks, so it is NOT an optimal tour; it favors reaching
//! high-risk zones early over minimizing total distance. Alternative routes
//! are shuffled rebuilds for comparison and are not guaranteed to be better.

use patrol_map_analytics_models::{
    HotspotZone, PatrolRoute, RouteMetrics, RouteOptimizationResult, RouteParams, Waypoint,
};
use patrol_map_geography::haversine_km;
use patrol_map_geography_models::Coordinate;

use crate::random::{RandomSource, shuffle};
use crate::{AnalyticsError, round_to, sort_desc_by};

/// Added to every leg distance so a waypoint at the current position does
/// not divide by zero, and very close waypoints do not dominate.
const DISTANCE_OFFSET_KM: f64 = 0.1;
/// Zones above this risk score count as critical in the route reasoning.
const CRITICAL_RISK: f64 = 70.0;
/// Risk points per 5-minute dwell bucket.
const RISK_PER_STAY_BUCKET: f64 = 20.0;
const STAY_BUCKET_MINUTES: u32 = 5;

/// Builds a patrol route through the highest-risk zones.
///
/// Only the `params.max_waypoints` highest-risk zones are routed (at least
/// one). Ties in the greedy choice go to the earlier candidate, and
/// candidates of equal priority keep their input order, so the primary
/// route is fully determined by the inputs. `rng` only drives the
/// alternative routes.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyInput`] if `zones` is empty.
pub fn optimize_patrol_route(
    zones: &[HotspotZone],
    params: &RouteParams,
    rng: &mut dyn RandomSource,
) -> Result<RouteOptimizationResult, AnalyticsError> {
    if zones.is_empty() {
        return Err(AnalyticsError::EmptyInput {
            operation: "route optimization",
        });
    }

    let params = &RouteParams {
        speed_kmh: travel_speed(params.speed_kmh),
        ..*params
    };

    let mut candidates: Vec<Waypoint> = zones.iter().map(to_waypoint).collect();
    sort_desc_by(&mut candidates, |w| w.priority);
    candidates.truncate(params.max_waypoints.max(1));

    let route = build_route("ROUTE-1".to_string(), params, &candidates);

    let alternatives: Vec<PatrolRoute> = (0..params.alternatives)
        .filter_map(|i| {
            let mut shuffled = candidates.clone();
            shuffle(&mut shuffled, rng);
            shuffled.truncate(candidates.len().saturating_sub(i));
            if shuffled.is_empty() {
                return None;
            }
            Some(build_route(format!("ROUTE-{}", i + 2), params, &shuffled))
        })
        .collect();

    let metrics = route_metrics(&route, zones.len());
    let reasoning = route_reasoning(&route, &metrics, zones);

    log::info!(
        "Routed {} of {} zones: {:.2} km, {} min, {} alternatives",
        route.waypoints.len(),
        zones.len(),
        route.total_distance_km,
        route.estimated_duration_minutes,
        alternatives.len()
    );

    Ok(RouteOptimizationResult {
        route,
        alternatives,
        metrics,
        reasoning,
    })
}

/// A usable average speed: non-positive or non-finite values fall back to
/// the default so travel times stay finite.
fn travel_speed(speed_kmh: f64) -> f64 {
    if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        let fallback = RouteParams::default().speed_kmh;
        log::warn!("Invalid patrol speed {speed_kmh} km/h; using {fallback} km/h");
        fallback
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_waypoint(zone: &HotspotZone) -> Waypoint {
    let buckets = (zone.risk_score / RISK_PER_STAY_BUCKET).ceil().clamp(1.0, 5.0) as u32;
    Waypoint {
        coordinate: zone.coordinate,
        name: zone.name.clone(),
        priority: zone.risk_score,
        estimated_stay_minutes: buckets * STAY_BUCKET_MINUTES,
    }
}

/// Greedily orders `candidates` starting from `params.start`.
///
/// `candidates` must be non-empty.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn build_route(id: String, params: &RouteParams, candidates: &[Waypoint]) -> PatrolRoute {
    let mut remaining: Vec<&Waypoint> = candidates.iter().collect();
    let mut visited: Vec<Waypoint> = Vec::with_capacity(candidates.len());
    let mut current: Coordinate = params.start;
    let mut total_distance = 0.0;
    let mut total_minutes = 0.0;

    while !remaining.is_empty() {
        let mut best_index = 0;
        let mut best_score = f64::NEG_INFINITY;

        for (idx, waypoint) in remaining.iter().enumerate() {
            let distance = haversine_km(current, waypoint.coordinate);
            let score = waypoint.priority / (distance + DISTANCE_OFFSET_KM);
            if score > best_score {
                best_score = score;
                best_index = idx;
            }
        }

        let next = remaining.remove(best_index);
        let distance = haversine_km(current, next.coordinate);
        total_distance += distance;
        total_minutes += (distance / params.speed_kmh)
            .mul_add(60.0, f64::from(next.estimated_stay_minutes));
        current = next.coordinate;
        visited.push(next.clone());
    }

    let coverage = (visited.len() as f64 / candidates.len() as f64 * 100.0).min(100.0);
    let avg_priority = visited.iter().map(|w| w.priority).sum::<f64>() / visited.len() as f64;
    // Efficiency is undefined without travel; report it as 0.
    let efficiency = if total_distance > 0.0 {
        (avg_priority / total_distance * 10.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    PatrolRoute {
        id,
        zones_visited: visited.iter().map(|w| w.name.clone()).collect(),
        waypoints: visited,
        total_distance_km: round_to(total_distance, 2),
        estimated_duration_minutes: total_minutes.round() as u32,
        coverage_score: coverage.round() as u32,
        efficiency_score: efficiency.round() as u32,
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn route_metrics(route: &PatrolRoute, zone_count: usize) -> RouteMetrics {
    let distance = route.total_distance_km;
    let stops = route.waypoints.len().max(1) as f64;
    let avg_response = f64::from(route.estimated_duration_minutes) / stops;
    let coverage = route.waypoints.len() as f64 / zone_count.max(1) as f64 * 100.0;
    let fuel = if distance > 0.0 {
        100.0 - distance / 100.0 * 10.0
    } else {
        100.0
    };

    RouteMetrics {
        total_distance_km: round_to(distance, 1),
        avg_response_time_minutes: round_to(avg_response, 1),
        coverage_percentage: coverage.round() as u32,
        fuel_efficiency: fuel.round().max(0.0) as u32,
    }
}

fn route_reasoning(
    route: &PatrolRoute,
    metrics: &RouteMetrics,
    zones: &[HotspotZone],
) -> Vec<String> {
    let mut reasoning = vec![
        format!(
            "Coverage of high-risk zones optimized at {}%",
            route.coverage_score
        ),
        format!(
            "Response time minimized to {:.1} minutes avg",
            metrics.avg_response_time_minutes
        ),
        format!("Route efficiency score: {}/100", route.efficiency_score),
    ];

    let critical = zones
        .iter()
        .filter(|z| z.risk_score > CRITICAL_RISK)
        .count();
    // Waypoint priority is the zone's risk score.
    let covered = route
        .waypoints
        .iter()
        .filter(|w| w.priority > CRITICAL_RISK)
        .count();
    if covered > 0 {
        reasoning.push(format!("{covered}/{critical} critical zones covered"));
    }

    reasoning.push(format!(
        "Total patrol distance: {:.1} km",
        metrics.total_distance_km
    ));

    reasoning
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use patrol_map_incident_models::IncidentCategory;

    use super::*;
    use crate::random::{SeededRandom, SequenceRandom};

    fn zone(name: &str, risk: f64, lat: f64, lng: f64) -> HotspotZone {
        HotspotZone {
            id: format!("ZONE-{name}"),
            name: name.to_string(),
            coordinate: Coordinate::new(lat, lng),
            radius: 0.015,
            risk_score: risk,
            incident_count: 10,
            predicted_incidents: 2,
            confidence: 90.0,
            primary_category: IncidentCategory::Theft,
        }
    }

    fn params_from(start: Coordinate) -> RouteParams {
        RouteParams {
            start,
            ..RouteParams::default()
        }
    }

    fn city() -> Vec<HotspotZone> {
        vec![
            zone("Rajpur Road", 22.0, 30.3255, 78.0436),
            zone("MG Road", 18.0, 30.3165, 78.0322),
            zone("Brigade Road", 15.0, 30.3215, 78.0511),
            zone("Whitefield", 12.0, 30.3355, 78.0625),
            zone("Mall Road", 11.0, 30.3125, 78.0289),
            zone("Clock Tower", 75.0, 30.3195, 78.0401),
            zone("Paltan Bazaar", 9.0, 30.3285, 78.0355),
        ]
    }

    #[test]
    fn empty_zones_is_an_error() {
        let result = optimize_patrol_route(
            &[],
            &RouteParams::default(),
            &mut SequenceRandom::constant(0.0),
        );
        assert!(matches!(result, Err(AnalyticsError::EmptyInput { .. })));
    }

    #[test]
    fn route_is_a_subset_without_duplicates() {
        let zones = city();
        let result = optimize_patrol_route(
            &zones,
            &RouteParams::default(),
            &mut SeededRandom::new(1),
        )
        .unwrap();

        let names: BTreeSet<&str> = zones.iter().map(|z| z.name.as_str()).collect();
        for route in std::iter::once(&result.route).chain(&result.alternatives) {
            let visited: BTreeSet<&str> = route.zones_visited.iter().map(String::as_str).collect();
            assert_eq!(visited.len(), route.zones_visited.len());
            assert!(visited.is_subset(&names));
            assert_eq!(route.waypoints.len(), route.zones_visited.len());
        }

        assert_eq!(result.route.coverage_score, 100);
        assert_eq!(result.metrics.coverage_percentage, 100);
        assert_eq!(result.route.id, "ROUTE-1");
    }

    #[test]
    fn max_waypoints_keeps_highest_priority() {
        let zones = city();
        let params = RouteParams {
            max_waypoints: 3,
            ..RouteParams::default()
        };
        let result = optimize_patrol_route(&zones, &params, &mut SeededRandom::new(3)).unwrap();

        let visited: BTreeSet<&str> = result
            .route
            .zones_visited
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(
            visited,
            BTreeSet::from(["Clock Tower", "Rajpur Road", "MG Road"])
        );
        assert_eq!(result.route.coverage_score, 100);
        // 3 of 7 zones
        assert_eq!(result.metrics.coverage_percentage, 43);
    }

    #[test]
    fn high_priority_pulls_route_first() {
        let zones = vec![
            zone("Near", 1.0, 0.01, 0.0),
            zone("Far", 90.0, 0.05, 0.0),
        ];
        let result = optimize_patrol_route(
            &zones,
            &params_from(Coordinate::new(0.0, 0.0)),
            &mut SequenceRandom::constant(0.0),
        )
        .unwrap();
        assert_eq!(result.route.zones_visited, vec!["Far", "Near"]);
    }

    #[test]
    fn equidistant_tie_goes_to_first_candidate() {
        let zones = vec![
            zone("North", 50.0, 0.01, 0.0),
            zone("South", 50.0, -0.01, 0.0),
        ];
        let params = params_from(Coordinate::new(0.0, 0.0));

        let first = optimize_patrol_route(&zones, &params, &mut SeededRandom::new(9)).unwrap();
        let second = optimize_patrol_route(&zones, &params, &mut SeededRandom::new(9)).unwrap();

        assert_eq!(first.route.zones_visited, vec!["North", "South"]);
        assert_eq!(first, second);
    }

    #[test]
    fn stay_time_buckets() {
        let stays: Vec<u32> = [1.0, 20.0, 20.5, 55.0, 100.0]
            .iter()
            .map(|&r| to_waypoint(&zone("Z", r, 0.0, 0.0)).estimated_stay_minutes)
            .collect();
        assert_eq!(stays, vec![5, 5, 10, 15, 25]);
    }

    #[test]
    fn zero_distance_route_is_guarded() {
        let zones = vec![zone("Here", 80.0, 0.0, 0.0)];
        let result = optimize_patrol_route(
            &zones,
            &params_from(Coordinate::new(0.0, 0.0)),
            &mut SequenceRandom::constant(0.0),
        )
        .unwrap();

        let route = &result.route;
        assert!(route.total_distance_km.abs() < f64::EPSILON);
        assert_eq!(route.efficiency_score, 0);
        assert_eq!(route.estimated_duration_minutes, 20);
        assert_eq!(result.metrics.fuel_efficiency, 100);
        assert!((result.metrics.avg_response_time_minutes - 20.0).abs() < f64::EPSILON);
        // One alternative keeps the single waypoint; the second would be empty.
        assert_eq!(result.alternatives.len(), 1);
        assert_eq!(result.alternatives[0].id, "ROUTE-2");
    }

    #[test]
    fn travel_time_uses_average_speed() {
        // One degree of latitude is ~111.19 km; at 21 km/h that is ~317.7 min.
        let zones = vec![zone("Far", 10.0, 1.0, 0.0)];
        let result = optimize_patrol_route(
            &zones,
            &params_from(Coordinate::new(0.0, 0.0)),
            &mut SequenceRandom::constant(0.0),
        )
        .unwrap();
        assert!((result.route.total_distance_km - 111.19).abs() < 1e-9);
        assert_eq!(result.route.estimated_duration_minutes, 323);
        assert_eq!(result.metrics.fuel_efficiency, 89);
        assert_eq!(result.route.efficiency_score, 1);
    }

    #[test]
    fn alternatives_drop_one_waypoint_each() {
        let zones = city();
        let result = optimize_patrol_route(
            &zones,
            &RouteParams {
                alternatives: 3,
                ..RouteParams::default()
            },
            &mut SeededRandom::new(5),
        )
        .unwrap();

        let sizes: Vec<usize> = result.alternatives.iter().map(|r| r.waypoints.len()).collect();
        assert_eq!(sizes, vec![7, 6, 5]);
        let ids: Vec<&str> = result.alternatives.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ROUTE-2", "ROUTE-3", "ROUTE-4"]);
    }

    #[test]
    fn reasoning_mentions_critical_zones() {
        let result = optimize_patrol_route(
            &city(),
            &RouteParams::default(),
            &mut SeededRandom::new(11),
        )
        .unwrap();

        assert_eq!(
            result.reasoning[0],
            "Coverage of high-risk zones optimized at 100%"
        );
        assert!(result.reasoning.contains(&"1/1 critical zones covered".to_string()));
        assert!(
            result
                .reasoning
                .last()
                .unwrap()
                .starts_with("Total patrol distance:")
        );
    }

    #[test]
    fn critical_count_is_per_zone_not_per_name() {
        let zones = vec![
            zone("Twin", 90.0, 0.01, 0.0),
            zone("Twin", 80.0, 0.5, 0.0),
            zone("Other", 10.0, 0.02, 0.0),
        ];
        let params = RouteParams {
            max_waypoints: 1,
            ..params_from(Coordinate::new(0.0, 0.0))
        };
        let result = optimize_patrol_route(&zones, &params, &mut SeededRandom::new(4)).unwrap();
        assert!(result.reasoning.contains(&"1/2 critical zones covered".to_string()));

        let all = optimize_patrol_route(
            &zones,
            &params_from(Coordinate::new(0.0, 0.0)),
            &mut SeededRandom::new(4),
        )
        .unwrap();
        assert!(all.reasoning.contains(&"2/2 critical zones covered".to_string()));
    }

    #[test]
    fn invalid_speed_falls_back_to_default() {
        let zones = vec![zone("Far", 10.0, 1.0, 0.0)];
        let expected = optimize_patrol_route(
            &zones,
            &params_from(Coordinate::new(0.0, 0.0)),
            &mut SequenceRandom::constant(0.0),
        )
        .unwrap();

        for speed_kmh in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let params = RouteParams {
                speed_kmh,
                ..params_from(Coordinate::new(0.0, 0.0))
            };
            let result =
                optimize_patrol_route(&zones, &params, &mut SequenceRandom::constant(0.0)).unwrap();
            assert_eq!(result.route.estimated_duration_minutes, 323);
            assert_eq!(
                result.route.estimated_duration_minutes,
                expected.route.estimated_duration_minutes
            );
        }
    }

    #[test]
    fn scores_stay_within_bounds() {
        let result =
            optimize_patrol_route(&city(), &RouteParams::default(), &mut SeededRandom::new(2))
                .unwrap();
        for route in std::iter::once(&result.route).chain(&result.alternatives) {
            assert!(route.coverage_score <= 100);
            assert!(route.efficiency_score <= 100);
        }
        assert!(result.metrics.fuel_efficiency <= 100);
    }
}
