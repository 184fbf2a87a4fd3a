#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry helpers and gazetteer loading.
//!
//! Two distance measures are used across the pipeline: great-circle
//! kilometers ([`haversine_km`]) for anything that is reported to a user
//! (route lengths, travel time), and raw degree-space Euclidean distance
//! ([`planar_distance`]) for the cheap proximity checks in hotspot and
//! cluster detection.

pub mod registry;

use patrol_map_geography_models::Coordinate;
use thiserror::Error;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors that can occur while loading geography configuration.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// Reading a gazetteer file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A gazetteer file is not valid TOML or does not match the schema.
    #[error("Invalid gazetteer: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Great-circle distance between two points in kilometers.
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    // Rounding can push `h` a hair outside [0, 1] for (anti)podal points,
    // which would make the square roots below NaN.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Euclidean distance in degree space.
#[must_use]
pub fn planar_distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.lat - b.lat).hypot(a.lng - b.lng)
}

/// Mean coordinate of a set of points. Returns `None` for an empty input.
#[must_use]
pub fn centroid<I>(points: I) -> Option<Coordinate>
where
    I: IntoIterator<Item = Coordinate>,
{
    let (count, lat, lng) = points
        .into_iter()
        .fold((0_u32, 0.0, 0.0), |(n, lat, lng), c| {
            (n + 1, lat + c.lat, lng + c.lng)
        });

    if count == 0 {
        return None;
    }

    let n = f64::from(count);
    Some(Coordinate::new(lat / n, lng / n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_zero_for_identical_points() {
        let p = Coordinate::new(30.3165, 78.0322);
        let d = haversine_km(p, p);
        assert!(d.abs() < 1e-12, "{d}");
        assert!(!d.is_nan());
    }

    #[test]
    fn haversine_stable_for_near_identical_points() {
        let a = Coordinate::new(30.3165, 78.0322);
        let b = Coordinate::new(30.316_500_000_1, 78.032_200_000_1);
        let d = haversine_km(a, b);
        assert!(d.is_finite());
        assert!(d < 1e-6, "{d}");
    }

    #[test]
    fn haversine_one_degree_latitude() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        // 2 * pi * 6371 / 360
        assert!((haversine_km(a, b) - 111.194_926_6).abs() < 1e-3);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = Coordinate::new(30.3255, 78.0436);
        let b = Coordinate::new(30.3125, 78.0289);
        assert!((haversine_km(a, b) - haversine_km(b, a)).abs() < 1e-12);
    }

    #[test]
    fn haversine_antipodal_is_finite() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let d = haversine_km(a, b);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn planar_distance_is_euclidean() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.003, 0.004);
        assert!((planar_distance(a, b) - 0.005).abs() < 1e-12);
    }

    #[test]
    fn centroid_of_points() {
        let c = centroid([Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]).unwrap();
        assert!((c.lat - 2.0).abs() < 1e-12);
        assert!((c.lng - 3.0).abs() < 1e-12);
        assert!(centroid(std::iter::empty()).is_none());
    }
}
