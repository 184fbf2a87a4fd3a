#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geographic primitives and gazetteer types.
//!
//! Positions are plain latitude/longitude pairs in degrees. The gazetteer is
//! the named table of candidate centroids that hotspot detection clusters
//! around; it is always passed in explicitly so callers can substitute any
//! geography.

use serde::{Deserialize, Serialize};

/// A point on the map in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A named candidate centroid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLocation {
    /// Display name (e.g. "Clock Tower").
    pub name: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

impl NamedLocation {
    #[must_use]
    pub const fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// A table of named locations, deserialized from TOML.
///
/// ```toml
/// id = "dehradun"
/// name = "Dehradun city centre"
///
/// [[locations]]
/// name = "Clock Tower"
/// lat = 30.3195
/// lng = 78.0401
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gazetteer {
    /// Unique identifier (e.g. `"dehradun"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Candidate centroids, in priority order. Zone identifiers are derived
    /// from the position in this list.
    #[serde(default)]
    pub locations: Vec<NamedLocation>,
}

impl Gazetteer {
    /// Returns the location with the given name, if any.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&NamedLocation> {
        self.locations.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
