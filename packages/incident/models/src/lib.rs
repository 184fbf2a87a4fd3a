#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Incident record types shared by every stage of the patrol-map pipeline.
//!
//! An [`IncidentRecord`] is produced by a data source (synthetic generator,
//! file, live feed) and is read-only to the analytics crates. Categories and
//! severities are closed enumerations so downstream grouping never has to
//! deal with free-form strings.

use chrono::{NaiveDateTime, Timelike as _};
use patrol_map_geography_models::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Severity of a reported incident, ordered from least to most severe.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum IncidentSeverity {
    /// Minor incident with no injuries or significant loss
    Low,
    /// Incident requiring a routine response
    Medium,
    /// Incident involving injury or significant loss
    High,
    /// Incident requiring an immediate response
    Critical,
}

impl IncidentSeverity {
    /// Returns all variants of this enum, least severe first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}

/// Incident type taxonomy.
///
/// Displayed with the variant name (`"Theft"`), which is also what shows up
/// in human-readable reasoning strings.
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
#[strum(ascii_case_insensitive)]
pub enum IncidentCategory {
    /// Unlawful taking of unattended property
    Theft,
    /// Taking property by force or threat
    Robbery,
    /// Physical attack on a person
    Assault,
    /// Unlawful entry to commit a theft
    Burglary,
    /// Willful damage of property
    Vandalism,
    /// Theft from a person without force
    Pickpocket,
}

impl IncidentCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Theft,
            Self::Robbery,
            Self::Assault,
            Self::Burglary,
            Self::Vandalism,
            Self::Pickpocket,
        ]
    }
}

/// A single reported incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Stable unique identifier assigned by the data source.
    pub id: String,
    /// Incident type.
    pub category: IncidentCategory,
    /// Human-readable location name (e.g. "Rajpur Road").
    pub location: String,
    /// Where the incident occurred.
    pub coordinate: Coordinate,
    /// Local wall-clock time the incident occurred.
    pub timestamp: NaiveDateTime,
    /// Incident severity.
    pub severity: IncidentSeverity,
    /// Whether the incident has been resolved.
    pub resolved: bool,
}

impl IncidentRecord {
    /// Hour of day (0-23) the incident occurred.
    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}
