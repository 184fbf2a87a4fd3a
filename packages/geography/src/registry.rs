//! Gazetteer registry — named-location tables from embedded TOML configs.
//!
//! Each `.toml` file in `packages/geography/gazetteers/` is baked into the
//! binary at compile time via [`include_str!`]. Callers that want a custom
//! geography load one from disk with [`load_gazetteer`] instead.

use std::path::Path;

use patrol_map_geography_models::Gazetteer;

use crate::GeographyError;

/// Identifier of the gazetteer used when none is specified.
pub const DEFAULT_GAZETTEER_ID: &str = "dehradun";

/// Identifier of the patrol-beat table synthetic incidents are drawn from.
pub const BEATS_GAZETTEER_ID: &str = "dehradun_beats";

/// TOML configs embedded at compile time.
const GAZETTEER_TOMLS: &[(&str, &str)] = &[
    ("dehradun", include_str!("../gazetteers/dehradun.toml")),
    (
        "dehradun_beats",
        include_str!("../gazetteers/dehradun_beats.toml"),
    ),
];

/// Parses a gazetteer from a TOML string.
///
/// # Errors
///
/// Returns [`GeographyError::Toml`] if the string is not a valid gazetteer.
pub fn parse_gazetteer_toml(toml_str: &str) -> Result<Gazetteer, GeographyError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Loads a gazetteer from a TOML file on disk.
///
/// # Errors
///
/// Returns [`GeographyError`] if the file cannot be read or parsed.
pub fn load_gazetteer(path: &Path) -> Result<Gazetteer, GeographyError> {
    let contents = std::fs::read_to_string(path)?;
    let gazetteer = parse_gazetteer_toml(&contents)?;
    log::info!(
        "Loaded gazetteer '{}' with {} locations from {}",
        gazetteer.id,
        gazetteer.len(),
        path.display()
    );
    Ok(gazetteer)
}

/// Returns all embedded gazetteers.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_gazetteers() -> Vec<Gazetteer> {
    GAZETTEER_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            parse_gazetteer_toml(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse gazetteer '{name}': {e}"))
        })
        .collect()
}

/// Returns the embedded gazetteer with the given identifier.
#[must_use]
pub fn gazetteer(id: &str) -> Option<Gazetteer> {
    all_gazetteers().into_iter().find(|g| g.id == id)
}

/// Returns the default embedded gazetteer.
///
/// # Panics
///
/// Panics if [`DEFAULT_GAZETTEER_ID`] is not among the embedded configs.
#[must_use]
pub fn default_gazetteer() -> Gazetteer {
    gazetteer(DEFAULT_GAZETTEER_ID)
        .unwrap_or_else(|| panic!("Missing embedded gazetteer '{DEFAULT_GAZETTEER_ID}'"))
}
