//! Incident exports on disk.
//!
//! Two formats are understood, chosen by file extension:
//!
//! * `.json`: an array of [`IncidentRecord`] in their serde form.
//! * `.csv`: a flat table with the header
//!   `id,category,location,lat,lng,timestamp,severity,resolved`, timestamps
//!   formatted as `%Y-%m-%dT%H:%M:%S`.
//!
//! CSV rows that fail to parse are logged and skipped; a broken JSON file is
//! an error.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDateTime;
use patrol_map_geography_models::Coordinate;
use patrol_map_incident_models::{IncidentCategory, IncidentRecord, IncidentSeverity};
use serde::Deserialize;

use crate::SourceError;

/// Timestamp format used in CSV exports.
pub const CSV_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Loads incidents from `path`, picking the parser by extension.
///
/// # Errors
///
/// Returns [`SourceError::UnsupportedFormat`] for anything other than
/// `.json` or `.csv`, or the underlying read/parse error.
pub fn load(path: &Path) -> Result<Vec<IncidentRecord>, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "json" => load_json(path),
        "csv" => load_csv(path),
        _ => Err(SourceError::UnsupportedFormat { extension }),
    }
}

/// Loads a JSON array of incidents.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not a valid
/// incident array.
pub fn load_json(path: &Path) -> Result<Vec<IncidentRecord>, SourceError> {
    let incidents = parse_json(BufReader::new(File::open(path)?))?;
    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        path.display()
    );
    Ok(incidents)
}

/// Loads incidents from a CSV export.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be opened or has no readable
/// header row.
pub fn load_csv(path: &Path) -> Result<Vec<IncidentRecord>, SourceError> {
    let incidents = parse_csv(File::open(path)?)?;
    log::info!(
        "Loaded {} incidents from {}",
        incidents.len(),
        path.display()
    );
    Ok(incidents)
}

/// Parses a JSON array of incidents from any reader.
///
/// # Errors
///
/// Returns [`SourceError::Json`] if the input is not a valid incident array.
pub fn parse_json(reader: impl Read) -> Result<Vec<IncidentRecord>, SourceError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parses CSV incident rows from any reader, skipping malformed rows.
///
/// # Errors
///
/// Returns [`SourceError::Csv`] if the header row cannot be read.
pub fn parse_csv(reader: impl Read) -> Result<Vec<IncidentRecord>, SourceError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader.headers()?;

    let mut incidents = Vec::new();
    let mut skipped = 0_usize;

    for (row, result) in reader.deserialize::<CsvIncident>().enumerate() {
        let parsed = result
            .map_err(|e| e.to_string())
            .and_then(CsvIncident::into_record);

        match parsed {
            Ok(incident) => incidents.push(incident),
            Err(e) => {
                // Row numbers are 1-based and count the header.
                log::warn!("Skipping CSV row {}: {e}", row + 2);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        log::warn!(
            "Skipped {skipped} malformed CSV rows ({} loaded)",
            incidents.len()
        );
    }

    Ok(incidents)
}

/// A raw row from an incident CSV export.
#[derive(Debug, Deserialize)]
struct CsvIncident {
    id: String,
    category: String,
    location: String,
    lat: f64,
    lng: f64,
    timestamp: String,
    severity: String,
    resolved: bool,
}

impl CsvIncident {
    fn into_record(self) -> Result<IncidentRecord, String> {
        let category: IncidentCategory = self
            .category
            .parse()
            .map_err(|_| format!("unknown category '{}'", self.category))?;
        let severity: IncidentSeverity = self
            .severity
            .parse()
            .map_err(|_| format!("unknown severity '{}'", self.severity))?;
        let timestamp = NaiveDateTime::parse_from_str(&self.timestamp, CSV_TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad timestamp '{}': {e}", self.timestamp))?;

        Ok(IncidentRecord {
            id: self.id,
            category,
            location: self.location,
            coordinate: Coordinate::new(self.lat, self.lng),
            timestamp,
            severity,
            resolved: self.resolved,
        })
    }
}
