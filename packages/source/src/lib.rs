#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident data sources.
//!
//! The analytics pipeline only ever sees a `&[IncidentRecord]`. This crate
//! produces one, either by simulating a month of activity over a gazetteer
//! ([`synthetic`]) or by reading an export from disk ([`file`]).

pub mod file;
pub mod synthetic;

/// Errors that can occur while loading incident data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The file extension does not map to a known format.
    #[error("Unsupported incident file extension: {extension:?} (expected .json or .csv)")]
    UnsupportedFormat {
        /// Extension of the offending file, empty if it had none.
        extension: String,
    },
}
