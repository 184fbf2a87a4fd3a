#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident analytics engine.
//!
//! Turns a snapshot of incident records into hotspot zones, short-horizon
//! forecasts, a risk heatmap, an optimized patrol route and a patrol unit
//! allocation. Every stage is a pure function over its inputs; the only
//! randomness comes from an injected [`random::RandomSource`].

pub mod allocation;
pub mod forecast;
pub mod heatmap;
pub mod hotspots;
pub mod patterns;
pub mod pipeline;
pub mod random;
pub mod routing;

pub use allocation::calculate_patrol_distribution;
pub use forecast::predict_hotspots;
pub use heatmap::generate_risk_heatmap;
pub use hotspots::identify_hotspots;
pub use patterns::{analyze_day_patterns, analyze_time_patterns};
pub use pipeline::run_analysis;
pub use routing::optimize_patrol_route;

use thiserror::Error;

/// Errors that can occur during analytics operations.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A stage that needs at least one hotspot zone was given none.
    #[error("Cannot run {operation}: no hotspot zones")]
    EmptyInput {
        /// The stage that was attempted.
        operation: &'static str,
    },
}

/// Clamps a score to the `0..=100` range.
pub(crate) const fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Stable descending sort by a float key. Equal keys keep input order.
pub(crate) fn sort_desc_by<T>(items: &mut [T], key: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

/// Rounds to the given number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
