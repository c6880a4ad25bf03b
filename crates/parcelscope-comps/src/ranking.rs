//! Ranking and aggregate statistics.
//!
//! Sorts candidates by descending similarity (stable: equal scores keep
//! their enumeration order), truncates to the requested count, and
//! derives the implied-valuation statistics. Every mean and implied
//! value is `None` rather than zero when no usable inputs exist.

use parcelscope_registry::ParcelRecord;
use serde::{Deserialize, Serialize};

use crate::candidates::CandidateComp;

/// Hard cap on returned comparables, whatever the caller asks for.
pub const MAX_COMPS: usize = 50;

/// Default result count when the caller does not specify one.
pub const DEFAULT_COMPS: usize = 10;

/// Aggregate valuation statistics over the truncated comparable set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompsStats {
    /// Arithmetic mean of the non-null per-unit rates.
    pub avg_price_per_unit: Option<f64>,
    /// Arithmetic mean of the non-null per-sqft rates.
    pub avg_price_per_sqft: Option<f64>,
    /// Subject total units × mean per-unit rate.
    pub implied_value_by_units: Option<f64>,
    /// Subject building area × mean per-sqft rate.
    pub implied_value_by_sqft: Option<f64>,
}

/// Sort, truncate, and aggregate.
pub fn rank_and_aggregate(
    mut comps: Vec<CandidateComp>,
    requested: Option<usize>,
    subject: &ParcelRecord,
) -> (Vec<CandidateComp>, CompsStats) {
    // sort_by is stable: equal scores retain their original order.
    comps.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));
    comps.truncate(requested.unwrap_or(DEFAULT_COMPS).min(MAX_COMPS));

    let avg_price_per_unit = mean(comps.iter().filter_map(|c| c.price_per_unit));
    let avg_price_per_sqft = mean(comps.iter().filter_map(|c| c.price_per_sqft));

    let subject_units = subject.effective_units();
    let implied_value_by_units = match (avg_price_per_unit, subject_units) {
        (Some(rate), units) if units > 0 => Some(rate * f64::from(units)),
        _ => None,
    };
    let implied_value_by_sqft = match (avg_price_per_sqft, subject.building_area) {
        (Some(rate), Some(area)) if area > 0.0 => Some(rate * area),
        _ => None,
    };

    (
        comps,
        CompsStats {
            avg_price_per_unit,
            avg_price_per_sqft,
            implied_value_by_units,
            implied_value_by_sqft,
        },
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        sum += v;
        n += 1;
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}
