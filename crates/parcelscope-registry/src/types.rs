//! Typed registry records.
//!
//! These are the shapes the rest of the workspace consumes. Every field
//! the registries may omit, zero out, or garble is an `Option`; a
//! missing quantity is `None`, never a fabricated zero. Conversion from
//! the raw wire rows lives in [`crate::rows`].

use chrono::NaiveDate;
use parcelscope_core::Bbl;
use serde::{Deserialize, Serialize};

/// A canonical parcel record: structural and ownership attributes for
/// one BBL, an immutable snapshot per fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelRecord {
    pub bbl: Bbl,
    pub address: Option<String>,
    /// (latitude, longitude) when the registry has geocoded the lot.
    pub coordinates: Option<(f64, f64)>,
    pub residential_units: u32,
    pub total_units: u32,
    /// `None` when the registry reports 0 (unknown).
    pub year_built: Option<u32>,
    pub building_class: Option<String>,
    pub owner_name: Option<String>,
    pub zoning: Option<String>,
    pub lot_area: Option<f64>,
    pub building_area: Option<f64>,
    pub assessed_land: Option<f64>,
    pub assessed_total: Option<f64>,
    pub exempt_value: Option<f64>,
}

impl ParcelRecord {
    /// The better-populated unit count: total units when known,
    /// otherwise residential units.
    pub fn effective_units(&self) -> u32 {
        if self.total_units > 0 {
            self.total_units
        } else {
            self.residential_units
        }
    }

    /// First character of the building-class code ("D" for "D4").
    pub fn class_category(&self) -> Option<char> {
        self.building_class.as_ref().and_then(|c| c.chars().next())
    }
}

/// A recorded sale: one transaction row from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub bbl: Bbl,
    pub address: Option<String>,
    /// Unit designation; empty for whole-building sales.
    pub unit: String,
    pub price: Option<f64>,
    pub sale_date: Option<NaiveDate>,
    pub building_class: Option<String>,
    /// Market micro-area label as the ledger spells it.
    pub neighborhood: Option<String>,
    pub total_units: u32,
    pub gross_sqft: Option<f64>,
    pub year_built: Option<u32>,
}

impl SaleRecord {
    /// Whether this row records a whole-building transfer.
    pub fn is_whole_building(&self) -> bool {
        self.unit.trim().is_empty()
    }

    /// First character of the building-class code at time of sale.
    pub fn class_category(&self) -> Option<char> {
        self.building_class.as_ref().and_then(|c| c.chars().next())
    }
}

/// One exemption row from the tax-benefit registry, lightly typed.
/// Code/description are kept raw for program-flag scanning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExemptionRow {
    pub bbl: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub tax_year: Option<String>,
    pub value: Option<f64>,
}

/// One abatement row from the tax-benefit registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbatementRow {
    pub bbl: String,
    pub code: Option<String>,
    pub description: Option<String>,
    pub tax_year: Option<String>,
    pub amount: Option<f64>,
}
