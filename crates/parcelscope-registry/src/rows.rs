//! Raw wire rows and lenient field parsing.
//!
//! The row API serializes almost everything as strings: prices arrive
//! as `"1250000"`, years as `"1920"`, and the parcel registry spells an
//! unknown year as `"0"`. Wire structs here accept whatever arrives
//! (`#[serde(default)]` everywhere, unknown fields ignored) and the
//! `into_record` conversions parse leniently: absent or unparsable
//! means `None`, never zero.

use chrono::NaiveDate;
use parcelscope_core::{Bbl, Borough};
use serde::Deserialize;

use crate::types::{AbatementRow, ExemptionRow, ParcelRecord, SaleRecord};

/// Parcel registry wire row.
#[derive(Debug, Clone, Deserialize)]
pub struct ParcelRow {
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub unitsres: Option<String>,
    #[serde(default)]
    pub unitstotal: Option<String>,
    #[serde(default)]
    pub yearbuilt: Option<String>,
    #[serde(default)]
    pub bldgclass: Option<String>,
    #[serde(default)]
    pub ownername: Option<String>,
    #[serde(default)]
    pub zonedist1: Option<String>,
    #[serde(default)]
    pub lotarea: Option<String>,
    #[serde(default)]
    pub bldgarea: Option<String>,
    #[serde(default)]
    pub assessland: Option<String>,
    #[serde(default)]
    pub assesstot: Option<String>,
    #[serde(default)]
    pub exempttot: Option<String>,
}

impl ParcelRow {
    /// Convert to a typed record. Returns `None` when the row's key is
    /// unusable (missing/unknown borough); callers drop such rows.
    pub fn into_record(self) -> Option<ParcelRecord> {
        let borough = Borough::parse(self.borough.as_deref()?).ok()?;
        let bbl = Bbl::from_components(
            borough,
            self.block.as_deref().unwrap_or(""),
            self.lot.as_deref().unwrap_or(""),
        )
        .ok()?;

        let coordinates = match (parse_f64(&self.latitude), parse_f64(&self.longitude)) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };

        Some(ParcelRecord {
            bbl,
            address: nonempty(self.address),
            coordinates,
            residential_units: parse_u32(&self.unitsres).unwrap_or(0),
            total_units: parse_u32(&self.unitstotal).unwrap_or(0),
            year_built: parse_year(&self.yearbuilt),
            building_class: nonempty(self.bldgclass),
            owner_name: nonempty(self.ownername),
            zoning: nonempty(self.zonedist1),
            lot_area: parse_positive_f64(&self.lotarea),
            building_area: parse_positive_f64(&self.bldgarea),
            assessed_land: parse_f64(&self.assessland),
            assessed_total: parse_f64(&self.assesstot),
            exempt_value: parse_f64(&self.exempttot),
        })
    }
}

/// Sales ledger wire row.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleRow {
    #[serde(default)]
    pub borough: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub lot: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub apartment_number: Option<String>,
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub sale_date: Option<String>,
    #[serde(default)]
    pub building_class_at_time_of_sale: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub total_units: Option<String>,
    #[serde(default)]
    pub gross_square_feet: Option<String>,
    #[serde(default)]
    pub year_built: Option<String>,
}

impl SaleRow {
    /// Convert to a typed record. Returns `None` when the key is unusable.
    pub fn into_record(self) -> Option<SaleRecord> {
        let borough = Borough::parse(self.borough.as_deref()?).ok()?;
        let bbl = Bbl::from_components(
            borough,
            self.block.as_deref().unwrap_or(""),
            self.lot.as_deref().unwrap_or(""),
        )
        .ok()?;

        Some(SaleRecord {
            bbl,
            address: nonempty(self.address),
            unit: self.apartment_number.unwrap_or_default().trim().to_string(),
            price: parse_f64(&self.sale_price),
            sale_date: parse_date(&self.sale_date),
            building_class: nonempty(self.building_class_at_time_of_sale),
            neighborhood: nonempty(self.neighborhood).map(|n| n.trim().to_string()),
            total_units: parse_u32(&self.total_units).unwrap_or(0),
            gross_sqft: parse_positive_f64(&self.gross_square_feet),
            year_built: parse_year(&self.year_built),
        })
    }
}

/// Exemption registry wire row.
#[derive(Debug, Clone, Deserialize)]
pub struct ExemptionWireRow {
    #[serde(default)]
    pub parid: Option<String>,
    #[serde(default, alias = "exmp_code")]
    pub exempt_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, alias = "exempt_val")]
    pub exempt_value: Option<String>,
}

impl ExemptionWireRow {
    pub fn into_row(self) -> ExemptionRow {
        ExemptionRow {
            bbl: self.parid.unwrap_or_default(),
            code: nonempty(self.exempt_code),
            description: nonempty(self.description),
            tax_year: nonempty(self.year),
            value: parse_f64(&self.exempt_value),
        }
    }
}

/// Abatement registry wire row.
#[derive(Debug, Clone, Deserialize)]
pub struct AbatementWireRow {
    #[serde(default)]
    pub parid: Option<String>,
    #[serde(default, alias = "abate_code")]
    pub abatement_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, alias = "appliedabt")]
    pub applied_amount: Option<String>,
}

impl AbatementWireRow {
    pub fn into_row(self) -> AbatementRow {
        AbatementRow {
            bbl: self.parid.unwrap_or_default(),
            code: nonempty(self.abatement_code),
            description: nonempty(self.description),
            tax_year: nonempty(self.year),
            amount: parse_f64(&self.applied_amount),
        }
    }
}

// -- Lenient field parsers ---------------------------------------------------

fn nonempty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

/// Parse a numeric string, tolerating currency formatting ("$1,250,000").
pub(crate) fn parse_f64(s: &Option<String>) -> Option<f64> {
    let cleaned: String = s
        .as_deref()?
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned.parse().ok()
}

/// Like [`parse_f64`] but treats zero as absent, used for quantities
/// that serve as rate divisors, where 0 means "not recorded".
pub(crate) fn parse_positive_f64(s: &Option<String>) -> Option<f64> {
    parse_f64(s).filter(|v| *v > 0.0)
}

pub(crate) fn parse_u32(s: &Option<String>) -> Option<u32> {
    parse_f64(s).map(|v| v.max(0.0) as u32)
}

/// Year 0 is the registries' "unknown" sentinel.
pub(crate) fn parse_year(s: &Option<String>) -> Option<u32> {
    parse_u32(s).filter(|y| *y > 0)
}

/// Dates arrive as `YYYY-MM-DD` or as an ISO timestamp; take the date part.
pub(crate) fn parse_date(s: &Option<String>) -> Option<NaiveDate> {
    let raw = s.as_deref()?;
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn parse_f64_tolerates_currency_formatting() {
        assert_eq!(parse_f64(&some("$1,250,000")), Some(1_250_000.0));
        assert_eq!(parse_f64(&some("glitch")), None);
        assert_eq!(parse_f64(&None), None);
    }

    #[test]
    fn parse_positive_treats_zero_as_absent() {
        assert_eq!(parse_positive_f64(&some("0")), None);
        assert_eq!(parse_positive_f64(&some("100")), Some(100.0));
    }

    #[test]
    fn parse_year_treats_zero_as_unknown() {
        assert_eq!(parse_year(&some("0")), None);
        assert_eq!(parse_year(&some("1920")), Some(1920));
    }

    #[test]
    fn parse_date_accepts_iso_timestamp() {
        let d = parse_date(&some("2024-03-15T00:00:00.000")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(parse_date(&some("2024-03-15")), Some(d));
        assert_eq!(parse_date(&some("soon")), None);
    }

    #[test]
    fn parcel_row_with_unknown_borough_is_dropped() {
        let row = ParcelRow {
            borough: some("9"),
            block: some("373"),
            lot: some("21"),
            address: None,
            latitude: None,
            longitude: None,
            unitsres: None,
            unitstotal: None,
            yearbuilt: None,
            bldgclass: None,
            ownername: None,
            zonedist1: None,
            lotarea: None,
            bldgarea: None,
            assessland: None,
            assesstot: None,
            exempttot: None,
        };
        assert!(row.into_record().is_none());
    }

    #[test]
    fn parcel_row_parses_key_and_sentinels() {
        let row = ParcelRow {
            borough: some("1"),
            block: some("00373"),
            lot: some("0021"),
            address: some("522 EAST 5 STREET"),
            latitude: some("40.7238"),
            longitude: some("-73.9845"),
            unitsres: some("10"),
            unitstotal: some("11"),
            yearbuilt: some("0"),
            bldgclass: some("C1"),
            ownername: some("522 E 5 LLC"),
            zonedist1: some("R7B"),
            lotarea: some("2500"),
            bldgarea: some("0"),
            assessland: some("150000"),
            assesstot: some("900000"),
            exempttot: some("0"),
        };
        let rec = row.into_record().unwrap();
        assert_eq!(rec.bbl.block(), 373);
        assert_eq!(rec.bbl.lot(), 21);
        assert_eq!(rec.year_built, None);
        assert_eq!(rec.building_area, None);
        assert_eq!(rec.exempt_value, Some(0.0));
        assert_eq!(rec.coordinates, Some((40.7238, -73.9845)));
    }

    #[test]
    fn sale_row_trims_unit_designation() {
        let row = SaleRow {
            borough: some("1"),
            block: some("373"),
            lot: some("21"),
            address: some("522 EAST 5TH STREET"),
            apartment_number: some("  "),
            sale_price: some("3500000"),
            sale_date: some("2024-03-15T00:00:00.000"),
            building_class_at_time_of_sale: some("C1"),
            neighborhood: some("EAST VILLAGE          "),
            total_units: some("10"),
            gross_square_feet: some("8000"),
            year_built: some("1920"),
        };
        let rec = row.into_record().unwrap();
        assert!(rec.is_whole_building());
        assert_eq!(rec.neighborhood.as_deref(), Some("EAST VILLAGE"));
        assert_eq!(rec.price, Some(3_500_000.0));
    }
}
