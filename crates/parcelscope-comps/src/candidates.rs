//! Candidate discovery and enrichment.
//!
//! Builds the over-fetched candidate set from the sales ledger, excludes
//! the subject's own parcel, joins each survivor with its parcel record,
//! and derives the per-candidate metrics the scorer and aggregator need.
//!
//! Enrichment is tolerant of partial data loss: one candidate's parcel
//! fetch failing degrades that candidate to the sale row's own lesser
//! fields and the batch proceeds. The per-candidate fetches share no
//! mutable state and are issued concurrently; each result merges back at
//! its originating index.

use futures::future::join_all;
use parcelscope_core::areas;
use parcelscope_registry::parcels::{fields as parcel_fields, ParcelRegistryClient};
use parcelscope_registry::sales::{fields as sale_fields, SalesLedgerClient};
use parcelscope_registry::{ParcelRecord, Predicate, SaleRecord};
use serde::{Deserialize, Serialize};

use crate::error::CompsError;
use crate::scoring::{similarity_score, AreaRelation, ScoreProfile};

/// Sales at or below this price are overwhelmingly non-arm's-length
/// transfers ($0 deeds, $10 family conveyances), not market evidence.
pub const NOMINAL_SALE_FLOOR: f64 = 10_000.0;

/// Over-fetch multiplier: room for self-exclusion and score truncation.
const OVERFETCH: u32 = 3;

/// A candidate comparable: a sale joined with the best-available parcel
/// record for its key, plus derived valuation metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateComp {
    pub sale: SaleRecord,
    /// `None` when parcel enrichment for this candidate degraded.
    pub parcel: Option<ParcelRecord>,
    /// Best-available unit count (parcel first, sale as fallback).
    pub total_units: u32,
    /// Best-available year built.
    pub year_built: Option<u32>,
    /// Best-available building area in square feet.
    pub building_area: Option<f64>,
    /// Sale price over unit count; `None` when either is unusable.
    pub price_per_unit: Option<f64>,
    /// Sale price over building area; `None` when either is unusable.
    pub price_per_sqft: Option<f64>,
    /// The candidate area's relationship to the subject area.
    pub area_relation: AreaRelation,
    /// Weighted similarity in [0, 100].
    pub similarity_score: u8,
}

/// Fetch the raw candidate sale set for a subject.
///
/// The filter requires: price above the nominal-sale floor, the
/// subject's borough, a class-category prefix match, whole-building
/// sales only, and an area label substring-matching one of the
/// compatible labels. Fetches 3× the requested count.
pub async fn fetch_candidates(
    sales: &SalesLedgerClient,
    subject: &ParcelRecord,
    compatible_areas: &[String],
    requested: u32,
) -> Result<Vec<SaleRecord>, CompsError> {
    let mut clauses = vec![
        Predicate::Gt(sale_fields::SALE_PRICE.into(), NOMINAL_SALE_FLOOR),
        Predicate::EqText(
            sale_fields::BOROUGH.into(),
            subject.bbl.borough().digit().to_string(),
        ),
        Predicate::Or(vec![
            Predicate::EqText(sale_fields::APARTMENT_NUMBER.into(), String::new()),
            Predicate::IsNull(sale_fields::APARTMENT_NUMBER.into()),
        ]),
    ];

    if let Some(category) = subject.class_category() {
        clauses.push(Predicate::StartsWith(
            sale_fields::BUILDING_CLASS.into(),
            category.to_string(),
        ));
    }

    let area_clauses: Vec<Predicate> = compatible_areas
        .iter()
        .map(|label| Predicate::Contains(sale_fields::NEIGHBORHOOD.into(), label.clone()))
        .collect();
    if !area_clauses.is_empty() {
        clauses.push(Predicate::Or(area_clauses));
    }

    let found = sales
        .query(&Predicate::And(clauses), requested * OVERFETCH)
        .await?;

    // A candidate set never includes the subject's own parcel.
    Ok(found
        .into_iter()
        .filter(|sale| sale.bbl != subject.bbl)
        .collect())
}

/// Join each candidate sale with its parcel record and derive metrics.
///
/// Returns the enriched candidates (in input order) and the number whose
/// enrichment degraded.
pub async fn enrich_candidates(
    parcels: &ParcelRegistryClient,
    subject: &ParcelRecord,
    subject_area: &str,
    sales: Vec<SaleRecord>,
) -> (Vec<CandidateComp>, usize) {
    let subject_profile = ScoreProfile {
        building_class: subject.building_class.clone(),
        residential_units: subject.residential_units,
        total_units: subject.total_units,
        year_built: subject.year_built,
        building_area: subject.building_area,
    };

    let fetches = sales.iter().map(|sale| fetch_parcel(parcels, sale));
    let parcel_results = join_all(fetches).await;

    let mut degraded = 0usize;
    let comps = sales
        .into_iter()
        .zip(parcel_results)
        .map(|(sale, parcel)| {
            if parcel.is_none() {
                degraded += 1;
            }
            build_comp(&subject_profile, subject_area, sale, parcel)
        })
        .collect();
    (comps, degraded)
}

/// Fetch the parcel record for one candidate. Failure is per-item: a
/// miss or an upstream error degrades this candidate only.
async fn fetch_parcel(parcels: &ParcelRegistryClient, sale: &SaleRecord) -> Option<ParcelRecord> {
    let filter = Predicate::And(vec![
        Predicate::EqText(
            parcel_fields::BOROUGH.into(),
            sale.bbl.borough().digit().to_string(),
        ),
        Predicate::EqNumber(parcel_fields::BLOCK.into(), f64::from(sale.bbl.block())),
        Predicate::EqNumber(parcel_fields::LOT.into(), f64::from(sale.bbl.lot())),
    ]);
    match parcels.query(&filter, 1).await {
        Ok(records) => records.into_iter().next(),
        Err(e) => {
            tracing::warn!(bbl = %sale.bbl, error = %e, "parcel enrichment degraded for candidate");
            None
        }
    }
}

fn build_comp(
    subject: &ScoreProfile,
    subject_area: &str,
    sale: SaleRecord,
    parcel: Option<ParcelRecord>,
) -> CandidateComp {
    // Best-available attributes: parcel first, the sale row's own
    // lesser fields as the degraded fallback.
    let total_units = parcel
        .as_ref()
        .map(ParcelRecord::effective_units)
        .filter(|u| *u > 0)
        .unwrap_or(sale.total_units);
    let year_built = parcel.as_ref().and_then(|p| p.year_built).or(sale.year_built);
    let building_area = parcel
        .as_ref()
        .and_then(|p| p.building_area)
        .or(sale.gross_sqft);

    let price_per_unit = match (sale.price, total_units) {
        (Some(price), units) if units > 0 => Some(price / f64::from(units)),
        _ => None,
    };
    let price_per_sqft = match (sale.price, building_area) {
        (Some(price), Some(area)) if area > 0.0 => Some(price / area),
        _ => None,
    };

    let area_relation = relate_areas(subject_area, sale.neighborhood.as_deref());

    let candidate_profile = ScoreProfile {
        building_class: parcel
            .as_ref()
            .and_then(|p| p.building_class.clone())
            .or_else(|| sale.building_class.clone()),
        residential_units: parcel.as_ref().map(|p| p.residential_units).unwrap_or(0),
        total_units,
        year_built,
        building_area,
    };
    let similarity_score = similarity_score(subject, &candidate_profile, area_relation);

    CandidateComp {
        sale,
        parcel,
        total_units,
        year_built,
        building_area,
        price_per_unit,
        price_per_sqft,
        area_relation,
        similarity_score,
    }
}

fn relate_areas(subject_area: &str, candidate_area: Option<&str>) -> AreaRelation {
    let Some(candidate) = candidate_area else {
        return AreaRelation::Other;
    };
    if subject_area.eq_ignore_ascii_case(candidate.trim()) {
        AreaRelation::Same
    } else if areas::are_adjacent(subject_area, candidate) {
        AreaRelation::Adjacent
    } else {
        AreaRelation::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelscope_core::{Bbl, Borough};

    fn sale(price: Option<f64>, units: u32, sqft: Option<f64>, area: &str) -> SaleRecord {
        SaleRecord {
            bbl: Bbl::new(Borough::Manhattan, 400, 1).unwrap(),
            address: None,
            unit: String::new(),
            price,
            sale_date: None,
            building_class: Some("C1".into()),
            neighborhood: Some(area.into()),
            total_units: units,
            gross_sqft: sqft,
            year_built: Some(1925),
        }
    }

    fn subject_profile() -> ScoreProfile {
        ScoreProfile {
            building_class: Some("C1".into()),
            residential_units: 8,
            total_units: 8,
            year_built: Some(1920),
            building_area: Some(8_000.0),
        }
    }

    #[test]
    fn degraded_comp_falls_back_to_sale_fields() {
        let comp = build_comp(
            &subject_profile(),
            "EAST VILLAGE",
            sale(Some(2_000_000.0), 8, Some(8_000.0), "EAST VILLAGE"),
            None,
        );
        assert!(comp.parcel.is_none());
        assert_eq!(comp.total_units, 8);
        assert_eq!(comp.year_built, Some(1925));
        assert_eq!(comp.price_per_unit, Some(250_000.0));
        assert_eq!(comp.price_per_sqft, Some(250.0));
    }

    #[test]
    fn rates_are_none_when_divisors_are_unusable() {
        let comp = build_comp(
            &subject_profile(),
            "EAST VILLAGE",
            sale(Some(2_000_000.0), 0, None, "EAST VILLAGE"),
            None,
        );
        assert_eq!(comp.price_per_unit, None);
        assert_eq!(comp.price_per_sqft, None);
    }

    #[test]
    fn area_relation_distinguishes_same_adjacent_other() {
        assert_eq!(
            relate_areas("EAST VILLAGE", Some("EAST VILLAGE")),
            AreaRelation::Same
        );
        assert_eq!(
            relate_areas("EAST VILLAGE", Some("LOWER EAST SIDE")),
            AreaRelation::Adjacent
        );
        assert_eq!(relate_areas("EAST VILLAGE", Some("SOHO")), AreaRelation::Other);
        assert_eq!(relate_areas("EAST VILLAGE", None), AreaRelation::Other);
    }

    #[test]
    fn enriched_comp_prefers_parcel_attributes() {
        let parcel = ParcelRecord {
            bbl: Bbl::new(Borough::Manhattan, 400, 1).unwrap(),
            address: None,
            coordinates: None,
            residential_units: 10,
            total_units: 12,
            year_built: Some(1919),
            building_class: Some("C1".into()),
            owner_name: None,
            zoning: None,
            lot_area: None,
            building_area: Some(9_000.0),
            assessed_land: None,
            assessed_total: None,
            exempt_value: None,
        };
        let comp = build_comp(
            &subject_profile(),
            "EAST VILLAGE",
            sale(Some(2_400_000.0), 8, Some(8_000.0), "EAST VILLAGE"),
            Some(parcel),
        );
        assert_eq!(comp.total_units, 12);
        assert_eq!(comp.year_built, Some(1919));
        assert_eq!(comp.building_area, Some(9_000.0));
        assert_eq!(comp.price_per_unit, Some(200_000.0));
    }
}
