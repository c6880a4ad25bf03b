//! # parcelscope-comps — The analytic core
//!
//! Turns registry rows into signals: resolves a subject property, infers
//! its market micro-area, discovers and scores comparable sales,
//! aggregates tax benefits, and infers rent-regulation likelihood.
//!
//! ## Architecture
//!
//! [`CompsEngine`] composes the registry clients and exposes four
//! operations:
//!
//! | Operation | Pipeline |
//! |-----------|----------|
//! | [`CompsEngine::resolve_property`] | resolve → infer area → (optional) benefits + regulation |
//! | [`CompsEngine::search_sales`] | predicate build → ledger query |
//! | [`CompsEngine::find_comparables`] | resolve → infer area → candidates → enrich → score → rank |
//! | [`CompsEngine::tax_benefits`] | concurrent benefit queries → aggregate |
//!
//! Failure discipline: subject resolution and the candidate-set query
//! are the only fatal remote calls. Every secondary fetch degrades into
//! explicit `Option` fields and a degradation counter, visible in the
//! output, never swallowed.

pub mod benefits;
pub mod candidates;
pub mod error;
pub mod neighborhood;
pub mod ranking;
pub mod regulation;
pub mod resolver;
pub mod scoring;

pub use benefits::TaxBenefitSummary;
pub use candidates::CandidateComp;
pub use error::CompsError;
pub use ranking::CompsStats;
pub use regulation::{Confidence, RentRegulationAssessment};
pub use scoring::AreaRelation;

use parcelscope_core::{address, areas, Bbl, Borough};
use parcelscope_registry::sales::fields as sale_fields;
use parcelscope_registry::{ParcelRecord, Predicate, RegistryClient, SaleRecord};
use serde::{Deserialize, Serialize};

/// Default and maximum row counts for sales searches.
const DEFAULT_SALES_LIMIT: u32 = 25;
const MAX_SALES_LIMIT: u32 = 200;

/// A property lookup request.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyQuery {
    pub address: String,
    /// Borough hint; validated before any remote query.
    pub borough: Option<String>,
    /// Also run benefits aggregation and regulation inference.
    pub assess_regulation: bool,
}

/// A property lookup result.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyReport {
    pub parcel: ParcelRecord,
    /// Inferred market micro-area; `None` when the cascade exhausted
    /// (non-fatal for a property lookup).
    pub neighborhood: Option<String>,
    pub regulation: Option<RentRegulationAssessment>,
}

/// A sales-ledger search request. Provide an address or a BBL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesQuery {
    pub address: Option<String>,
    /// Packed 10-digit BBL.
    pub bbl: Option<String>,
    pub borough: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: Option<u32>,
}

/// A comparable-discovery request.
#[derive(Debug, Clone, Deserialize)]
pub struct ComparablesQuery {
    pub address: String,
    pub borough: Option<String>,
    /// Result count; capped at [`ranking::MAX_COMPS`], default
    /// [`ranking::DEFAULT_COMPS`].
    pub count: Option<usize>,
    /// Widen the search to adjacent market areas (default true).
    pub include_adjacent: bool,
}

impl ComparablesQuery {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            borough: None,
            count: None,
            include_adjacent: true,
        }
    }
}

/// A comparable-discovery result.
#[derive(Debug, Clone, Serialize)]
pub struct ComparablesReport {
    pub subject: ParcelRecord,
    /// The subject's inferred market micro-area.
    pub neighborhood: String,
    /// Ranked comparables, best first.
    pub comps: Vec<CandidateComp>,
    pub stats: CompsStats,
    /// How many candidates proceeded with degraded (sale-only)
    /// enrichment.
    pub degraded_enrichments: usize,
}

/// The analytic engine. Stateless between calls: every operation is
/// computed fresh from the current registry responses.
#[derive(Debug, Clone)]
pub struct CompsEngine {
    registry: RegistryClient,
}

impl CompsEngine {
    pub fn new(registry: RegistryClient) -> Self {
        Self { registry }
    }

    /// Resolve a subject property, infer its market area, and optionally
    /// assess rent-regulation likelihood.
    pub async fn resolve_property(&self, query: &PropertyQuery) -> Result<PropertyReport, CompsError> {
        let borough = parse_borough_hint(query.borough.as_deref())?;
        let parcel = resolver::resolve_parcel(self.registry.parcels(), &query.address, borough).await?;

        // Secondary enrichment: a missing label or a ledger outage
        // degrades a lookup, it does not fail it.
        let neighborhood = match neighborhood::infer_neighborhood(self.registry.sales(), &parcel.bbl).await {
            Ok(label) => Some(label),
            Err(CompsError::NeighborhoodUndetermined { .. }) => None,
            Err(e) => {
                tracing::warn!(bbl = %parcel.bbl, error = %e, "market-area inference degraded");
                None
            }
        };

        let regulation = if query.assess_regulation {
            let summary = benefits::aggregate_benefits(self.registry.benefits(), &parcel.bbl).await;
            Some(regulation::assess_regulation(&regulation::RegulationInput {
                year_built: parcel.year_built,
                units: parcel.effective_units(),
                building_class: parcel.building_class.clone(),
                owner_name: parcel.owner_name.clone(),
                has_new_construction_exemption: summary.has_421a,
                has_rehab_abatement: summary.has_j51,
            }))
        } else {
            None
        };

        Ok(PropertyReport {
            parcel,
            neighborhood,
            regulation,
        })
    }

    /// Search the sales ledger by address or parcel key.
    pub async fn search_sales(&self, query: &SalesQuery) -> Result<Vec<SaleRecord>, CompsError> {
        let borough = parse_borough_hint(query.borough.as_deref())?;

        let mut clauses = match (&query.bbl, &query.address) {
            (Some(packed), _) => {
                let bbl = Bbl::from_padded(packed)?;
                vec![
                    Predicate::EqText(sale_fields::BOROUGH.into(), bbl.borough().digit().to_string()),
                    Predicate::EqNumber(sale_fields::BLOCK.into(), f64::from(bbl.block())),
                    Predicate::EqNumber(sale_fields::LOT.into(), f64::from(bbl.lot())),
                ]
            }
            (None, Some(raw)) => {
                let normalized = address::normalize(raw);
                let mut clauses = vec![Predicate::StartsWith(sale_fields::ADDRESS.into(), normalized)];
                if let Some(b) = borough {
                    clauses.push(Predicate::EqText(
                        sale_fields::BOROUGH.into(),
                        b.digit().to_string(),
                    ));
                }
                clauses
            }
            (None, None) => return Err(CompsError::MissingSubject),
        };

        if let Some(min) = query.min_price {
            clauses.push(Predicate::Ge(sale_fields::SALE_PRICE.into(), min));
        }
        if let Some(max) = query.max_price {
            clauses.push(Predicate::Le(sale_fields::SALE_PRICE.into(), max));
        }

        let limit = query.limit.unwrap_or(DEFAULT_SALES_LIMIT).min(MAX_SALES_LIMIT);
        Ok(self
            .registry
            .sales()
            .query(&Predicate::And(clauses), limit)
            .await?)
    }

    /// Discover, score, and rank comparable sales for a subject.
    pub async fn find_comparables(
        &self,
        query: &ComparablesQuery,
    ) -> Result<ComparablesReport, CompsError> {
        let borough = parse_borough_hint(query.borough.as_deref())?;
        let subject = resolver::resolve_parcel(self.registry.parcels(), &query.address, borough).await?;

        // Comparable discovery refuses to guess the market area.
        let neighborhood = neighborhood::infer_neighborhood(self.registry.sales(), &subject.bbl).await?;

        let compatible = areas::compatible_areas(&neighborhood, query.include_adjacent);
        let requested = query
            .count
            .unwrap_or(ranking::DEFAULT_COMPS)
            .min(ranking::MAX_COMPS);

        let candidates = candidates::fetch_candidates(
            self.registry.sales(),
            &subject,
            &compatible,
            requested as u32,
        )
        .await?;

        let (comps, degraded_enrichments) = candidates::enrich_candidates(
            self.registry.parcels(),
            &subject,
            &neighborhood,
            candidates,
        )
        .await;

        let (comps, stats) = ranking::rank_and_aggregate(comps, Some(requested), &subject);

        Ok(ComparablesReport {
            subject,
            neighborhood,
            comps,
            stats,
            degraded_enrichments,
        })
    }

    /// Aggregate tax benefits for a packed 10-digit BBL.
    pub async fn tax_benefits(&self, packed_bbl: &str) -> Result<TaxBenefitSummary, CompsError> {
        let bbl = Bbl::from_padded(packed_bbl)?;
        Ok(benefits::aggregate_benefits(self.registry.benefits(), &bbl).await)
    }
}

fn parse_borough_hint(token: Option<&str>) -> Result<Option<Borough>, CompsError> {
    token.map(Borough::parse).transpose().map_err(CompsError::from)
}
