//! Tax-benefit aggregation.
//!
//! Normalizes exemption and abatement rows into program flags and
//! totals for one parcel. The two registry queries run concurrently and
//! each degrades independently to an empty list on failure; a benefit
//! lookup never fails an operation.

use parcelscope_core::Bbl;
use parcelscope_registry::benefits::TaxBenefitClient;
use parcelscope_registry::{AbatementRow, ExemptionRow};
use serde::{Deserialize, Serialize};

/// Program tokens scanned for, two spelling variants each (the
/// registries are inconsistent about the hyphen).
const TOKENS_421A: [&str; 2] = ["421-a", "421a"];
const TOKENS_J51: [&str; 2] = ["j-51", "j51"];
const TOKENS_421G: [&str; 2] = ["421-g", "421g"];
const TOKENS_420C: [&str; 2] = ["420-c", "420c"];

/// Per-parcel aggregate of tax-benefit rows.
///
/// Totals are summed across every returned row regardless of tax year.
/// This is an inherited simplification, kept deliberately: multi-year
/// history overstates the live benefit but never misses one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBenefitSummary {
    /// The packed 10-digit parcel key the registries were queried with.
    pub bbl: String,
    pub exemptions: Vec<ExemptionRow>,
    pub abatements: Vec<AbatementRow>,
    /// New-construction tax exemption program.
    pub has_421a: bool,
    /// Rehabilitation tax abatement program.
    pub has_j51: bool,
    /// Lower-Manhattan conversion exemption program.
    pub has_421g: bool,
    /// Affordable-housing exemption program.
    pub has_420c: bool,
    pub total_exemption_value: f64,
    pub total_abatement_amount: f64,
}

/// Query both benefit registries and aggregate.
///
/// Either query failing degrades to an empty list for that source only;
/// the failure is logged and never propagated upward.
pub async fn aggregate_benefits(client: &TaxBenefitClient, bbl: &Bbl) -> TaxBenefitSummary {
    let (exemptions, abatements) =
        tokio::join!(client.query_exemptions(bbl), client.query_abatements(bbl));

    let exemptions = exemptions.unwrap_or_else(|e| {
        tracing::warn!(bbl = %bbl.padded(), error = %e, "exemption registry unavailable, proceeding without");
        Vec::new()
    });
    let abatements = abatements.unwrap_or_else(|e| {
        tracing::warn!(bbl = %bbl.padded(), error = %e, "abatement registry unavailable, proceeding without");
        Vec::new()
    });

    summarize(bbl, exemptions, abatements)
}

/// Pure aggregation over already-fetched rows.
pub(crate) fn summarize(
    bbl: &Bbl,
    exemptions: Vec<ExemptionRow>,
    abatements: Vec<AbatementRow>,
) -> TaxBenefitSummary {
    // One lowercase haystack over every code and description field from
    // both sources; program detection is a substring scan.
    let mut haystack = String::new();
    for row in &exemptions {
        push_fields(&mut haystack, &row.code, &row.description);
    }
    for row in &abatements {
        push_fields(&mut haystack, &row.code, &row.description);
    }

    let total_exemption_value: f64 = exemptions.iter().filter_map(|r| r.value).sum();
    let total_abatement_amount: f64 = abatements.iter().filter_map(|r| r.amount).sum();

    TaxBenefitSummary {
        bbl: bbl.padded(),
        has_421a: contains_any(&haystack, &TOKENS_421A),
        has_j51: contains_any(&haystack, &TOKENS_J51),
        has_421g: contains_any(&haystack, &TOKENS_421G),
        has_420c: contains_any(&haystack, &TOKENS_420C),
        exemptions,
        abatements,
        total_exemption_value,
        total_abatement_amount,
    }
}

fn push_fields(haystack: &mut String, code: &Option<String>, description: &Option<String>) {
    for field in [code, description].into_iter().flatten() {
        haystack.push_str(&field.to_ascii_lowercase());
        haystack.push(' ');
    }
}

fn contains_any(haystack: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|t| haystack.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcelscope_core::Borough;

    fn bbl() -> Bbl {
        Bbl::new(Borough::Manhattan, 373, 21).unwrap()
    }

    fn exemption(code: &str, desc: &str, value: Option<f64>) -> ExemptionRow {
        ExemptionRow {
            bbl: bbl().padded(),
            code: Some(code.into()),
            description: Some(desc.into()),
            tax_year: Some("2024".into()),
            value,
        }
    }

    fn abatement(code: &str, desc: &str, amount: Option<f64>) -> AbatementRow {
        AbatementRow {
            bbl: bbl().padded(),
            code: Some(code.into()),
            description: Some(desc.into()),
            tax_year: Some("2024".into()),
            amount,
        }
    }

    #[test]
    fn detects_programs_in_either_spelling() {
        let s = summarize(
            &bbl(),
            vec![exemption("5110", "421A NEW CONSTRUCTION", Some(10_000.0))],
            vec![abatement("J51", "J-51 ALTERATION", Some(2_500.0))],
        );
        assert!(s.has_421a);
        assert!(s.has_j51);
        assert!(!s.has_421g);
        assert!(!s.has_420c);
    }

    #[test]
    fn detection_scans_descriptions_case_insensitively() {
        let s = summarize(
            &bbl(),
            vec![exemption("XX", "Lower Manhattan 421-G conversion", None)],
            vec![],
        );
        assert!(s.has_421g);
    }

    #[test]
    fn totals_sum_across_all_years() {
        let s = summarize(
            &bbl(),
            vec![
                exemption("5110", "421-a", Some(10_000.0)),
                exemption("5110", "421-a", Some(12_000.0)),
            ],
            vec![abatement("J51", "J-51", Some(2_500.0))],
        );
        assert_eq!(s.total_exemption_value, 22_000.0);
        assert_eq!(s.total_abatement_amount, 2_500.0);
    }

    #[test]
    fn rows_without_amounts_contribute_nothing() {
        let s = summarize(&bbl(), vec![exemption("X", "Y", None)], vec![]);
        assert_eq!(s.total_exemption_value, 0.0);
    }

    #[test]
    fn empty_sources_yield_empty_summary() {
        let s = summarize(&bbl(), vec![], vec![]);
        assert!(!s.has_421a && !s.has_j51 && !s.has_421g && !s.has_420c);
        assert_eq!(s.total_exemption_value, 0.0);
        assert_eq!(s.total_abatement_amount, 0.0);
        assert_eq!(s.bbl, "1003730021");
    }
}
