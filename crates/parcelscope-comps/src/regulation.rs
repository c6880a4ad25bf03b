//! Rent-regulation inference.
//!
//! An ordered rule engine over structural attributes and tax-benefit
//! flags. One rule is terminal (public-housing ownership); the rest
//! accumulate onto the assessment in a fixed order. The precedence
//! between the pre-1974 rule, the tax-benefit rules, and the condo/co-op
//! note reproduces observed practice and is a policy assumption, not a
//! verified business rule — see DESIGN.md.
//!
//! The output is a likelihood, never a determination: the regulatory
//! agency of record holds the authoritative answer.

use serde::{Deserialize, Serialize};

/// Stabilization begins to be mandatory below this year...
const STABILIZATION_YEAR_CUTOFF: u32 = 1974;
/// ...and rent control can reach below this one.
const RENT_CONTROL_YEAR_CUTOFF: u32 = 1947;
/// Minimum unit count for mandatory stabilization.
const UNIT_THRESHOLD: u32 = 6;

/// Confidence in the assessment. Ordered so later rules can raise but
/// never silently lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Inputs to the rule engine, already reduced to best-available values
/// (the caller prefers total units over residential units when both are
/// known).
#[derive(Debug, Clone, Default)]
pub struct RegulationInput {
    pub year_built: Option<u32>,
    pub units: u32,
    pub building_class: Option<String>,
    pub owner_name: Option<String>,
    /// New-construction exemption present (421-a).
    pub has_new_construction_exemption: bool,
    /// Rehabilitation abatement present (J-51).
    pub has_rehab_abatement: bool,
}

/// The engine's output: likelihood, reasons, confidence, caveats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentRegulationAssessment {
    pub likely_stabilized: bool,
    /// Why the parcel is likely stabilized, in rule order.
    pub reasons: Vec<String>,
    pub confidence: Confidence,
    /// Caveats and context, in rule order.
    pub notes: Vec<String>,
}

/// Run the ordered rules.
pub fn assess_regulation(input: &RegulationInput) -> RentRegulationAssessment {
    // Rule 1 (terminal): public-housing ownership is governed by its own
    // framework; nothing downstream applies.
    if is_public_housing_owner(input.owner_name.as_deref()) {
        return RentRegulationAssessment {
            likely_stabilized: false,
            reasons: Vec::new(),
            confidence: Confidence::High,
            notes: vec![
                "Owner appears to be a public housing authority; public housing operates under its own rules, outside rent stabilization.".to_string(),
            ],
        };
    }

    let mut likely = false;
    let mut confidence = Confidence::Medium;
    let mut reasons = Vec::new();
    let mut notes = Vec::new();

    let is_condo_coop = input
        .building_class
        .as_deref()
        .and_then(|c| c.chars().next())
        .map(|c| c.eq_ignore_ascii_case(&'R'))
        .unwrap_or(false);

    // Rule 2a: condo/co-op is context, not a verdict: rented-out units
    // inside one can still be stabilized.
    if is_condo_coop {
        notes.push(
            "Building class indicates a condo or co-op; stabilization applies to rented units within it, not the building as a whole.".to_string(),
        );
    }

    // Rule 2b: the structural test.
    if let Some(year) = input.year_built {
        if year < STABILIZATION_YEAR_CUTOFF && input.units >= UNIT_THRESHOLD && !is_condo_coop {
            likely = true;
            confidence = confidence.max(Confidence::Medium);
            reasons.push(format!(
                "Built in {year} with {} units: buildings of {UNIT_THRESHOLD}+ units completed before {STABILIZATION_YEAR_CUTOFF} are generally rent-stabilized.",
                input.units
            ));
            if year < RENT_CONTROL_YEAR_CUTOFF {
                notes.push(
                    "Built before 1947: long-occupied units may fall under rent control, an older and stricter regime.".to_string(),
                );
            }
        }
    }

    // Rule 2c: new-construction exemption mandates stabilization for the
    // benefit period.
    if input.has_new_construction_exemption {
        likely = true;
        confidence = Confidence::High;
        reasons.push(
            "Receives a 421-a new-construction exemption, which requires rent stabilization during the benefit period.".to_string(),
        );
        notes.push(
            "421-a stabilization generally ends when the exemption expires; check the benefit schedule.".to_string(),
        );
    }

    // Rule 2d: rehabilitation abatement likewise.
    if input.has_rehab_abatement {
        likely = true;
        confidence = Confidence::High;
        reasons.push(
            "Receives a J-51 rehabilitation abatement, which requires rent stabilization while the benefit is active.".to_string(),
        );
        notes.push(
            "J-51 stabilization can outlast the benefit when required lease riders were omitted.".to_string(),
        );
    }

    if likely {
        // Rule 3: standard caveats on every affirmative outcome.
        notes.push(
            "Individual units may have been deregulated over time; status varies unit by unit.".to_string(),
        );
        notes.push(
            "Verify against the state housing regulator's official records before relying on this assessment.".to_string(),
        );
    } else if input.units >= UNIT_THRESHOLD
        && input.year_built.map_or(false, |y| y >= STABILIZATION_YEAR_CUTOFF)
    {
        // Rule 4: the tax-benefit path is the remaining route in.
        notes.push(format!(
            "Built {STABILIZATION_YEAR_CUTOFF} or later with {UNIT_THRESHOLD}+ units: stabilized only if enrolled through a tax-benefit program."
        ));
    } else if input.units > 0 && input.units < UNIT_THRESHOLD {
        // Rule 5: below the mandatory threshold.
        notes.push(format!(
            "Fewer than {UNIT_THRESHOLD} units: below the mandatory stabilization threshold."
        ));
    }

    // Rule 6: with no year and a small building, the non-stabilized
    // outcome rests on thin evidence.
    if !likely && input.year_built.is_none() && input.units < UNIT_THRESHOLD {
        confidence = Confidence::Low;
        notes.push(
            "Year built is unknown; this assessment carries significant uncertainty.".to_string(),
        );
    }

    RentRegulationAssessment {
        likely_stabilized: likely,
        reasons,
        confidence,
        notes,
    }
}

fn is_public_housing_owner(owner: Option<&str>) -> bool {
    let Some(owner) = owner else {
        return false;
    };
    let upper = owner.to_ascii_uppercase();
    upper.contains("HOUSING AUTHORITY") || upper.contains("HOUSING AUTH") || upper.contains("NYCHA")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RegulationInput {
        RegulationInput::default()
    }

    #[test]
    fn public_housing_owner_is_terminal() {
        let assessment = assess_regulation(&RegulationInput {
            owner_name: Some("NYC HOUSING AUTHORITY".into()),
            year_built: Some(1930),
            units: 100,
            ..input()
        });
        assert!(!assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::High);
        assert!(assessment.reasons.is_empty());
        assert_eq!(assessment.notes.len(), 1);
    }

    #[test]
    fn prewar_walkup_is_likely_stabilized_with_one_reason() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1930),
            units: 8,
            building_class: Some("C1".into()),
            ..input()
        });
        assert!(assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::Medium);
        assert_eq!(assessment.reasons.len(), 1);
        assert!(assessment.reasons[0].contains("1930"));
        assert!(assessment.reasons[0].contains("8 units"));
    }

    #[test]
    fn pre_1947_building_gets_rent_control_note() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1940),
            units: 10,
            ..input()
        });
        assert!(assessment
            .notes
            .iter()
            .any(|n| n.contains("rent control")));
    }

    #[test]
    fn new_construction_exemption_raises_confidence_to_high() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(2015),
            units: 40,
            has_new_construction_exemption: true,
            ..input()
        });
        assert!(assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::High);
        assert!(assessment.reasons.iter().any(|r| r.contains("421-a")));
        assert!(assessment.notes.iter().any(|n| n.contains("expires")));
    }

    #[test]
    fn rehab_abatement_raises_confidence_to_high() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1960),
            units: 12,
            has_rehab_abatement: true,
            ..input()
        });
        assert!(assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::High);
        // Pre-1974 reason plus the J-51 reason.
        assert_eq!(assessment.reasons.len(), 2);
    }

    #[test]
    fn affirmative_outcomes_carry_both_standard_caveats() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1930),
            units: 8,
            ..input()
        });
        assert!(assessment.notes.iter().any(|n| n.contains("deregulated")));
        assert!(assessment.notes.iter().any(|n| n.contains("Verify")));
    }

    #[test]
    fn condo_class_blocks_the_structural_rule_but_not_benefit_rules() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1930),
            units: 50,
            building_class: Some("R4".into()),
            ..input()
        });
        assert!(!assessment.likely_stabilized);
        assert!(assessment.notes.iter().any(|n| n.contains("condo")));

        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1930),
            units: 50,
            building_class: Some("R4".into()),
            has_new_construction_exemption: true,
            ..input()
        });
        assert!(assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::High);
    }

    #[test]
    fn postwar_large_building_gets_tax_benefit_path_note() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1990),
            units: 20,
            ..input()
        });
        assert!(!assessment.likely_stabilized);
        assert!(assessment
            .notes
            .iter()
            .any(|n| n.contains("tax-benefit program")));
    }

    #[test]
    fn small_building_gets_threshold_note() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: Some(1930),
            units: 3,
            ..input()
        });
        assert!(!assessment.likely_stabilized);
        assert!(assessment.notes.iter().any(|n| n.contains("threshold")));
    }

    #[test]
    fn unknown_year_small_building_forces_low_confidence() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: None,
            units: 3,
            ..input()
        });
        assert!(!assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::Low);
        assert!(assessment.notes.iter().any(|n| n.contains("unknown")));
    }

    #[test]
    fn unknown_year_does_not_lower_an_affirmative_outcome() {
        let assessment = assess_regulation(&RegulationInput {
            year_built: None,
            units: 3,
            has_rehab_abatement: true,
            ..input()
        });
        assert!(assessment.likely_stabilized);
        assert_eq!(assessment.confidence, Confidence::High);
    }
}
