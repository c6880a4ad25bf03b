//! Weighted similarity scoring.
//!
//! Pure functions, no I/O, no registry types. The score is the sum of
//! five independent bounded components (30 + 25 + 20 + 15 + 10), so it
//! always lands in [0, 100]. Every component degrades to a zero
//! contribution on missing or zero inputs; nothing here can divide by
//! zero or panic.

use serde::{Deserialize, Serialize};

/// How a candidate's market area relates to the subject's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaRelation {
    /// Same micro-area label.
    Same,
    /// Adjacent per the adjacency table.
    Adjacent,
    /// Neither same nor adjacent.
    Other,
}

/// The attributes one side of a comparison contributes to the score.
#[derive(Debug, Clone, Default)]
pub struct ScoreProfile {
    pub building_class: Option<String>,
    pub residential_units: u32,
    pub total_units: u32,
    pub year_built: Option<u32>,
    pub building_area: Option<f64>,
}

impl ScoreProfile {
    /// The unit count used for similarity: the larger of the two counts,
    /// since registries disagree on which one they populate.
    fn comparison_units(&self) -> u32 {
        self.residential_units.max(self.total_units)
    }
}

/// Compute the weighted similarity score between subject and candidate.
pub fn similarity_score(
    subject: &ScoreProfile,
    candidate: &ScoreProfile,
    relation: AreaRelation,
) -> u8 {
    let total = area_component(relation)
        + class_component(
            subject.building_class.as_deref(),
            candidate.building_class.as_deref(),
        )
        + unit_component(subject.comparison_units(), candidate.comparison_units())
        + year_component(subject.year_built, candidate.year_built)
        + size_component(subject.building_area, candidate.building_area);
    debug_assert!(total <= 100);
    total as u8
}

/// 30 for the same area, 15 for an adjacent one.
fn area_component(relation: AreaRelation) -> u32 {
    match relation {
        AreaRelation::Same => 30,
        AreaRelation::Adjacent => 15,
        AreaRelation::Other => 0,
    }
}

/// 25 for an exact class-code match, 15 when only the category (first
/// letter) matches.
fn class_component(subject: Option<&str>, candidate: Option<&str>) -> u32 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return 0;
    };
    let s = s.trim().to_ascii_uppercase();
    let c = c.trim().to_ascii_uppercase();
    if s.is_empty() || c.is_empty() {
        0
    } else if s == c {
        25
    } else if s.chars().next() == c.chars().next() {
        15
    } else {
        0
    }
}

/// `round(20 × min/max)` over unit counts; 0 when either side has none.
fn unit_component(subject: u32, candidate: u32) -> u32 {
    ratio_component(f64::from(subject), f64::from(candidate), 20.0)
}

/// Stepped year-built proximity: within 5 years is near-identical
/// housing stock, beyond 30 years says nothing.
fn year_component(subject: Option<u32>, candidate: Option<u32>) -> u32 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return 0;
    };
    match s.abs_diff(c) {
        0..=5 => 15,
        6..=10 => 12,
        11..=20 => 8,
        21..=30 => 4,
        _ => 0,
    }
}

/// `round(10 × min/max)` over building areas; 0 when either is unknown
/// or zero.
fn size_component(subject: Option<f64>, candidate: Option<f64>) -> u32 {
    match (subject, candidate) {
        (Some(s), Some(c)) => ratio_component(s, c, 10.0),
        _ => 0,
    }
}

fn ratio_component(a: f64, b: f64, weight: f64) -> u32 {
    if a <= 0.0 || b <= 0.0 {
        return 0;
    }
    (weight * (a.min(b) / a.max(b))).round() as u32
}
