//! # Structured Query Predicates
//!
//! Registry queries are expressed as a small boolean expression tree
//! (equality, prefix/substring match, numeric comparison, AND/OR) and
//! rendered to the row API's `$where` syntax at the last moment.
//! Field names are validated and text literals are escaped during
//! rendering, so no caller input is ever interpolated raw into a query
//! string.

use thiserror::Error;

/// Errors from predicate rendering.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PredicateError {
    /// Field name contains characters outside `[a-z0-9_]` or starts with
    /// a digit. Registry columns never do; anything else is caller error.
    #[error("invalid field name: \"{0}\"")]
    InvalidField(String),

    /// An AND/OR node with no operands cannot be rendered.
    #[error("empty boolean combinator")]
    EmptyCombinator,
}

/// A boolean filter expression over named registry fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `field = 'text'` (exact, case as given).
    EqText(String, String),
    /// `field = number`.
    EqNumber(String, f64),
    /// Case-insensitive anchored prefix match. Anchoring matters: a
    /// substring match on "522" would also hit "1522".
    StartsWith(String, String),
    /// Case-insensitive substring match.
    Contains(String, String),
    /// `field > number`.
    Gt(String, f64),
    /// `field >= number`.
    Ge(String, f64),
    /// `field < number`.
    Lt(String, f64),
    /// `field <= number`.
    Le(String, f64),
    /// The field is absent from the row.
    IsNull(String),
    /// All sub-predicates hold.
    And(Vec<Predicate>),
    /// At least one sub-predicate holds.
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Render to a `$where` clause, validating every field name and
    /// escaping every text literal.
    pub fn render(&self) -> Result<String, PredicateError> {
        match self {
            Self::EqText(field, value) => {
                Ok(format!("{} = '{}'", check_field(field)?, escape(value)))
            }
            Self::EqNumber(field, n) => Ok(format!("{} = {}", check_field(field)?, number(*n))),
            Self::StartsWith(field, value) => Ok(format!(
                "starts_with(upper({}), '{}')",
                check_field(field)?,
                escape(&value.to_ascii_uppercase())
            )),
            Self::Contains(field, value) => Ok(format!(
                "contains(upper({}), '{}')",
                check_field(field)?,
                escape(&value.to_ascii_uppercase())
            )),
            Self::Gt(field, n) => Ok(format!("{} > {}", check_field(field)?, number(*n))),
            Self::Ge(field, n) => Ok(format!("{} >= {}", check_field(field)?, number(*n))),
            Self::Lt(field, n) => Ok(format!("{} < {}", check_field(field)?, number(*n))),
            Self::Le(field, n) => Ok(format!("{} <= {}", check_field(field)?, number(*n))),
            Self::IsNull(field) => Ok(format!("{} IS NULL", check_field(field)?)),
            Self::And(parts) => combine(parts, " AND "),
            Self::Or(parts) => combine(parts, " OR "),
        }
    }

    /// Convenience: AND this predicate with another.
    pub fn and(self, other: Predicate) -> Predicate {
        match self {
            Predicate::And(mut parts) => {
                parts.push(other);
                Predicate::And(parts)
            }
            first => Predicate::And(vec![first, other]),
        }
    }
}

fn combine(parts: &[Predicate], joiner: &str) -> Result<String, PredicateError> {
    if parts.is_empty() {
        return Err(PredicateError::EmptyCombinator);
    }
    let rendered: Result<Vec<_>, _> = parts.iter().map(Predicate::render).collect();
    Ok(format!("({})", rendered?.join(joiner)))
}

fn check_field(field: &str) -> Result<&str, PredicateError> {
    let mut bytes = field.bytes();
    let valid_start = matches!(bytes.next(), Some(b) if b.is_ascii_lowercase() || b == b'_');
    let valid_rest = bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid_start && valid_rest {
        Ok(field)
    } else {
        Err(PredicateError::InvalidField(field.to_string()))
    }
}

/// Double embedded single quotes, per the row API's escaping rule.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

/// Integral values render without a trailing `.0`; the registries'
/// numeric columns reject float syntax on integer fields.
fn number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
