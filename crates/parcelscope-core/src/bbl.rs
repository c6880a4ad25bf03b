//! # BBL Newtypes
//!
//! The borough-block-lot key is the canonical parcel identifier across
//! every registry Parcelscope consumes. Registries disagree on its
//! spelling: the parcel registry zero-pads block and lot, the sales
//! ledger strips leading zeros, the tax-benefit registry wants the
//! packed 10-digit form, so [`Bbl`] stores the numeric components once
//! and renders whichever form a registry expects.
//!
//! ## Validation
//!
//! [`Bbl`] validates block (0-99999) and lot (0-9999) at construction
//! time. [`Borough`] parses from a digit, a two-letter abbreviation, or
//! a full borough name; anything else is rejected before a remote query
//! is ever issued.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the five boroughs, identified in registry data by the digits 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Bronx,
    Brooklyn,
    Queens,
    StatenIsland,
}

impl Borough {
    /// The registry digit for this borough (1-5).
    pub fn digit(self) -> u8 {
        match self {
            Self::Manhattan => 1,
            Self::Bronx => 2,
            Self::Brooklyn => 3,
            Self::Queens => 4,
            Self::StatenIsland => 5,
        }
    }

    /// Parse a borough from a registry digit.
    pub fn from_digit(d: u8) -> Result<Self, ValidationError> {
        match d {
            1 => Ok(Self::Manhattan),
            2 => Ok(Self::Bronx),
            3 => Ok(Self::Brooklyn),
            4 => Ok(Self::Queens),
            5 => Ok(Self::StatenIsland),
            other => Err(ValidationError::UnknownBorough(other.to_string())),
        }
    }

    /// Parse a borough from a user-supplied token: a digit, a two-letter
    /// abbreviation, or a full name. Case- and whitespace-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownBorough`] for unrecognized tokens.
    /// This check runs before any remote query is issued.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        match token.trim().to_ascii_uppercase().as_str() {
            "1" | "MN" | "MANHATTAN" | "NEW YORK" => Ok(Self::Manhattan),
            "2" | "BX" | "BRONX" | "THE BRONX" => Ok(Self::Bronx),
            "3" | "BK" | "BROOKLYN" | "KINGS" => Ok(Self::Brooklyn),
            "4" | "QN" | "QUEENS" => Ok(Self::Queens),
            "5" | "SI" | "STATEN ISLAND" | "RICHMOND" => Ok(Self::StatenIsland),
            _ => Err(ValidationError::UnknownBorough(token.to_string())),
        }
    }

    /// The conventional display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Manhattan => "Manhattan",
            Self::Bronx => "Bronx",
            Self::Brooklyn => "Brooklyn",
            Self::Queens => "Queens",
            Self::StatenIsland => "Staten Island",
        }
    }
}

impl std::fmt::Display for Borough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A validated borough-block-lot parcel key.
///
/// A `Bbl` uniquely identifies at most one canonical parcel record per
/// query. Block and lot are stored numerically, which makes the
/// normalization the registries need ("strip leading zeros, empty means
/// zero") hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bbl {
    borough: Borough,
    block: u32,
    lot: u32,
}

impl Bbl {
    /// Create a BBL, validating block and lot digit counts.
    pub fn new(borough: Borough, block: u32, lot: u32) -> Result<Self, ValidationError> {
        if block > 99_999 {
            return Err(ValidationError::InvalidBlock(block));
        }
        if lot > 9_999 {
            return Err(ValidationError::InvalidLot(lot));
        }
        Ok(Self { borough, block, lot })
    }

    /// Parse the packed 10-digit form used by the tax-benefit registry
    /// (1-digit borough + 5-digit block + 4-digit lot).
    pub fn from_padded(s: &str) -> Result<Self, ValidationError> {
        let t = s.trim();
        if t.len() != 10 || !t.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::InvalidBbl(s.to_string()));
        }
        let borough = Borough::from_digit(t[0..1].parse::<u8>().map_err(|_| {
            ValidationError::InvalidBbl(s.to_string())
        })?)
        .map_err(|_| ValidationError::InvalidBbl(s.to_string()))?;
        let block = t[1..6]
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidBbl(s.to_string()))?;
        let lot = t[6..10]
            .parse::<u32>()
            .map_err(|_| ValidationError::InvalidBbl(s.to_string()))?;
        Self::new(borough, block, lot)
    }

    /// Parse registry key components as they appear in ledger rows:
    /// possibly zero-padded strings, where empty means zero.
    pub fn from_components(
        borough: Borough,
        block: &str,
        lot: &str,
    ) -> Result<Self, ValidationError> {
        Self::new(borough, parse_key_component(block), parse_key_component(lot))
    }

    pub fn borough(&self) -> Borough {
        self.borough
    }

    pub fn block(&self) -> u32 {
        self.block
    }

    pub fn lot(&self) -> u32 {
        self.lot
    }

    /// The packed 10-digit form: 1-digit borough + zero-padded 5-digit
    /// block + zero-padded 4-digit lot.
    pub fn padded(&self) -> String {
        format!("{}{:05}{:04}", self.borough.digit(), self.block, self.lot)
    }
}

impl std::fmt::Display for Bbl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}-{}", self.borough.digit(), self.block, self.lot)
    }
}

/// Normalize a block/lot component string: strip leading zeros, treat
/// empty (or non-numeric garbage) as zero.
fn parse_key_component(s: &str) -> u32 {
    s.trim().trim_start_matches('0').parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borough_parse_accepts_digit_abbreviation_and_name() {
        assert_eq!(Borough::parse("1").unwrap(), Borough::Manhattan);
        assert_eq!(Borough::parse("bk").unwrap(), Borough::Brooklyn);
        assert_eq!(Borough::parse(" Queens ").unwrap(), Borough::Queens);
        assert_eq!(Borough::parse("RICHMOND").unwrap(), Borough::StatenIsland);
    }

    #[test]
    fn borough_parse_rejects_unknown_token() {
        let err = Borough::parse("6").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownBorough(_)));
    }

    #[test]
    fn bbl_padded_form_zero_pads_block_and_lot() {
        let bbl = Bbl::new(Borough::Manhattan, 373, 21).unwrap();
        assert_eq!(bbl.padded(), "1003730021");
    }

    #[test]
    fn bbl_from_padded_round_trips() {
        let bbl = Bbl::from_padded("3012340056").unwrap();
        assert_eq!(bbl.borough(), Borough::Brooklyn);
        assert_eq!(bbl.block(), 1234);
        assert_eq!(bbl.lot(), 56);
        assert_eq!(bbl.padded(), "3012340056");
    }

    #[test]
    fn bbl_from_padded_rejects_wrong_length_and_non_digits() {
        assert!(Bbl::from_padded("100373002").is_err());
        assert!(Bbl::from_padded("100373002X").is_err());
        assert!(Bbl::from_padded("6003730021").is_err());
    }

    #[test]
    fn bbl_rejects_out_of_range_components() {
        assert!(matches!(
            Bbl::new(Borough::Queens, 100_000, 1),
            Err(ValidationError::InvalidBlock(_))
        ));
        assert!(matches!(
            Bbl::new(Borough::Queens, 1, 10_000),
            Err(ValidationError::InvalidLot(_))
        ));
    }

    #[test]
    fn key_components_strip_leading_zeros_and_default_empty_to_zero() {
        let bbl = Bbl::from_components(Borough::Manhattan, "00373", "0021").unwrap();
        assert_eq!(bbl.block(), 373);
        assert_eq!(bbl.lot(), 21);

        let zero = Bbl::from_components(Borough::Manhattan, "", "").unwrap();
        assert_eq!(zero.block(), 0);
        assert_eq!(zero.lot(), 0);
    }

    #[test]
    fn display_uses_unpadded_components() {
        let bbl = Bbl::new(Borough::Brooklyn, 1234, 56).unwrap();
        assert_eq!(bbl.to_string(), "3-1234-56");
    }
}
