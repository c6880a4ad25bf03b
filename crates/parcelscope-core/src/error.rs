//! # Error Hierarchy — Core Layer
//!
//! Validation errors for domain primitive newtypes. Each variant carries
//! the invalid input and the expected format so that callers can diagnose
//! bad requests without guesswork. Higher layers (registry transport,
//! comps engine) define their own error enums and convert from these
//! with `#[from]`.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Borough token is not a recognized name, abbreviation, or digit.
    #[error("unknown borough: \"{0}\" (expected 1-5, MN/BX/BK/QN/SI, or a borough name)")]
    UnknownBorough(String),

    /// Block number is outside the registry's representable range.
    #[error("invalid block number: {0} (expected 0-99999)")]
    InvalidBlock(u32),

    /// Lot number is outside the registry's representable range.
    #[error("invalid lot number: {0} (expected 0-9999)")]
    InvalidLot(u32),

    /// BBL string does not parse as a borough-block-lot key.
    #[error("invalid BBL: \"{0}\" (expected 10 digits: 1-digit borough + 5-digit block + 4-digit lot)")]
    InvalidBbl(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_borough_display_names_token() {
        let err = ValidationError::UnknownBorough("ATLANTIS".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("ATLANTIS"));
        assert!(msg.contains("MN/BX/BK/QN/SI"));
    }

    #[test]
    fn invalid_block_display_names_range() {
        let err = ValidationError::InvalidBlock(100_000);
        assert!(format!("{err}").contains("100000"));
    }

    #[test]
    fn invalid_bbl_display_echoes_input() {
        let err = ValidationError::InvalidBbl("123".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("123"));
        assert!(msg.contains("10 digits"));
    }
}
