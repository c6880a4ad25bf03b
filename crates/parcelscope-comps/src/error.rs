//! Analytic-core errors.
//!
//! Only two remote calls are allowed to fail an operation: subject
//! resolution and the candidate-set query. Everything downstream of
//! those degrades per item instead of erroring (see the candidates and
//! benefits modules).

use thiserror::Error;

/// Errors from the four public operations.
#[derive(Debug, Error)]
pub enum CompsError {
    /// Subject resolution exhausted every query without a match.
    #[error("no parcel found for address: \"{address}\"")]
    NotFound {
        /// The caller's input address, echoed back.
        address: String,
    },

    /// The market-area cascade found no label; comparable discovery
    /// refuses to guess.
    #[error("could not determine a market area for parcel {bbl}")]
    NeighborhoodUndetermined {
        /// The resolved subject key.
        bbl: String,
    },

    /// Caller input failed validation before any remote query.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] parcelscope_core::ValidationError),

    /// A sales/parcel query needs an address or a BBL; neither was given.
    #[error("invalid input: provide an address or a BBL")]
    MissingSubject,

    /// A primary registry call failed.
    #[error(transparent)]
    Registry(#[from] parcelscope_registry::RegistryError),
}
