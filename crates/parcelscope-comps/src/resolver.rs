//! Subject parcel resolution.
//!
//! Resolves a free-text address (plus optional borough hint) to a
//! canonical parcel record. Three queries, cheapest-to-loosest, stopping
//! at the first that returns anything:
//!
//! 1. Anchored prefix match on the normalized address, constrained to
//!    the hinted borough. Anchoring avoids numeric-prefix collisions:
//!    a substring match for "522" would also hit "1522".
//! 2. The same match without the borough constraint. User-supplied
//!    borough hints are wrong often enough that a mismatch is a note,
//!    not an error.
//! 3. A shortened form: house number plus the first two street tokens,
//!    which survives spelling differences in street suffixes.

use parcelscope_core::{address, Borough};
use parcelscope_registry::parcels::{fields, ParcelRegistryClient};
use parcelscope_registry::{ParcelRecord, Predicate};

use crate::error::CompsError;

/// Resolve an address to its canonical parcel record.
///
/// # Errors
///
/// [`CompsError::NotFound`] when every query comes back empty;
/// [`CompsError::Registry`] when the parcel registry itself fails
/// (resolution is a primary call, so upstream failure here is fatal).
pub async fn resolve_parcel(
    parcels: &ParcelRegistryClient,
    raw_address: &str,
    borough: Option<Borough>,
) -> Result<ParcelRecord, CompsError> {
    let normalized = address::normalize(raw_address);

    let anchored = Predicate::StartsWith(fields::ADDRESS.into(), normalized.clone());
    let primary = match borough {
        Some(b) => anchored.clone().and(Predicate::EqText(
            fields::BOROUGH.into(),
            b.digit().to_string(),
        )),
        None => anchored.clone(),
    };

    let found = parcels.query(&primary, 1).await?;
    if let Some(record) = found.into_iter().next() {
        return Ok(record);
    }

    // The hinted borough may be wrong; retry unconstrained.
    if borough.is_some() {
        tracing::debug!(
            address = %normalized,
            borough = ?borough,
            "no parcel in hinted borough, retrying without the constraint"
        );
        let found = parcels.query(&anchored, 1).await?;
        if let Some(record) = found.into_iter().next() {
            return Ok(record);
        }
    }

    if let Some(short) = address::short_form(&normalized) {
        let fallback = Predicate::StartsWith(fields::ADDRESS.into(), short.clone());
        tracing::debug!(address = %normalized, short = %short, "trying shortened address form");
        let found = parcels.query(&fallback, 1).await?;
        if let Some(record) = found.into_iter().next() {
            return Ok(record);
        }
    }

    Err(CompsError::NotFound {
        address: raw_address.to_string(),
    })
}
