//! Market micro-area inference.
//!
//! The parcel registry does not label parcels with a market area; the
//! sales ledger labels sales. When the subject itself has no labeled
//! sale, nearby sales on the same or neighboring blocks almost always
//! agree on a label. This cascade is deliberately best-effort: it stops
//! at the first step that yields anything rather than searching
//! exhaustively, and refuses to guess when every step comes up empty.

use parcelscope_core::Bbl;
use parcelscope_registry::sales::{fields, SalesLedgerClient};
use parcelscope_registry::Predicate;

use crate::error::CompsError;

/// Row limits per cascade step. Same-block sales are strong evidence, so
/// we look at more of them; neighboring blocks are weaker, so fewer.
const SAME_KEY_LIMIT: u32 = 10;
const SAME_BLOCK_LIMIT: u32 = 5;
const NEIGHBOR_BLOCK_LIMIT: u32 = 3;

/// Infer the market micro-area label for a parcel.
///
/// Cascade, stopping at the first non-empty step:
/// 1. sales exactly matching the key (first non-empty label wins);
/// 2. sales on the same block with a positive price (label mode);
/// 3. the preceding block, then the following block, taking the mode of the first
///    block that yields any labeled sale.
///
/// # Errors
///
/// [`CompsError::NeighborhoodUndetermined`] when the cascade exhausts.
pub async fn infer_neighborhood(
    sales: &SalesLedgerClient,
    bbl: &Bbl,
) -> Result<String, CompsError> {
    // Step 1: the parcel's own sale history.
    let own = key_filter(bbl, bbl.block());
    let records = sales.query(&own, SAME_KEY_LIMIT).await?;
    if let Some(label) = records.iter().filter_map(|r| r.neighborhood.clone()).next() {
        tracing::debug!(%bbl, %label, "market area from the parcel's own sales");
        return Ok(label);
    }

    // Step 2: the block's sale history.
    let block = block_filter(bbl, bbl.block());
    let records = sales.query(&block, SAME_BLOCK_LIMIT).await?;
    let labels: Vec<String> = records.into_iter().filter_map(|r| r.neighborhood).collect();
    if let Some(label) = mode_label(&labels) {
        tracing::debug!(%bbl, %label, "market area from same-block sales");
        return Ok(label);
    }

    // Step 3: the immediately preceding, then following, block.
    let neighbors = [bbl.block().checked_sub(1), bbl.block().checked_add(1)];
    for neighbor in neighbors.into_iter().flatten().filter(|b| *b > 0) {
        let filter = block_filter(bbl, neighbor);
        let records = sales.query(&filter, NEIGHBOR_BLOCK_LIMIT).await?;
        let labels: Vec<String> = records.into_iter().filter_map(|r| r.neighborhood).collect();
        if let Some(label) = mode_label(&labels) {
            tracing::debug!(%bbl, block = neighbor, %label, "market area from a neighboring block");
            return Ok(label);
        }
    }

    Err(CompsError::NeighborhoodUndetermined {
        bbl: bbl.to_string(),
    })
}

fn key_filter(bbl: &Bbl, block: u32) -> Predicate {
    Predicate::And(vec![
        Predicate::EqText(fields::BOROUGH.into(), bbl.borough().digit().to_string()),
        Predicate::EqNumber(fields::BLOCK.into(), f64::from(block)),
        Predicate::EqNumber(fields::LOT.into(), f64::from(bbl.lot())),
    ])
}

fn block_filter(bbl: &Bbl, block: u32) -> Predicate {
    Predicate::And(vec![
        Predicate::EqText(fields::BOROUGH.into(), bbl.borough().digit().to_string()),
        Predicate::EqNumber(fields::BLOCK.into(), f64::from(block)),
        Predicate::Gt(fields::SALE_PRICE.into(), 0.0),
    ])
}

/// Statistical mode with deterministic tie-breaking: the label
/// encountered first wins a tie. Empty input yields `None`.
pub(crate) fn mode_label(labels: &[String]) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(l, _)| *l == label.as_str()) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }
    // max_by_key would keep the LAST maximal element on a tie; the
    // first-encountered label must win, so replace only on strictly
    // greater counts.
    let mut best: Option<(&str, usize)> = None;
    for (label, n) in counts {
        if best.map_or(true, |(_, bn)| n > bn) {
            best = Some((label, n));
        }
    }
    best.map(|(l, _)| l.to_string())
}
