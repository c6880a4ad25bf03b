//! Sales ledger client.
//!
//! Filtered, ordered reads of recorded transaction rows. Ordering is
//! newest-first by sale date so that a limited fetch returns the most
//! recent market evidence.

use url::Url;

use crate::error::RegistryError;
use crate::predicate::Predicate;
use crate::rows::SaleRow;
use crate::types::SaleRecord;

/// Queryable field names in the sales ledger dataset.
pub mod fields {
    pub const ADDRESS: &str = "address";
    pub const BOROUGH: &str = "borough";
    pub const BLOCK: &str = "block";
    pub const LOT: &str = "lot";
    pub const SALE_PRICE: &str = "sale_price";
    pub const SALE_DATE: &str = "sale_date";
    pub const APARTMENT_NUMBER: &str = "apartment_number";
    pub const NEIGHBORHOOD: &str = "neighborhood";
    pub const BUILDING_CLASS: &str = "building_class_at_time_of_sale";
}

/// Client for the rolling-sales ledger.
#[derive(Debug, Clone)]
pub struct SalesLedgerClient {
    http: reqwest::Client,
    resource_url: Url,
}

impl SalesLedgerClient {
    pub(crate) fn new(http: reqwest::Client, resource_url: Url) -> Self {
        Self { http, resource_url }
    }

    /// Query sale records matching `filter`, newest first, up to `limit`.
    pub async fn query(
        &self,
        filter: &Predicate,
        limit: u32,
    ) -> Result<Vec<SaleRecord>, RegistryError> {
        let clause = filter.render()?;
        let endpoint = format!("GET sales $where={clause}");
        let limit = limit.to_string();

        let resp = self
            .http
            .get(self.resource_url.clone())
            .query(&[
                ("$where", clause.as_str()),
                ("$limit", limit.as_str()),
                ("$order", "sale_date DESC"),
            ])
            .send()
            .await
            .map_err(|e| RegistryError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(RegistryError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        let rows: Vec<SaleRow> = resp.json().await.map_err(|e| RegistryError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let total = rows.len();
        let records: Vec<SaleRecord> = rows.into_iter().filter_map(SaleRow::into_record).collect();
        if records.len() < total {
            tracing::debug!(
                endpoint,
                dropped = total - records.len(),
                "dropped sale rows with unusable keys"
            );
        }
        Ok(records)
    }
}
