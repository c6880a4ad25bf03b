//! Parcel registry client.
//!
//! One dataset, one operation: filter parcels with a [`Predicate`] and a
//! row limit. Rows whose key is unusable (missing or unknown borough)
//! are dropped with a debug event rather than failing the batch.

use url::Url;

use crate::error::RegistryError;
use crate::predicate::Predicate;
use crate::rows::ParcelRow;
use crate::types::ParcelRecord;

/// Queryable field names in the parcel registry dataset.
pub mod fields {
    pub const ADDRESS: &str = "address";
    pub const BOROUGH: &str = "borough";
    pub const BLOCK: &str = "block";
    pub const LOT: &str = "lot";
}

/// Client for the parcel registry.
#[derive(Debug, Clone)]
pub struct ParcelRegistryClient {
    http: reqwest::Client,
    resource_url: Url,
}

impl ParcelRegistryClient {
    pub(crate) fn new(http: reqwest::Client, resource_url: Url) -> Self {
        Self { http, resource_url }
    }

    /// Query parcel records matching `filter`, up to `limit` rows.
    pub async fn query(
        &self,
        filter: &Predicate,
        limit: u32,
    ) -> Result<Vec<ParcelRecord>, RegistryError> {
        let clause = filter.render()?;
        let endpoint = format!("GET parcels $where={clause}");
        let limit = limit.to_string();

        let resp = self
            .http
            .get(self.resource_url.clone())
            .query(&[("$where", clause.as_str()), ("$limit", limit.as_str())])
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

        let rows: Vec<ParcelRow> = resp.json().await.map_err(|e| RegistryError::Deserialization {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        let total = rows.len();
        let records: Vec<ParcelRecord> = rows.into_iter().filter_map(ParcelRow::into_record).collect();
        if records.len() < total {
            tracing::debug!(
                endpoint,
                dropped = total - records.len(),
                "dropped parcel rows with unusable keys"
            );
        }
        Ok(records)
    }
}
