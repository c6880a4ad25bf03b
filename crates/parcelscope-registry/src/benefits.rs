//! Tax-benefit registry client.
//!
//! Exemptions and abatements live in two separate datasets keyed by the
//! packed 10-digit BBL. Both are fetched here; aggregation into program
//! flags and totals belongs to the comps layer.

use parcelscope_core::Bbl;
use url::Url;

use crate::error::RegistryError;
use crate::rows::{AbatementWireRow, ExemptionWireRow};
use crate::types::{AbatementRow, ExemptionRow};

/// Both benefit datasets key rows on this field.
const PARCEL_ID_FIELD: &str = "parid";

/// Row cap per benefit query. A parcel rarely carries more than a
/// handful of benefit rows per year; 200 covers decades of history.
const BENEFIT_ROW_LIMIT: u32 = 200;

/// Client for the exemption and abatement registries.
#[derive(Debug, Clone)]
pub struct TaxBenefitClient {
    http: reqwest::Client,
    exemption_url: Url,
    abatement_url: Url,
}

impl TaxBenefitClient {
    pub(crate) fn new(http: reqwest::Client, exemption_url: Url, abatement_url: Url) -> Self {
        Self {
            http,
            exemption_url,
            abatement_url,
        }
    }

    /// Fetch all exemption rows for a parcel.
    pub async fn query_exemptions(&self, bbl: &Bbl) -> Result<Vec<ExemptionRow>, RegistryError> {
        let endpoint = format!("GET exemptions parid={}", bbl.padded());

        let resp = self
            .http
            .get(self.exemption_url.clone())
            .query(&[
                (PARCEL_ID_FIELD, bbl.padded()),
                ("$limit", BENEFIT_ROW_LIMIT.to_string()),
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

        let rows: Vec<ExemptionWireRow> =
            resp.json().await.map_err(|e| RegistryError::Deserialization {
                endpoint,
                source: e,
            })?;
        Ok(rows.into_iter().map(ExemptionWireRow::into_row).collect())
    }

    /// Fetch all abatement rows for a parcel.
    pub async fn query_abatements(&self, bbl: &Bbl) -> Result<Vec<AbatementRow>, RegistryError> {
        let endpoint = format!("GET abatements parid={}", bbl.padded());

        let resp = self
            .http
            .get(self.abatement_url.clone())
            .query(&[
                (PARCEL_ID_FIELD, bbl.padded()),
                ("$limit", BENEFIT_ROW_LIMIT.to_string()),
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

        let rows: Vec<AbatementWireRow> =
            resp.json().await.map_err(|e| RegistryError::Deserialization {
                endpoint,
                source: e,
            })?;
        Ok(rows.into_iter().map(AbatementWireRow::into_row).collect())
    }
}
