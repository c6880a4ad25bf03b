//! # parcelscope-registry — Typed clients for the property registries
//!
//! Provides ergonomic, typed access to the three public registries:
//! - **Parcel registry** (structural/ownership attributes per BBL)
//! - **Sales ledger** (recorded transaction rows)
//! - **Tax-benefit registries** (exemption and abatement rows per BBL)
//!
//! ## Architecture
//!
//! This crate is the ONLY authorized path for Parcelscope to reach
//! registry data. Query construction goes through the [`predicate`]
//! module's structured AST (validated field names, escaped literals,
//! never raw string interpolation), and every client returns typed rows
//! with lenient, forward-compatible deserialization (registry exports
//! carry numbers as strings and add fields without notice).
//!
//! ## Endpoint Convention
//!
//! All registries speak the same open-data row API: a GET against the
//! dataset resource URL with `$where`, `$limit`, and `$order` query
//! parameters, returning a JSON array of string-valued rows.

pub mod benefits;
pub mod config;
pub mod error;
pub mod parcels;
pub mod predicate;
pub mod rows;
pub mod sales;
pub mod types;

pub use config::RegistryConfig;
pub use error::RegistryError;
pub use predicate::Predicate;
pub use types::{AbatementRow, ExemptionRow, ParcelRecord, SaleRecord};

use std::time::Duration;

/// Top-level registry client. Holds sub-clients for each registry.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    parcels: parcels::ParcelRegistryClient,
    sales: sales::SalesLedgerClient,
    benefits: benefits::TaxBenefitClient,
}

impl RegistryClient {
    /// Create a new registry client from configuration.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

        // The open-data platform rate-limits anonymous callers; an app
        // token lifts that. Absent token is still a valid configuration.
        if let Some(token) = &config.app_token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                "X-App-Token",
                reqwest::header::HeaderValue::from_str(token)
                    .map_err(|_| RegistryError::Config(config::ConfigError::InvalidToken))?,
            );
            builder = builder.default_headers(headers);
        }

        let http = builder.build().map_err(|e| RegistryError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;

        Ok(Self {
            parcels: parcels::ParcelRegistryClient::new(http.clone(), config.parcel_registry_url),
            sales: sales::SalesLedgerClient::new(http.clone(), config.sales_ledger_url),
            benefits: benefits::TaxBenefitClient::new(
                http,
                config.exemption_registry_url,
                config.abatement_registry_url,
            ),
        })
    }

    /// Access the parcel registry client.
    pub fn parcels(&self) -> &parcels::ParcelRegistryClient {
        &self.parcels
    }

    /// Access the sales ledger client.
    pub fn sales(&self) -> &sales::SalesLedgerClient {
        &self.sales
    }

    /// Access the tax-benefit registry client.
    pub fn benefits(&self) -> &benefits::TaxBenefitClient {
        &self.benefits
    }
}
