//! Registry client configuration.
//!
//! Configures resource URLs for each registry dataset. Defaults point to
//! the public open-data endpoints. Override via environment variables or
//! explicit construction for staging/testing.

use url::Url;

/// Configuration for connecting to the property registries.
///
/// Custom `Debug` implementation redacts the `app_token` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct RegistryConfig {
    /// Resource URL for the parcel registry dataset.
    pub parcel_registry_url: Url,
    /// Resource URL for the rolling-sales ledger dataset.
    pub sales_ledger_url: Url,
    /// Resource URL for the property-exemption dataset.
    pub exemption_registry_url: Url,
    /// Resource URL for the property-abatement dataset.
    pub abatement_registry_url: Url,
    /// Application token for the open-data platform. Optional; absent
    /// means anonymous (rate-limited) access.
    pub app_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("parcel_registry_url", &self.parcel_registry_url)
            .field("sales_ledger_url", &self.sales_ledger_url)
            .field("exemption_registry_url", &self.exemption_registry_url)
            .field("abatement_registry_url", &self.abatement_registry_url)
            .field("app_token", &self.app_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `PSCOPE_PARCEL_URL` (default: `https://data.cityofnewyork.us/resource/64uk-42ks.json`)
    /// - `PSCOPE_SALES_URL` (default: `https://data.cityofnewyork.us/resource/usep-8jbt.json`)
    /// - `PSCOPE_EXEMPTION_URL` (default: `https://data.cityofnewyork.us/resource/muvi-b6kx.json`)
    /// - `PSCOPE_ABATEMENT_URL` (default: `https://data.cityofnewyork.us/resource/y7az-s7wc.json`)
    /// - `PSCOPE_APP_TOKEN` (optional)
    /// - `PSCOPE_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            parcel_registry_url: env_url(
                "PSCOPE_PARCEL_URL",
                "https://data.cityofnewyork.us/resource/64uk-42ks.json",
            )?,
            sales_ledger_url: env_url(
                "PSCOPE_SALES_URL",
                "https://data.cityofnewyork.us/resource/usep-8jbt.json",
            )?,
            exemption_registry_url: env_url(
                "PSCOPE_EXEMPTION_URL",
                "https://data.cityofnewyork.us/resource/muvi-b6kx.json",
            )?,
            abatement_registry_url: env_url(
                "PSCOPE_ABATEMENT_URL",
                "https://data.cityofnewyork.us/resource/y7az-s7wc.json",
            )?,
            app_token: std::env::var("PSCOPE_APP_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("PSCOPE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        })
    }

    /// Create a configuration pointing at a local mock server (for tests).
    ///
    /// All four datasets are routed to distinct paths under one base URL,
    /// matching the wiremock contract-test layout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the base URL cannot be parsed.
    pub fn local_mock(base: &str) -> Result<Self, ConfigError> {
        let make_url = |path: &str| -> Result<Url, ConfigError> {
            Url::parse(&format!("{base}/{path}"))
                .map_err(|e| ConfigError::InvalidUrl(path.to_string(), e.to_string()))
        };
        Ok(Self {
            parcel_registry_url: make_url("parcels.json")?,
            sales_ledger_url: make_url("sales.json")?,
            exemption_registry_url: make_url("exemptions.json")?,
            abatement_registry_url: make_url("abatements.json")?,
            app_token: None,
            timeout_secs: 5,
        })
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PSCOPE_APP_TOKEN is not a valid header value")]
    InvalidToken,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
