//! Registry transport errors.
//!
//! Every variant carries the endpoint that failed so operators can tell
//! which registry misbehaved without re-running the query.

use thiserror::Error;

/// Errors from registry HTTP operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Client configuration problem.
    #[error("registry configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The query predicate could not be rendered (bad field name).
    #[error("query predicate error: {0}")]
    Predicate(#[from] crate::predicate::PredicateError),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// The logical endpoint, e.g. `GET sales $where=...`.
        endpoint: String,
        /// Underlying reqwest error.
        source: reqwest::Error,
    },

    /// The registry answered with a non-success status.
    #[error("registry API error at {endpoint}: status {status}: {body}")]
    ApiError {
        /// The logical endpoint.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The response body did not match the expected row shape.
    #[error("deserialization error at {endpoint}: {source}")]
    Deserialization {
        /// The logical endpoint.
        endpoint: String,
        /// Underlying reqwest/serde error.
        source: reqwest::Error,
    },
}
