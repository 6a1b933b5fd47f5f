//! Analysis gateway trait.
//!
//! Defines the interface to the remote analysis service. The application
//! layer only ever talks to the service through this trait, so tests can
//! substitute an in-memory implementation.

use crate::analysis::{AnalysisResult, CachedAlgorithmRecord, NaturalAnalysisPayload};
use async_trait::async_trait;
use thiserror::Error;

/// Failure of a single gateway call.
///
/// The rendered message is what the request lifecycle classifies, so each
/// variant keeps the keyword the classifier looks for (`network`, `timeout`,
/// `HTTP 4xx`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The service could not be reached
    #[error("network error: {0}")]
    Network(String),

    /// The request did not complete in time
    #[error("request timeout: {0}")]
    Timeout(String),

    /// The service answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(String),

    /// The endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl GatewayError {
    /// Creates an Http error
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Returns the HTTP status if this is an Http error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// An abstract client of the analysis service.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Analyzes pseudocode.
    ///
    /// # Arguments
    ///
    /// * `text` - The pseudocode exactly as the user typed it
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if the service is unreachable, times out,
    /// rejects the input or sends an undecodable body.
    async fn analyze_pseudocode(&self, text: &str) -> Result<AnalysisResult, GatewayError>;

    /// Translates a natural-language description into pseudocode and
    /// analyzes it.
    ///
    /// # Arguments
    ///
    /// * `description` - The algorithm described in prose
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AnalysisGateway::analyze_pseudocode`].
    async fn analyze_natural(&self, description: &str)
    -> Result<NaturalAnalysisPayload, GatewayError>;

    /// Lists the analyses the service has cached.
    ///
    /// An absent or empty cache yields an empty vector, not an error.
    async fn fetch_cached_algorithms(&self) -> Result<Vec<CachedAlgorithmRecord>, GatewayError>;
}
