//! HttpAnalysisGateway - REST client for the analysis service.
//!
//! Endpoints (relative to the configured base URL):
//! - `POST /api/analyzer/ast` with `{ "text": ... }`
//! - `POST /api/analyzer/natural` with `{ "description": ... }`
//! - `GET  /api/analyzer/cache`

use algoscope_core::analysis::{AnalysisResult, CachedAlgorithmRecord, NaturalAnalysisPayload};
use algoscope_core::gateway::{AnalysisGateway, GatewayError};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const AST_PATH: &str = "/api/analyzer/ast";
const NATURAL_PATH: &str = "/api/analyzer/natural";
const CACHE_PATH: &str = "/api/analyzer/cache";

/// Placeholder for an error body that could not be read.
pub const NO_BODY: &str = "<no-body>";

/// Gateway implementation that talks to the analysis service over HTTP.
#[derive(Clone)]
pub struct HttpAnalysisGateway {
    client: Client,
    base_url: String,
}

impl HttpAnalysisGateway {
    /// Creates a gateway for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Scheme, host and port of the service; a trailing slash
    ///   is ignored
    /// * `timeout` - Per-request timeout, or `None` to wait indefinitely
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Endpoint` if the URL is not http(s) or the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(GatewayError::Endpoint(format!(
                "base URL must start with http:// or https://, got '{base_url}'"
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| GatewayError::Endpoint(format!("failed to build HTTP client: {err}")))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, GatewayError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!("[HttpAnalysisGateway] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let response = ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::Decode(format!("{path}: {err}")))
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisGateway {
    async fn analyze_pseudocode(&self, text: &str) -> Result<AnalysisResult, GatewayError> {
        self.post_json(AST_PATH, &TextRequest { text }).await
    }

    async fn analyze_natural(
        &self,
        description: &str,
    ) -> Result<NaturalAnalysisPayload, GatewayError> {
        self.post_json(NATURAL_PATH, &DescriptionRequest { description })
            .await
    }

    async fn fetch_cached_algorithms(&self) -> Result<Vec<CachedAlgorithmRecord>, GatewayError> {
        let url = self.endpoint(CACHE_PATH);
        tracing::debug!("[HttpAnalysisGateway] GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(map_transport_error)?;
        let response = ensure_success(response).await?;
        let body = response.text().await.map_err(map_transport_error)?;

        parse_cache_listing(&body)
    }
}

#[derive(Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct DescriptionRequest<'a> {
    description: &'a str,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CacheListing {
    Bare(Vec<Value>),
    Wrapped {
        #[serde(default)]
        items: Option<Vec<Value>>,
    },
}

/// Parses the cache listing, accepting a bare array, an `{ "items": [...] }`
/// wrapper, `null` or an empty body.
///
/// Entries are decoded one by one; an entry that is not a record is logged
/// and skipped.
fn parse_cache_listing(body: &str) -> Result<Vec<CachedAlgorithmRecord>, GatewayError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let listing: Option<CacheListing> = serde_json::from_str(body)
        .map_err(|err| GatewayError::Decode(format!("{CACHE_PATH}: {err}")))?;

    let entries = match listing {
        None => Vec::new(),
        Some(CacheListing::Bare(items)) => items,
        Some(CacheListing::Wrapped { items }) => items.unwrap_or_default(),
    };

    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            match serde_json::from_value::<CachedAlgorithmRecord>(entry) {
                Ok(record) => Some(record),
                Err(err) => {
                    tracing::warn!(
                        "[HttpAnalysisGateway] Skipping cache entry {}: {}",
                        index,
                        err
                    );
                    None
                }
            }
        })
        .collect())
}

async fn ensure_success(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => NO_BODY.to_string(),
    };
    tracing::debug!("[HttpAnalysisGateway] HTTP {} from service", status.as_u16());
    Err(GatewayError::http(status.as_u16(), body))
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout(err.to_string())
    } else if err.is_decode() {
        GatewayError::Decode(err.to_string())
    } else {
        GatewayError::Network(err.to_string())
    }
}
