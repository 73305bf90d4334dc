//! Search backend adapters.
//!
//! Every external search data source sits behind the [`SearchBackend`]
//! trait: one `execute` call per query, returning a normalized result list
//! or a [`BackendError`]. The dispatcher treats any error - and a timeout -
//! as a failed attempt that advances the fallback chain; nothing an adapter
//! returns ever reaches the tool caller as an error.
//!
//! Adapters without a live integration are served by the explicit
//! [`SimulatedBackend`] variant rather than a hidden branch inside a real
//! adapter, so code and tests can assert on its presence unambiguously.

mod metasearch;
pub mod mock;
mod native;
mod online;
mod registry;
mod simulated;

pub use metasearch::MetasearchBackend;
pub use mock::MockBackend;
pub use native::NativeSearchBackend;
pub use online::OnlineSearchBackend;
pub use registry::{BackendCapabilities, BackendRegistry};
pub use simulated::SimulatedBackend;

use async_trait::async_trait;
use std::collections::HashSet;
use url::Url;

use crate::models::{Backend, ProviderConfig, SearchResult, MAX_RESULTS_CEILING};

/// Interface implemented by every search backend adapter.
#[async_trait]
pub trait SearchBackend: Send + Sync + std::fmt::Debug {
    /// Which backend this adapter serves.
    fn backend(&self) -> Backend;

    /// Human-readable adapter name.
    fn name(&self) -> &str {
        self.backend().name()
    }

    /// What this adapter can report.
    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::SEARCH
    }

    /// Whether this adapter fabricates results instead of querying a live
    /// integration.
    fn is_simulated(&self) -> bool {
        self.capabilities().contains(BackendCapabilities::SIMULATED)
    }

    /// Execute one query. `Ok(vec![])` is a legitimate empty answer;
    /// errors signal a failed attempt and advance the dispatcher's
    /// fallback chain.
    async fn execute(
        &self,
        query: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<SearchResult>, BackendError>;
}

/// Errors an adapter can report.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Network or HTTP transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error status or payload.
    #[error("API error: {0}")]
    Api(String),

    /// The response could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// A required credential is absent. The only failure mode worth
    /// catching at startup rather than per call.
    #[error("missing credential: {0}")]
    MissingCredential(String),

    /// The request parameters were rejected before any network call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        BackendError::Parse(format!("JSON: {err}"))
    }
}

/// Shared normalization pass run by every adapter before returning.
///
/// Drops results whose URL is not an absolute http(s) URL with a hostname,
/// de-duplicates by URL (first occurrence wins, order preserved), stamps
/// the request language onto results without one, and truncates to the
/// configured maximum capped at [`MAX_RESULTS_CEILING`].
pub(crate) fn sanitize_results(
    results: Vec<SearchResult>,
    config: &ProviderConfig,
) -> Vec<SearchResult> {
    let limit = config.max_results.min(MAX_RESULTS_CEILING);
    let mut seen = HashSet::new();
    let mut sanitized = Vec::with_capacity(limit);

    for mut result in results {
        if !is_valid_result_url(&result.url) {
            tracing::debug!(url = %result.url, "dropping result with invalid URL");
            continue;
        }
        if !seen.insert(result.url.clone()) {
            continue;
        }
        if result.language.is_none() {
            result.language = config.language.clone();
        }
        sanitized.push(result);
        if sanitized.len() == limit {
            break;
        }
    }
    sanitized
}

fn is_valid_result_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}
