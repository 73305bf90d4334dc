//! The search engine façade and its execution core.
//!
//! [`SearchEngine`] is the single entry point the tool layer depends on:
//! one `search` call runs the full pipeline (select → execute → classify →
//! filter → truncate) and always returns a [`SearchOutcome`], trading
//! result completeness for reliability.

mod dispatch;
mod limiter;

pub use dispatch::{Dispatcher, ERROR_BACKEND};
pub use limiter::{Clock, RateLimiter, SystemClock};

use tracing::debug;

use crate::backends::BackendRegistry;
use crate::config::EngineConfig;
use crate::models::{ProviderConfig, SearchOptions, SearchOutcome, SearchResult};
use crate::quality::{apply_filters, DomainClassifier};
use crate::utils::HttpClient;

/// The search aggregation and quality-filtering engine.
#[derive(Debug)]
pub struct SearchEngine {
    dispatcher: Dispatcher,
    classifier: DomainClassifier,
    timeout: std::time::Duration,
}

impl SearchEngine {
    /// Build the production engine: default registry wired from config.
    pub fn new(config: EngineConfig) -> Self {
        let registry = BackendRegistry::with_defaults(&config, HttpClient::new());
        Self::with_registry(config, registry)
    }

    /// Build an engine over a caller-supplied registry. Tests use this to
    /// swap in scripted backends.
    pub fn with_registry(config: EngineConfig, registry: BackendRegistry) -> Self {
        let limiter = RateLimiter::new(config.rate_limits.clone());
        let classifier = DomainClassifier::new(config.domains.clone());
        let timeout = config.dispatch.timeout();
        let dispatcher = Dispatcher::new(registry, limiter, config.dispatch);
        Self {
            dispatcher,
            classifier,
            timeout,
        }
    }

    pub fn classifier(&self) -> &DomainClassifier {
        &self.classifier
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn registry(&self) -> &BackendRegistry {
        self.dispatcher.registry()
    }

    /// Execute one search. Never returns an error: total failure is an
    /// empty outcome with `backend_used == "error"`.
    pub async fn search(&self, query: &str, options: SearchOptions) -> SearchOutcome {
        let requested = options.effective_max_results();

        // Fetch headroom: the exclusion pass and caller filters shrink the
        // batch, so ask the backend for more than the caller wants.
        let mut provider_config =
            ProviderConfig::new(requested.saturating_mul(2), self.timeout);
        provider_config.language = options.language.clone();
        provider_config.region = options.region.clone();

        let (raw, backend_used) = self
            .dispatcher
            .select_and_execute(
                query,
                &provider_config,
                options.text_provider.as_deref(),
                options.backend,
            )
            .await;

        // Hard policy, independent of caller filters: excluded sources
        // never reach the agent. Invalid URLs classify as excluded too.
        let classified: Vec<SearchResult> = raw
            .into_iter()
            .filter(|result| {
                let quality = self.classifier.classify(&result.url);
                if quality.is_excluded() {
                    debug!(url = %result.url, reasoning = %quality.reasoning, "dropping excluded result");
                    return false;
                }
                true
            })
            .collect();

        let filtered = apply_filters(classified, &options.filters, &self.classifier);
        let total_results = filtered.len();
        let results: Vec<SearchResult> = filtered.into_iter().take(requested).collect();

        debug!(
            query,
            backend = %backend_used,
            total_results,
            returned = results.len(),
            "search complete"
        );

        SearchOutcome {
            results,
            backend_used,
            query: query.to_string(),
            total_results,
        }
    }
}
