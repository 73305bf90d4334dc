//! Provider dispatcher: backend selection, rate limiting, fallback.
//!
//! The dispatcher is the component that guarantees the agent-facing tool
//! call always completes: every failure mode of a backend attempt -
//! quota denial, adapter error, timeout, unregistered adapter - advances
//! a data-driven fallback chain, and exhausting the chain yields an empty
//! result set labelled `"error"` rather than an error value.

use tracing::{debug, warn};

use crate::backends::BackendRegistry;
use crate::config::DispatchConfig;
use crate::models::{Backend, ProviderConfig, SearchResult};

use super::limiter::RateLimiter;

/// Backend label reported when every candidate failed.
pub const ERROR_BACKEND: &str = "error";

/// Selects a backend, executes through the rate limiter, and walks the
/// fallback chain on failure.
#[derive(Debug)]
pub struct Dispatcher {
    registry: BackendRegistry,
    limiter: RateLimiter,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(registry: BackendRegistry, limiter: RateLimiter, config: DispatchConfig) -> Self {
        Self {
            registry,
            limiter,
            config,
        }
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Selection policy: explicit override, else the backend paired with
    /// the active text provider, else metasearch.
    pub fn select_backend(
        &self,
        active_text_provider: Option<&str>,
        explicit: Option<Backend>,
    ) -> Backend {
        explicit
            .or_else(|| {
                active_text_provider.and_then(|provider| self.config.paired_backend(provider))
            })
            .unwrap_or(Backend::Metasearch)
    }

    /// Execute a query against the selected backend, falling back through
    /// the configured chain. Each backend is attempted at most once per
    /// call; there is no retry-with-backoff. Returns the results and the
    /// id of the backend that produced them, or `(vec![], "error")` when
    /// every candidate failed.
    pub async fn select_and_execute(
        &self,
        query: &str,
        config: &ProviderConfig,
        active_text_provider: Option<&str>,
        explicit: Option<Backend>,
    ) -> (Vec<SearchResult>, String) {
        let selected = self.select_backend(active_text_provider, explicit);

        let mut candidates = vec![selected];
        for fallback in self.config.fallback_chain(selected) {
            if !candidates.contains(&fallback) {
                candidates.push(fallback);
            }
        }

        for backend in candidates {
            let Some(adapter) = self.registry.get(backend) else {
                debug!(backend = %backend, "backend not registered, advancing");
                continue;
            };
            if !self.limiter.check_and_increment(backend) {
                warn!(backend = %backend, "rate limit exceeded, advancing");
                continue;
            }

            match tokio::time::timeout(config.timeout, adapter.execute(query, config)).await {
                Ok(Ok(results)) => {
                    debug!(backend = %backend, count = results.len(), "backend answered");
                    return (results, backend.id().to_string());
                }
                Ok(Err(err)) => {
                    warn!(backend = %backend, error = %err, "backend failed, advancing");
                }
                Err(_) => {
                    warn!(backend = %backend, timeout_ms = config.timeout.as_millis() as u64, "backend timed out, advancing");
                }
            }
        }

        (Vec::new(), ERROR_BACKEND.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::make_result;
    use crate::backends::MockBackend;
    use crate::config::RateLimitConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn provider_config() -> ProviderConfig {
        ProviderConfig::new(10, Duration::from_secs(1))
    }

    fn dispatcher(registry: BackendRegistry) -> Dispatcher {
        Dispatcher::new(
            registry,
            RateLimiter::new(RateLimitConfig::default()),
            DispatchConfig::default(),
        )
    }

    #[test]
    fn test_selection_policy() {
        let dispatcher = dispatcher(BackendRegistry::empty());

        // explicit override wins
        assert_eq!(
            dispatcher.select_backend(Some("glm"), Some(Backend::Wanfang)),
            Backend::Wanfang
        );
        // pairing table next
        assert_eq!(dispatcher.select_backend(Some("glm"), None), Backend::Native);
        assert_eq!(dispatcher.select_backend(Some("qwen"), None), Backend::Cnki);
        // unknown provider and no override fall back to metasearch
        assert_eq!(dispatcher.select_backend(Some("claude"), None), Backend::Metasearch);
        assert_eq!(dispatcher.select_backend(None, None), Backend::Metasearch);
    }

    #[tokio::test]
    async fn test_fallback_on_adapter_failure() {
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::failing(Backend::Native)));
        registry.register(Arc::new(MockBackend::returning(
            Backend::Metasearch,
            vec![
                make_result("a", "https://example.org/a"),
                make_result("b", "https://example.org/b"),
            ],
        )));

        let dispatcher = dispatcher(registry);
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Native))
            .await;

        assert_eq!(results.len(), 2);
        assert_eq!(backend_used, "metasearch");
    }

    #[tokio::test]
    async fn test_failed_backend_is_not_retried_within_a_call() {
        let failing = Arc::new(MockBackend::failing(Backend::Native));
        let mut registry = BackendRegistry::empty();
        registry.register(failing.clone());
        registry.register(Arc::new(MockBackend::returning(Backend::Metasearch, vec![])));

        let dispatcher = dispatcher(registry);
        dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Native))
            .await;

        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_rate_limit_denial_advances_chain() {
        let native = Arc::new(MockBackend::returning(
            Backend::Native,
            vec![make_result("native", "https://example.org/native")],
        ));
        let mut registry = BackendRegistry::empty();
        registry.register(native.clone());
        registry.register(Arc::new(MockBackend::returning(
            Backend::Metasearch,
            vec![make_result("meta", "https://example.org/meta")],
        )));

        let limits = RateLimitConfig {
            native: 1,
            ..RateLimitConfig::default()
        };
        let limiter = RateLimiter::new(limits);
        // Consume the native quota before dispatching.
        assert!(limiter.check_and_increment(Backend::Native));

        let dispatcher = Dispatcher::new(registry, limiter, DispatchConfig::default());
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Native))
            .await;

        assert_eq!(backend_used, "metasearch");
        assert_eq!(results[0].title, "meta");
        // The denied adapter was never invoked.
        assert_eq!(native.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_advances_chain() {
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::hanging(
            Backend::Online,
            Duration::from_secs(300),
        )));
        registry.register(Arc::new(MockBackend::returning(
            Backend::Metasearch,
            vec![make_result("meta", "https://example.org/meta")],
        )));

        let dispatcher = dispatcher(registry);
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Online))
            .await;

        assert_eq!(backend_used, "metasearch");
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_all_candidates_exhausted_yields_error_label() {
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::failing(Backend::Native)));
        registry.register(Arc::new(MockBackend::failing(Backend::Metasearch)));

        let dispatcher = dispatcher(registry);
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Native))
            .await;

        assert!(results.is_empty());
        assert_eq!(backend_used, ERROR_BACKEND);
    }

    #[tokio::test]
    async fn test_metasearch_has_no_fallback() {
        let failing = Arc::new(MockBackend::failing(Backend::Metasearch));
        let mut registry = BackendRegistry::empty();
        registry.register(failing.clone());

        let dispatcher = dispatcher(registry);
        let (_, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, None)
            .await;

        assert_eq!(backend_used, ERROR_BACKEND);
        assert_eq!(failing.calls(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_backend_advances_chain() {
        // Only metasearch is registered; dispatch to cnki must land there.
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::returning(
            Backend::Metasearch,
            vec![make_result("meta", "https://example.org/meta")],
        )));

        let dispatcher = dispatcher(registry);
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Cnki))
            .await;

        assert_eq!(backend_used, "metasearch");
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_success_does_not_advance() {
        // An empty answer is a legitimate result, not a failure.
        let metasearch = Arc::new(MockBackend::returning(
            Backend::Metasearch,
            vec![make_result("meta", "https://example.org/meta")],
        ));
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::returning(Backend::Native, vec![])));
        registry.register(metasearch.clone());

        let dispatcher = dispatcher(registry);
        let (results, backend_used) = dispatcher
            .select_and_execute("q", &provider_config(), None, Some(Backend::Native))
            .await;

        assert!(results.is_empty());
        assert_eq!(backend_used, "native");
        assert_eq!(metasearch.calls(), 0);
    }
}
