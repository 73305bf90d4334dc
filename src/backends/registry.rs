//! Registry wiring backend identifiers to adapter instances.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::models::Backend;
use crate::utils::HttpClient;

use super::{
    MetasearchBackend, NativeSearchBackend, OnlineSearchBackend, SearchBackend, SimulatedBackend,
};

bitflags::bitflags! {
    /// What an adapter can report about its results.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BackendCapabilities: u32 {
        const SEARCH = 1 << 0;
        /// Results carry publication dates.
        const PUBLISHED_DATES = 1 << 1;
        /// Results carry citation counts.
        const CITATION_COUNTS = 1 << 2;
        /// Results carry relevance scores.
        const RELEVANCE_SCORES = 1 << 3;
        /// Results are fabricated by the deterministic offline generator.
        const SIMULATED = 1 << 4;
    }
}

/// All registered backend adapters, keyed by [`Backend`].
///
/// One registry instance is built at engine construction and shared
/// read-only afterwards; tests swap in [`super::MockBackend`]s through
/// [`BackendRegistry::register`].
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<Backend, Arc<dyn SearchBackend>>,
}

impl BackendRegistry {
    /// An empty registry. Useful for tests that register mocks only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the production registry from configuration: live adapters for
    /// `native`, `online` and `metasearch`; simulated adapters for the
    /// national repositories when `dispatch.serve_simulated` is on.
    pub fn with_defaults(config: &EngineConfig, http: HttpClient) -> Self {
        let mut registry = Self::default();

        registry.register(Arc::new(NativeSearchBackend::new(
            http.clone(),
            config.api_keys.glm.clone(),
        )));
        registry.register(Arc::new(OnlineSearchBackend::new(
            http.clone(),
            config.api_keys.perplexity.clone(),
        )));
        registry.register(Arc::new(MetasearchBackend::new(
            http,
            config.metasearch.base_url.clone(),
        )));

        if config.dispatch.serve_simulated {
            registry.register(Arc::new(SimulatedBackend::new(Backend::Cnki)));
            registry.register(Arc::new(SimulatedBackend::new(Backend::Wanfang)));
        }

        registry
    }

    /// Register an adapter, replacing any previous one for its backend.
    pub fn register(&mut self, adapter: Arc<dyn SearchBackend>) {
        self.backends.insert(adapter.backend(), adapter);
    }

    pub fn get(&self, backend: Backend) -> Option<&Arc<dyn SearchBackend>> {
        self.backends.get(&backend)
    }

    pub fn has(&self, backend: Backend) -> bool {
        self.backends.contains_key(&backend)
    }

    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn SearchBackend>> {
        self.backends.values()
    }

    /// Backends served by the simulated generator.
    pub fn simulated(&self) -> Vec<Backend> {
        let mut simulated: Vec<_> = self
            .all()
            .filter(|adapter| adapter.is_simulated())
            .map(|adapter| adapter.backend())
            .collect();
        simulated.sort_by_key(|b| b.id());
        simulated
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
