//! Scriptable backend for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::models::{Backend, ProviderConfig, ResultBuilder, SearchResult};

use super::{BackendCapabilities, BackendError, SearchBackend};

#[derive(Debug, Clone)]
enum Behavior {
    Return(Vec<SearchResult>),
    Fail(String),
    Hang(Duration),
}

/// A backend with scripted behavior: canned results, failure, or a hang
/// that outlives the dispatcher timeout. Counts how often it was called so
/// tests can assert the dispatcher never retries a backend within a call.
#[derive(Debug)]
pub struct MockBackend {
    backend: Backend,
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockBackend {
    /// Always returns the given results.
    pub fn returning(backend: Backend, results: Vec<SearchResult>) -> Self {
        Self {
            backend,
            behavior: Behavior::Return(results),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fails with an API error.
    pub fn failing(backend: Backend) -> Self {
        Self {
            backend,
            behavior: Behavior::Fail("scripted failure".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleeps for the given duration before answering, for timeout tests.
    pub fn hanging(backend: Backend, delay: Duration) -> Self {
        Self {
            backend,
            behavior: Behavior::Hang(delay),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `execute` was invoked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchBackend for MockBackend {
    fn backend(&self) -> Backend {
        self.backend
    }

    fn name(&self) -> &str {
        "Mock"
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::SEARCH
    }

    async fn execute(
        &self,
        _query: &str,
        _config: &ProviderConfig,
    ) -> Result<Vec<SearchResult>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Return(results) => Ok(results.clone()),
            Behavior::Fail(message) => Err(BackendError::Api(message.clone())),
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(Vec::new())
            }
        }
    }
}

/// Build a minimal result for test fixtures.
pub fn make_result(title: &str, url: &str) -> SearchResult {
    ResultBuilder::new(title, url).build()
}
