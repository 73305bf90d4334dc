//! The `web_search` tool boundary consumed by the agent framework.
//!
//! One operation, described by a JSON schema and executed through a
//! never-failing handler: whatever happens below, the agent receives a
//! well-formed result object, with `resultsCount: 0` on total failure.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::engine::{SearchEngine, ERROR_BACKEND};
use crate::models::{Backend, SearchOptions};

/// Tool name registered with the agent framework.
pub const WEB_SEARCH_TOOL: &str = "web_search";

/// Bounds on the caller-requested result count.
const MIN_TOOL_RESULTS: usize = 1;
const MAX_TOOL_RESULTS: usize = 10;
const DEFAULT_TOOL_RESULTS: usize = 8;

/// The `web_search` tool: schema plus handler over a shared engine.
#[derive(Debug, Clone)]
pub struct WebSearchTool {
    engine: Arc<SearchEngine>,
}

impl WebSearchTool {
    pub fn new(engine: Arc<SearchEngine>) -> Self {
        Self { engine }
    }

    pub fn name(&self) -> &'static str {
        WEB_SEARCH_TOOL
    }

    pub fn description(&self) -> &'static str {
        "Search the web for sources relevant to a query, ranked and filtered by source credibility"
    }

    /// JSON Schema for the tool arguments.
    pub fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query string"
                },
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "minimum": MIN_TOOL_RESULTS,
                    "maximum": MAX_TOOL_RESULTS,
                    "default": DEFAULT_TOOL_RESULTS
                },
                "provider": {
                    "type": "string",
                    "description": "Search backend to use",
                    "enum": Backend::ALL.iter().map(|b| b.id()).collect::<Vec<_>>(),
                    "default": Backend::Native.id()
                }
            },
            "required": ["query"]
        })
    }

    /// Execute the tool. Never fails: malformed arguments yield an empty
    /// result object, not an error.
    pub async fn execute(&self, args: Value) -> Value {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return json!({
                "results": [],
                "resultsCount": 0,
                "provider": ERROR_BACKEND,
                "query": "",
            });
        }

        let max_results = args
            .get("max_results")
            .and_then(Value::as_u64)
            .map(|n| (n as usize).clamp(MIN_TOOL_RESULTS, MAX_TOOL_RESULTS))
            .unwrap_or(DEFAULT_TOOL_RESULTS);

        let backend = args
            .get("provider")
            .and_then(Value::as_str)
            .and_then(Backend::parse)
            .unwrap_or(Backend::Native);

        let options = SearchOptions::new().max_results(max_results).backend(backend);
        let outcome = self.engine.search(query, options).await;

        json!({
            "results": outcome.results,
            "resultsCount": outcome.results.len(),
            "provider": outcome.backend_used,
            "query": outcome.query,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::make_result;
    use crate::backends::{BackendRegistry, MockBackend};
    use crate::config::EngineConfig;

    fn tool_with(registry: BackendRegistry) -> WebSearchTool {
        WebSearchTool::new(Arc::new(SearchEngine::with_registry(
            EngineConfig::default(),
            registry,
        )))
    }

    fn registry_returning(backend: Backend, count: usize) -> BackendRegistry {
        let batch: Vec<_> = (0..count)
            .map(|i| make_result(&format!("r{i}"), &format!("https://example.org/{i}")))
            .collect();
        let mut registry = BackendRegistry::empty();
        registry.register(Arc::new(MockBackend::returning(backend, batch)));
        registry
    }

    #[tokio::test]
    async fn test_defaults_to_native_and_eight_results() {
        let tool = tool_with(registry_returning(Backend::Native, 20));
        let response = tool.execute(json!({"query": "ai in education"})).await;

        assert_eq!(response["provider"], "native");
        assert_eq!(response["resultsCount"], 8);
        assert_eq!(response["query"], "ai in education");
    }

    #[tokio::test]
    async fn test_max_results_is_clamped() {
        let tool = tool_with(registry_returning(Backend::Native, 20));
        let response = tool
            .execute(json!({"query": "q", "max_results": 50}))
            .await;
        assert_eq!(response["resultsCount"], 10);
    }

    #[tokio::test]
    async fn test_missing_query_never_fails() {
        let tool = tool_with(registry_returning(Backend::Native, 3));
        let response = tool.execute(json!({})).await;

        assert_eq!(response["resultsCount"], 0);
        assert_eq!(response["provider"], ERROR_BACKEND);
    }

    #[tokio::test]
    async fn test_explicit_provider_is_honored() {
        let tool = tool_with(registry_returning(Backend::Metasearch, 2));
        let response = tool
            .execute(json!({"query": "q", "provider": "metasearch"}))
            .await;
        assert_eq!(response["provider"], "metasearch");
        assert_eq!(response["resultsCount"], 2);
    }

    #[test]
    fn test_schema_names_all_backends() {
        let tool = tool_with(BackendRegistry::empty());
        let schema = tool.input_schema();
        let enumerated = schema["properties"]["provider"]["enum"].as_array().unwrap();
        assert_eq!(enumerated.len(), Backend::ALL.len());
        assert_eq!(schema["required"][0], "query");
    }
}
