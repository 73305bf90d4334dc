//! Native-model web search adapter (GLM open platform).
//!
//! Uses the first-party web-search endpoint of the GLM platform, the
//! default backend when the active text provider is `glm`. Requires
//! `GLM_API_KEY`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{Backend, ContentType, ProviderConfig, ResultBuilder, SearchResult};
use crate::utils::HttpClient;

use super::{sanitize_results, BackendCapabilities, BackendError, SearchBackend};

const GLM_SEARCH_URL: &str = "https://open.bigmodel.cn/api/paas/v4/web_search";

/// GLM native web-search backend.
#[derive(Debug, Clone)]
pub struct NativeSearchBackend {
    client: HttpClient,
    api_key: Option<String>,
}

impl NativeSearchBackend {
    pub fn new(client: HttpClient, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchBackend for NativeSearchBackend {
    fn backend(&self) -> Backend {
        Backend::Native
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::SEARCH | BackendCapabilities::PUBLISHED_DATES
    }

    async fn execute(
        &self,
        query: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<SearchResult>, BackendError> {
        let Some(api_key) = &self.api_key else {
            return Err(BackendError::MissingCredential("GLM_API_KEY".to_string()));
        };

        let request = GlmSearchRequest {
            search_engine: "search_std",
            search_query: query,
            count: config.max_results,
        };

        let response = self
            .client
            .client()
            .post(GLM_SEARCH_URL)
            .bearer_auth(api_key)
            .timeout(config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("GLM web search failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!(
                "GLM web search returned status {status}: {text}"
            )));
        }

        let body: GlmSearchResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("GLM web search response: {e}")))?;

        let results = body
            .search_result
            .into_iter()
            .map(|item| {
                let mut builder = ResultBuilder::new(item.title, item.link)
                    .source(item.media.unwrap_or_else(|| "GLM Web Search".to_string()))
                    .content_type(ContentType::Website);
                if let Some(content) = item.content {
                    builder = builder.snippet(content);
                }
                if let Some(date) = item.publish_date {
                    builder = builder.published_date(date);
                }
                if let Some(icon) = item.icon {
                    builder = builder.thumbnail_url(icon);
                }
                builder.build()
            })
            .collect();

        Ok(sanitize_results(results, config))
    }
}

#[derive(Debug, Serialize)]
struct GlmSearchRequest<'a> {
    search_engine: &'a str,
    search_query: &'a str,
    count: usize,
}

#[derive(Debug, Deserialize)]
struct GlmSearchResponse {
    #[serde(default)]
    search_result: Vec<GlmSearchItem>,
}

#[derive(Debug, Deserialize)]
struct GlmSearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    content: Option<String>,
    media: Option<String>,
    publish_date: Option<String>,
    icon: Option<String>,
}
