//! Online-suffix model search adapter (Perplexity sonar).
//!
//! Issues a single chat completion against an online model and normalizes
//! the `search_results` the API attaches to the answer. The generated
//! answer text itself is discarded; only the sources matter here. Requires
//! `PERPLEXITY_API_KEY`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::models::{Backend, ContentType, ProviderConfig, ResultBuilder, SearchResult};
use crate::utils::HttpClient;

use super::{sanitize_results, BackendCapabilities, BackendError, SearchBackend};

const SONAR_URL: &str = "https://api.perplexity.ai/chat/completions";
const SONAR_MODEL: &str = "sonar";

/// Perplexity online-model search backend.
#[derive(Debug, Clone)]
pub struct OnlineSearchBackend {
    client: HttpClient,
    api_key: Option<String>,
}

impl OnlineSearchBackend {
    pub fn new(client: HttpClient, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl SearchBackend for OnlineSearchBackend {
    fn backend(&self) -> Backend {
        Backend::Online
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
            return Err(BackendError::MissingCredential(
                "PERPLEXITY_API_KEY".to_string(),
            ));
        };

        let body = json!({
            "model": SONAR_MODEL,
            "messages": [{"role": "user", "content": query}],
            "max_tokens": 256,
        });

        let response = self
            .client
            .client()
            .post(SONAR_URL)
            .bearer_auth(api_key)
            .timeout(config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("sonar search failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Api(format!(
                "sonar returned status {status}: {text}"
            )));
        }

        let body: SonarResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("sonar response: {e}")))?;

        let results = body
            .search_results
            .into_iter()
            .map(|item| {
                let mut builder = ResultBuilder::new(item.title, item.url)
                    .source("Perplexity Sonar")
                    .content_type(ContentType::Website);
                if let Some(date) = item.date {
                    builder = builder.published_date(date);
                }
                if let Some(snippet) = item.snippet {
                    builder = builder.snippet(snippet);
                }
                builder.build()
            })
            .collect();

        Ok(sanitize_results(results, config))
    }
}

#[derive(Debug, Deserialize)]
struct SonarResponse {
    #[serde(default)]
    search_results: Vec<SonarSearchResult>,
}

#[derive(Debug, Deserialize)]
struct SonarSearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    date: Option<String>,
    snippet: Option<String>,
}
