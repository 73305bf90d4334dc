//! Generic metasearch adapter (SearxNG-compatible JSON API).
//!
//! The workhorse backend: no credential required, and the fixed fallback
//! target of every other backend. Points at any SearxNG instance exposing
//! `?format=json`.

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{Backend, ContentType, ProviderConfig, ResultBuilder, SearchResult};
use crate::utils::HttpClient;

use super::{sanitize_results, BackendCapabilities, BackendError, SearchBackend};

/// SearxNG metasearch backend.
#[derive(Debug, Clone)]
pub struct MetasearchBackend {
    client: HttpClient,
    base_url: String,
}

impl MetasearchBackend {
    pub fn new(client: HttpClient, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchBackend for MetasearchBackend {
    fn backend(&self) -> Backend {
        Backend::Metasearch
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::SEARCH
            | BackendCapabilities::PUBLISHED_DATES
            | BackendCapabilities::RELEVANCE_SCORES
    }

    async fn execute(
        &self,
        query: &str,
        config: &ProviderConfig,
    ) -> Result<Vec<SearchResult>, BackendError> {
        let mut url = format!(
            "{}/search?q={}&format=json&pageno=1",
            self.base_url,
            urlencoding::encode(query)
        );
        if let Some(language) = &config.language {
            url.push_str(&format!("&language={}", urlencoding::encode(language)));
        }

        let response = self
            .client
            .client()
            .get(&url)
            .timeout(config.timeout)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("metasearch failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BackendError::Api(format!(
                "metasearch returned status {}",
                response.status()
            )));
        }

        let body: SearxResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(format!("metasearch response: {e}")))?;

        let results = body
            .results
            .into_iter()
            .map(|item| {
                let mut builder = ResultBuilder::new(item.title, item.url)
                    .source(item.engine.unwrap_or_else(|| "metasearch".to_string()))
                    .content_type(content_type_for(item.category.as_deref(), &item.file_format));
                if let Some(content) = item.content {
                    builder = builder.snippet(content);
                }
                if let Some(date) = item.published_date {
                    builder = builder.published_date(date);
                }
                if let Some(score) = item.score {
                    builder = builder.relevance_score(normalize_score(score));
                }
                if let Some(thumbnail) = item.thumbnail {
                    builder = builder.thumbnail_url(thumbnail);
                }
                builder.build()
            })
            .collect();

        Ok(sanitize_results(results, config))
    }
}

/// SearxNG scores are unbounded sums of per-engine weights; squash into
/// `0.0..=1.0` monotonically.
fn normalize_score(score: f32) -> f32 {
    let score = score.max(0.0);
    score / (score + 1.0)
}

fn content_type_for(category: Option<&str>, file_format: &Option<String>) -> ContentType {
    if file_format.as_deref().is_some_and(|f| f.eq_ignore_ascii_case("pdf")) {
        return ContentType::Pdf;
    }
    match category {
        Some("science") => ContentType::Paper,
        Some("news") => ContentType::Article,
        Some("videos") => ContentType::Video,
        Some("files") => ContentType::Pdf,
        _ => ContentType::Website,
    }
}

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxResult>,
}

#[derive(Debug, Deserialize)]
struct SearxResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    content: Option<String>,
    engine: Option<String>,
    category: Option<String>,
    score: Option<f32>,
    thumbnail: Option<String>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    file_format: Option<String>,
}
