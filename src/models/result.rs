//! Normalized search result model.
//!
//! Every adapter maps its provider-specific wire format into [`SearchResult`]
//! so the rest of the engine never sees backend-shaped data. The serialized
//! form uses camelCase keys because it is handed verbatim to the tool-calling
//! agent.

use serde::{Deserialize, Serialize};

/// How the document can be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Freely readable. Backends that do not report access default here.
    #[default]
    Open,
    Subscription,
    Restricted,
}

/// Broad document category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Paper,
    Book,
    #[default]
    Website,
    Pdf,
    Video,
}

/// One discovered document or page, normalized across backends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Document title.
    pub title: String,

    /// Absolute URL. Unique key within a result batch; results whose URL
    /// fails to parse are dropped during normalization.
    pub url: String,

    /// Short excerpt or abstract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,

    /// Publication date, ISO-8601 (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Backend or publisher label. Simulated adapters stamp
    /// `simulated:<backend>` here so fabricated results are always
    /// distinguishable from live ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub citation_count: Option<u32>,

    #[serde(default)]
    pub access_type: AccessType,

    #[serde(default)]
    pub content_type: ContentType,

    /// ISO language code, stamped from the request when the backend does
    /// not report one natively.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,

    /// Backend-reported relevance in `0.0..=1.0`, where available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance_score: Option<f32>,
}

impl SearchResult {
    /// Create a result with the required fields; everything else defaults.
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            snippet: None,
            published_date: None,
            author: None,
            source: None,
            doi: None,
            citation_count: None,
            access_type: AccessType::default(),
            content_type: ContentType::default(),
            language: None,
            thumbnail_url: None,
            relevance_score: None,
        }
    }

    /// Lower-cased hostname of the result URL, if it parses.
    pub fn host(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
    }
}

/// Builder for [`SearchResult`], used by every adapter.
#[derive(Debug, Clone)]
pub struct ResultBuilder {
    result: SearchResult,
}

impl ResultBuilder {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            result: SearchResult::new(title, url),
        }
    }

    pub fn snippet(mut self, snippet: impl Into<String>) -> Self {
        self.result.snippet = Some(snippet.into());
        self
    }

    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.result.published_date = Some(date.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.result.author = Some(author.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.result.source = Some(source.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.result.doi = Some(doi.into());
        self
    }

    pub fn citation_count(mut self, count: u32) -> Self {
        self.result.citation_count = Some(count);
        self
    }

    pub fn access_type(mut self, access: AccessType) -> Self {
        self.result.access_type = access;
        self
    }

    pub fn content_type(mut self, content: ContentType) -> Self {
        self.result.content_type = content;
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.result.language = Some(language.into());
        self
    }

    pub fn thumbnail_url(mut self, url: impl Into<String>) -> Self {
        self.result.thumbnail_url = Some(url.into());
        self
    }

    pub fn relevance_score(mut self, score: f32) -> Self {
        self.result.relevance_score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn build(self) -> SearchResult {
        self.result
    }
}
