//! Per-call execution parameters, filter specification, and outcomes.

use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Backend, ContentType, SearchResult, MAX_RESULTS_CEILING};

/// Per-call execution parameters handed to an adapter.
///
/// Constructed fresh by the façade for every search; never shared or
/// mutated across calls.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Upper bound on results from the backend. Normalization additionally
    /// caps this at [`MAX_RESULTS_CEILING`].
    pub max_results: usize,

    /// Preferred result language (ISO code), stamped onto results that
    /// carry no native language.
    pub language: Option<String>,

    /// Regional hint for backends that support one.
    pub region: Option<String>,

    /// Bound on the adapter call. The dispatcher enforces it with
    /// `tokio::time::timeout`; exceeding it counts as a failed attempt.
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(max_results: usize, timeout: Duration) -> Self {
        Self {
            max_results: max_results.clamp(1, MAX_RESULTS_CEILING),
            language: None,
            region: None,
            timeout,
        }
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Inclusive publication-date window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Whether an ISO-8601 date string falls inside the window. Dates that
    /// fail to parse are treated as outside it; an unbounded side always
    /// passes.
    pub fn contains(&self, date: &str) -> bool {
        // Accept plain dates and date-times; only the date part matters.
        let prefix = date.get(..10).unwrap_or(date);
        let parsed = NaiveDate::parse_from_str(prefix, "%Y-%m-%d");
        let Ok(date) = parsed else {
            return false;
        };
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

/// Optional result-shaping specification.
///
/// Every field that is `None`/empty means "no constraint on this
/// dimension" - never "exclude everything". Enabled fields are evaluated
/// independently and conjunctively.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    /// Only keep results whose hostname matches one of these domains.
    pub allowed_domains: Vec<String>,

    /// Drop results whose hostname matches any of these domains.
    pub blocked_domains: Vec<String>,

    /// Only keep results whose URL path ends in one of these extensions
    /// (e.g. "pdf", "docx").
    pub file_types: Vec<String>,

    /// Only keep results from academic sources (tier-1 domains or known
    /// repository labels).
    pub academic_only: bool,

    /// Only keep results with open access.
    pub free_access_only: bool,

    /// Only keep results showing peer-review indicators.
    pub peer_reviewed_only: bool,

    /// Minimum citation count. Results without a count pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_citations: Option<u32>,

    /// Minimum backend-reported relevance in `0.0..=1.0`. Results without
    /// a score pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_relevance_score: Option<f32>,

    /// Only keep results in one of these languages. Results without a
    /// language pass.
    pub languages: Vec<String>,

    /// Only keep results published inside this window. Results without a
    /// date pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,

    /// Only keep results of one of these content types.
    pub content_types: Vec<ContentType>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no dimension is constrained, letting the filter pass be
    /// skipped entirely.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = domains;
        self
    }

    pub fn blocked_domains(mut self, domains: Vec<String>) -> Self {
        self.blocked_domains = domains;
        self
    }

    pub fn file_types(mut self, types: Vec<String>) -> Self {
        self.file_types = types;
        self
    }

    pub fn academic_only(mut self, enabled: bool) -> Self {
        self.academic_only = enabled;
        self
    }

    pub fn free_access_only(mut self, enabled: bool) -> Self {
        self.free_access_only = enabled;
        self
    }

    pub fn peer_reviewed_only(mut self, enabled: bool) -> Self {
        self.peer_reviewed_only = enabled;
        self
    }

    pub fn minimum_citations(mut self, count: u32) -> Self {
        self.minimum_citations = Some(count);
        self
    }

    pub fn minimum_relevance_score(mut self, score: f32) -> Self {
        self.minimum_relevance_score = Some(score.clamp(0.0, 1.0));
        self
    }

    pub fn languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn content_types(mut self, types: Vec<ContentType>) -> Self {
        self.content_types = types;
        self
    }
}

/// Caller-facing options for one façade search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Requested result count. Zero means "use the default" (8).
    pub max_results: usize,

    /// Explicit backend override. Takes precedence over the pairing table.
    pub backend: Option<Backend>,

    /// Identifier of the active text-generation provider, resolved to its
    /// paired default backend when no explicit override is given.
    pub text_provider: Option<String>,

    /// Preferred result language.
    pub language: Option<String>,

    /// Regional hint.
    pub region: Option<String>,

    /// Result-shaping filters applied after classification.
    pub filters: SearchFilters,
}

impl SearchOptions {
    pub const DEFAULT_MAX_RESULTS: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn text_provider(mut self, provider: impl Into<String>) -> Self {
        self.text_provider = Some(provider.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Effective requested count: the default when unset, never above the
    /// backend ceiling.
    pub fn effective_max_results(&self) -> usize {
        let requested = if self.max_results == 0 {
            Self::DEFAULT_MAX_RESULTS
        } else {
            self.max_results
        };
        requested.min(MAX_RESULTS_CEILING)
    }
}

/// What a façade search returns. Never an error: total failure is an empty
/// result set with `backend_used == "error"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,

    /// Id of the backend that actually produced the results, or `"error"`
    /// when every candidate in the fallback chain failed.
    pub backend_used: String,

    /// The query as executed.
    pub query: String,

    /// Count of results that survived classification and filtering, before
    /// truncation to the requested size.
    pub total_results: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_clamps_max_results() {
        let config = ProviderConfig::new(500, Duration::from_secs(5));
        assert_eq!(config.max_results, MAX_RESULTS_CEILING);

        let config = ProviderConfig::new(0, Duration::from_secs(5));
        assert_eq!(config.max_results, 1);
    }

    #[test]
    fn test_date_range_contains() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2020, 1, 1),
            NaiveDate::from_ymd_opt(2022, 12, 31),
        );
        assert!(range.contains("2021-06-15"));
        assert!(range.contains("2020-01-01"));
        assert!(!range.contains("2019-12-31"));
        assert!(!range.contains("2023-01-01"));
        assert!(!range.contains("garbage"));
    }

    #[test]
    fn test_date_range_accepts_datetimes() {
        let range = DateRange::new(NaiveDate::from_ymd_opt(2020, 1, 1), None);
        assert!(range.contains("2024-03-01T12:30:00Z"));
    }

    #[test]
    fn test_open_ended_date_range() {
        let range = DateRange::default();
        assert!(range.contains("1999-01-01"));
    }

    #[test]
    fn test_empty_filters() {
        assert!(SearchFilters::new().is_empty());
        assert!(!SearchFilters::new().academic_only(true).is_empty());
    }

    #[test]
    fn test_effective_max_results() {
        assert_eq!(SearchOptions::new().effective_max_results(), 8);
        assert_eq!(SearchOptions::new().max_results(3).effective_max_results(), 3);
        assert_eq!(SearchOptions::new().max_results(99).effective_max_results(), MAX_RESULTS_CEILING);
    }
}
