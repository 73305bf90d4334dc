//! Result filter: a pure, order-preserving pass over a result batch.
//!
//! Each enabled dimension of [`SearchFilters`] removes non-conforming
//! results; dimensions are evaluated independently and conjunctively, so a
//! result must pass all of them. Missing optional fields pass numeric and
//! range checks: absence is not failure.

use url::Url;

use crate::models::{AccessType, SearchFilters, SearchResult};
use crate::quality::DomainClassifier;

/// Source labels that identify an academic repository even when the URL
/// alone does not (e.g. an aggregator page for a CNKI record).
const ACADEMIC_SOURCE_LABELS: &[&str] = &[
    "cnki", "wanfang", "arxiv", "pubmed", "scholar", "semantic", "crossref", "jstor", "springer",
    "ieee", "acm",
];

/// Terms in a title or snippet that indicate peer-reviewed material.
const PEER_REVIEW_INDICATORS: &[&str] = &[
    "journal",
    "proceedings",
    "doi:",
    "peer-reviewed",
    "peer reviewed",
    "transactions on",
    "conference on",
];

/// Apply a filter specification to a result batch.
///
/// Order-preserving and idempotent: filtering an already-filtered batch
/// with the same specification is a no-op.
pub fn apply_filters(
    results: Vec<SearchResult>,
    filters: &SearchFilters,
    classifier: &DomainClassifier,
) -> Vec<SearchResult> {
    if filters.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|result| passes(result, filters, classifier))
        .collect()
}

fn passes(result: &SearchResult, filters: &SearchFilters, classifier: &DomainClassifier) -> bool {
    let host = result.host().unwrap_or_default();

    if !filters.allowed_domains.is_empty()
        && !filters.allowed_domains.iter().any(|d| domain_matches(&host, d))
    {
        return false;
    }
    if filters.blocked_domains.iter().any(|d| domain_matches(&host, d)) {
        return false;
    }
    if !filters.file_types.is_empty() {
        let Some(extension) = url_extension(&result.url) else {
            return false;
        };
        if !filters
            .file_types
            .iter()
            .any(|t| t.trim_start_matches('.').eq_ignore_ascii_case(&extension))
        {
            return false;
        }
    }
    if filters.academic_only && !is_academic(result, classifier) {
        return false;
    }
    if filters.free_access_only && result.access_type != AccessType::Open {
        return false;
    }
    if filters.peer_reviewed_only && !is_peer_reviewed(result, classifier) {
        return false;
    }
    if let Some(minimum) = filters.minimum_citations {
        // Results without a citation count pass: absence is not failure.
        if let Some(count) = result.citation_count {
            if count < minimum {
                return false;
            }
        }
    }
    if let Some(minimum) = filters.minimum_relevance_score {
        if let Some(score) = result.relevance_score {
            if score < minimum {
                return false;
            }
        }
    }
    if !filters.languages.is_empty() {
        if let Some(language) = &result.language {
            if !filters.languages.iter().any(|l| l.eq_ignore_ascii_case(language)) {
                return false;
            }
        }
    }
    if let Some(range) = &filters.date_range {
        if let Some(date) = &result.published_date {
            if !range.contains(date) {
                return false;
            }
        }
    }
    if !filters.content_types.is_empty() && !filters.content_types.contains(&result.content_type) {
        return false;
    }
    true
}

/// A result is academic when its URL classifies tier-1, or its declared
/// source matches a known academic-repository label.
fn is_academic(result: &SearchResult, classifier: &DomainClassifier) -> bool {
    if classifier.is_academic(&result.url) {
        return true;
    }
    match &result.source {
        Some(source) => {
            let source = source.to_ascii_lowercase();
            ACADEMIC_SOURCE_LABELS.iter().any(|label| source.contains(label))
        }
        None => false,
    }
}

/// Peer-review heuristic: indicator terms in title/snippet, a present DOI,
/// or passing the academic test.
fn is_peer_reviewed(result: &SearchResult, classifier: &DomainClassifier) -> bool {
    if result.doi.is_some() || is_academic(result, classifier) {
        return true;
    }
    let mut text = result.title.to_ascii_lowercase();
    if let Some(snippet) = &result.snippet {
        text.push(' ');
        text.push_str(&snippet.to_ascii_lowercase());
    }
    PEER_REVIEW_INDICATORS.iter().any(|term| text.contains(term))
}

/// Caller-supplied domain entries are matched leniently: the entry, or any
/// host ending in `.entry`.
fn domain_matches(host: &str, entry: &str) -> bool {
    let entry = entry.trim().trim_start_matches('.').to_ascii_lowercase();
    if entry.is_empty() || host.is_empty() {
        return false;
    }
    host == entry || host.ends_with(&format!(".{entry}"))
}

/// Lower-cased extension of the URL path, if any.
fn url_extension(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path();
    let file = path.rsplit('/').next()?;
    let (_, extension) = file.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
