//! Backend identifiers for the search sources the engine can dispatch to.

use serde::{Deserialize, Serialize};

/// One external search data source.
///
/// The set is closed: the dispatcher, rate limiter, and registry are all
/// keyed by this enum so a typo'd backend id cannot reach the execution
/// path. String ids (used in config files, tool arguments, and the
/// `backend_used` field of an outcome) are stable and lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// First-party web search built into the GLM platform.
    Native,
    /// Perplexity "sonar" online-suffix model search.
    Online,
    /// CNKI national academic repository.
    Cnki,
    /// Wanfang Data national academic repository.
    Wanfang,
    /// Generic SearxNG-compatible metasearch instance. Also the fixed
    /// fallback target of every other backend.
    Metasearch,
}

impl Backend {
    /// All dispatchable backends, in default registration order.
    pub const ALL: [Backend; 5] = [
        Backend::Native,
        Backend::Online,
        Backend::Cnki,
        Backend::Wanfang,
        Backend::Metasearch,
    ];

    /// Stable identifier used in config, tool arguments and outcomes.
    pub fn id(&self) -> &'static str {
        match self {
            Backend::Native => "native",
            Backend::Online => "online",
            Backend::Cnki => "cnki",
            Backend::Wanfang => "wanfang",
            Backend::Metasearch => "metasearch",
        }
    }

    /// Human-readable name for logs and CLI output.
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Native => "GLM Web Search",
            Backend::Online => "Perplexity Sonar",
            Backend::Cnki => "CNKI",
            Backend::Wanfang => "Wanfang Data",
            Backend::Metasearch => "Metasearch",
        }
    }

    /// Parse a backend id. Case-insensitive; returns `None` for unknown ids
    /// so callers can apply their own fallback policy.
    pub fn parse(id: &str) -> Option<Backend> {
        match id.trim().to_ascii_lowercase().as_str() {
            "native" => Some(Backend::Native),
            "online" => Some(Backend::Online),
            "cnki" => Some(Backend::Cnki),
            "wanfang" => Some(Backend::Wanfang),
            "metasearch" => Some(Backend::Metasearch),
            _ => None,
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
