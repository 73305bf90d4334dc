//! Engine configuration.
//!
//! All policy that the original system kept in editable global collections
//! (provider pairings, credibility lists, quotas) lives here as immutable
//! data: loaded once at process start, then passed by reference into the
//! dispatcher and classifier. Updating a list means editing the config and
//! redeploying; nothing mutates at runtime.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::Backend;
use crate::quality::DomainLists;

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// API keys for live backends.
    pub api_keys: ApiKeys,

    /// Metasearch instance settings.
    pub metasearch: MetasearchConfig,

    /// Per-backend rate-limit quotas.
    pub rate_limits: RateLimitConfig,

    /// Selection, pairing and fallback policy.
    pub dispatch: DispatchConfig,

    /// Credibility lists for the domain classifier.
    pub domains: DomainLists,
}

/// API keys for external services, seeded from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// GLM open-platform key for the native web-search backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glm: Option<String>,

    /// Perplexity key for the online-suffix backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perplexity: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            glm: std::env::var("GLM_API_KEY").ok(),
            perplexity: std::env::var("PERPLEXITY_API_KEY").ok(),
        }
    }
}

/// Settings for the SearxNG-compatible metasearch backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetasearchConfig {
    /// Base URL of the instance, without a trailing slash.
    #[serde(default = "default_metasearch_url")]
    pub base_url: String,
}

impl Default for MetasearchConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("SEARXNG_URL").unwrap_or_else(|_| default_metasearch_url()),
        }
    }
}

fn default_metasearch_url() -> String {
    "https://searx.be".to_string()
}

/// Per-backend fixed-window quotas.
///
/// First-party backends get generous quotas, third-party academic
/// repositories conservative ones, metasearch something in between.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window length in seconds.
    pub window_secs: u64,
    pub native: u32,
    pub online: u32,
    pub cnki: u32,
    pub wanfang: u32,
    pub metasearch: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: 60,
            native: 120,
            online: 60,
            cnki: 20,
            wanfang: 20,
            metasearch: 60,
        }
    }
}

impl RateLimitConfig {
    /// Calls allowed per window for a backend.
    pub fn quota(&self, backend: Backend) -> u32 {
        match backend {
            Backend::Native => self.native,
            Backend::Online => self.online,
            Backend::Cnki => self.cnki,
            Backend::Wanfang => self.wanfang,
            Backend::Metasearch => self.metasearch,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// Backend selection, text-provider pairing, and fallback policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Adapter call budget in milliseconds.
    pub timeout_ms: u64,

    /// Whether the simulated adapters for backends without a live
    /// integration are registered. Deployment-time choice.
    pub serve_simulated: bool,

    /// Active text-generation provider -> default search backend id.
    pub pairings: HashMap<String, String>,

    /// Backend id -> ordered fallback candidates. Backends without an
    /// entry fall back to the metasearch chain.
    pub fallbacks: HashMap<String, Vec<String>>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        let pairings = [
            ("glm", "native"),
            ("perplexity", "online"),
            ("qwen", "cnki"),
            ("moonshot", "wanfang"),
            ("deepseek", "metasearch"),
        ]
        .into_iter()
        .map(|(provider, backend)| (provider.to_string(), backend.to_string()))
        .collect();

        // Two-hop default: every backend falls back to metasearch, which
        // itself has nowhere left to go.
        let fallbacks = Backend::ALL
            .into_iter()
            .map(|backend| {
                let chain = if backend == Backend::Metasearch {
                    Vec::new()
                } else {
                    vec![Backend::Metasearch.id().to_string()]
                };
                (backend.id().to_string(), chain)
            })
            .collect();

        Self {
            timeout_ms: 10_000,
            serve_simulated: true,
            pairings,
            fallbacks,
        }
    }
}

impl DispatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Default search backend paired with a text-generation provider.
    /// Unknown providers get no pairing; the dispatcher then falls back to
    /// metasearch.
    pub fn paired_backend(&self, provider: &str) -> Option<Backend> {
        self.pairings
            .get(&provider.trim().to_ascii_lowercase())
            .and_then(|id| Backend::parse(id))
    }

    /// Ordered fallback candidates for a backend. Ids that do not parse
    /// are skipped.
    pub fn fallback_chain(&self, backend: Backend) -> Vec<Backend> {
        match self.fallbacks.get(backend.id()) {
            Some(chain) => chain.iter().filter_map(|id| Backend::parse(id)).collect(),
            None if backend == Backend::Metasearch => Vec::new(),
            None => vec![Backend::Metasearch],
        }
    }
}

/// Locate the user config file, if one exists.
pub fn find_config_file() -> Option<PathBuf> {
    let candidate = dirs::config_dir()?.join("litscout").join("config.toml");
    candidate.exists().then_some(candidate)
}

/// Load configuration from a TOML file plus `LITSCOUT_`-prefixed
/// environment overrides.
pub fn load_config(path: &PathBuf) -> Result<EngineConfig, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path.as_path()))
        .add_source(config::Environment::with_prefix("LITSCOUT").separator("__"))
        .build()?;

    settings.try_deserialize()
}

/// Default configuration (environment-seeded keys, built-in lists).
pub fn get_config() -> EngineConfig {
    EngineConfig::default()
}
