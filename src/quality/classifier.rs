//! Domain credibility classifier.
//!
//! Maps a result URL onto a [`SourceTier`] using curated domain lists.
//! Classification is a pure function of the hostname: identical hostnames
//! always yield identical tiers within one loaded configuration. List
//! updates take effect on redeploy, never at runtime.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::{DomainQuality, SourceTier};

/// Curated domain lists driving classification.
///
/// Entries are either bare domains (`"nature.com"`, matched against the
/// host and any subdomain of it) or dotted suffixes (`".edu"`, matched at
/// a label boundary anywhere in the host, so `mit.edu` and
/// `tsinghua.edu.cn` both qualify while `education.com` does not).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainLists {
    /// Always wins, even when the host also matches an academic pattern.
    pub excluded: Vec<String>,

    /// Academic suffixes, repositories, scholarly publishers and indexes.
    pub tier1: Vec<String>,

    /// Government suffixes, statistics agencies, reputable news outlets.
    pub tier2: Vec<String>,
}

fn strings(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

impl Default for DomainLists {
    fn default() -> Self {
        Self {
            excluded: strings(&[
                // social media
                "facebook.com",
                "twitter.com",
                "x.com",
                "instagram.com",
                "tiktok.com",
                "douyin.com",
                "weibo.com",
                "linkedin.com",
                "pinterest.com",
                // entertainment / video / audio platforms
                "youtube.com",
                "bilibili.com",
                "twitch.tv",
                "netflix.com",
                "spotify.com",
                "soundcloud.com",
                // discussion forums and Q&A
                "reddit.com",
                "quora.com",
                "zhihu.com",
                "tieba.baidu.com",
                "stackexchange.com",
                // general encyclopedia
                "wikipedia.org",
                // e-commerce
                "amazon.com",
                "ebay.com",
                "taobao.com",
                "jd.com",
                "pinduoduo.com",
                // personal-blog platforms
                "medium.com",
                "blogspot.com",
                "wordpress.com",
                "tumblr.com",
                "substack.com",
                "jianshu.com",
                "csdn.net",
            ]),
            tier1: strings(&[
                // academic domain suffixes
                ".edu",
                ".ac.",
                // repositories and indexes
                "arxiv.org",
                "biorxiv.org",
                "medrxiv.org",
                "ncbi.nlm.nih.gov",
                "semanticscholar.org",
                "scholar.google.com",
                "ssrn.com",
                "researchgate.net",
                "doi.org",
                "cnki.net",
                "wanfangdata.com.cn",
                "cqvip.com",
                // scholarly publishers
                "springer.com",
                "sciencedirect.com",
                "elsevier.com",
                "wiley.com",
                "ieee.org",
                "acm.org",
                "nature.com",
                "science.org",
                "jstor.org",
                "tandfonline.com",
                "sagepub.com",
                "plos.org",
                "mdpi.com",
                "frontiersin.org",
                "cambridge.org",
                "oup.com",
            ]),
            tier2: strings(&[
                // government domain suffixes
                ".gov",
                ".mil",
                // statistics agencies and intergovernmental bodies
                "stats.gov.cn",
                "census.gov",
                "ons.gov.uk",
                "destatis.de",
                "who.int",
                "un.org",
                "oecd.org",
                "worldbank.org",
                "imf.org",
                "europa.eu",
                // reputable news outlets
                "reuters.com",
                "apnews.com",
                "bbc.com",
                "bbc.co.uk",
                "nytimes.com",
                "theguardian.com",
                "economist.com",
                "ft.com",
                "wsj.com",
                "bloomberg.com",
                "npr.org",
                "xinhuanet.com",
                "people.com.cn",
            ]),
        }
    }
}

/// Pure hostname-to-tier classifier over immutable [`DomainLists`].
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    lists: DomainLists,
}

impl DomainClassifier {
    pub fn new(lists: DomainLists) -> Self {
        Self { lists }
    }

    /// Classify a URL into a credibility tier. Never fails: anything that
    /// does not parse as an absolute http(s) URL with a hostname is
    /// `excluded` with an "invalid URL" reasoning.
    ///
    /// Checks run in priority order and the first match wins; the exclusion
    /// list beats an academic match for the same host.
    pub fn classify(&self, url: &str) -> DomainQuality {
        let Some(host) = parse_host(url) else {
            return DomainQuality::new(SourceTier::Excluded, "invalid URL");
        };

        if let Some(entry) = first_match(&host, &self.lists.excluded) {
            return DomainQuality::new(
                SourceTier::Excluded,
                format!("excluded source ({entry})"),
            );
        }
        if let Some(entry) = first_match(&host, &self.lists.tier1) {
            return DomainQuality::new(SourceTier::Tier1, format!("academic source ({entry})"));
        }
        if let Some(entry) = first_match(&host, &self.lists.tier2) {
            return DomainQuality::new(
                SourceTier::Tier2,
                format!("government or reputable news source ({entry})"),
            );
        }
        DomainQuality::new(SourceTier::Tier3, "unrecognized domain")
    }

    /// Whether a URL matches the tier-1 academic patterns (and is not
    /// excluded). Used by the `academic_only` result filter.
    pub fn is_academic(&self, url: &str) -> bool {
        self.classify(url).tier == SourceTier::Tier1
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new(DomainLists::default())
    }
}

/// Lower-cased hostname of an absolute http(s) URL.
fn parse_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// First list entry the host matches, in list order.
fn first_match<'a>(host: &str, entries: &'a [String]) -> Option<&'a str> {
    entries
        .iter()
        .map(String::as_str)
        .find(|entry| host_matches(host, entry))
}

/// Suffix/label matching. A leading dot marks a suffix pattern (`".edu"`,
/// `".ac."`) matched at a label boundary anywhere in the host; a bare
/// domain matches itself and its subdomains.
fn host_matches(host: &str, entry: &str) -> bool {
    let entry = entry.trim().to_ascii_lowercase();
    if entry.is_empty() {
        return false;
    }
    if entry.starts_with('.') {
        if entry.ends_with('.') {
            // infix suffix like ".ac." (ac.uk, ac.jp, ac.cn, ...)
            return host.contains(&entry);
        }
        return host.ends_with(&entry) || host.contains(&format!("{entry}."));
    }
    host == entry || host.ends_with(&format!(".{entry}"))
}
