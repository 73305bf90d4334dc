//! Source-credibility classification outcome.

use serde::{Deserialize, Serialize};

/// Credibility bucket assigned to a source domain.
///
/// Ordering matters to the façade only insofar as `Excluded` results are
/// dropped unconditionally; the remaining tiers are annotations the caller
/// may rank or filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTier {
    /// Academic domains, repositories, scholarly publishers.
    Tier1,
    /// Government, national statistics agencies, reputable news.
    Tier2,
    /// Generic organizational domains and anything unrecognized.
    Tier3,
    /// Social media, entertainment, forums, e-commerce, blog platforms.
    Excluded,
}

impl SourceTier {
    pub fn id(&self) -> &'static str {
        match self {
            SourceTier::Tier1 => "tier1",
            SourceTier::Tier2 => "tier2",
            SourceTier::Tier3 => "tier3",
            SourceTier::Excluded => "excluded",
        }
    }
}

impl std::fmt::Display for SourceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Classification outcome for one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuality {
    /// Credibility tier of the hostname.
    pub tier: SourceTier,

    /// Human-readable explanation of the match. Debug/audit only: nothing
    /// downstream parses this string.
    pub reasoning: String,
}

impl DomainQuality {
    pub fn new(tier: SourceTier, reasoning: impl Into<String>) -> Self {
        Self {
            tier,
            reasoning: reasoning.into(),
        }
    }

    /// Whether results with this quality are dropped by the façade.
    pub fn is_excluded(&self) -> bool {
        self.tier == SourceTier::Excluded
    }
}
