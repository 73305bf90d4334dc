//! Core data structures shared across the engine.
//!
//! Everything in here is call-local and immutable once constructed: the
//! façade builds a fresh [`ProviderConfig`] per search, adapters produce
//! [`SearchResult`] batches, and the quality layer annotates them with
//! [`DomainQuality`]. The only process-wide mutable state in the crate lives
//! in the rate limiter, not in these models.

mod backend;
mod quality;
mod query;
mod result;

pub use backend::Backend;
pub use quality::{DomainQuality, SourceTier};
pub use query::{DateRange, ProviderConfig, SearchFilters, SearchOptions, SearchOutcome};
pub use result::{AccessType, ContentType, ResultBuilder, SearchResult};

/// Hard ceiling on results per backend call, regardless of what the caller
/// requested. Backends enforce it during normalization; the façade never
/// asks for more.
pub const MAX_RESULTS_CEILING: usize = 20;
