//! Source-credibility classification and result filtering.
//!
//! Both halves of this module are pure: [`DomainClassifier`] maps hostnames
//! onto credibility tiers using immutable curated lists, and
//! [`apply_filters`] shapes a result batch against a caller-supplied
//! [`crate::models::SearchFilters`]. Neither performs I/O or holds mutable
//! state, so the façade can call them on any number of concurrent searches.

mod classifier;
mod filter;

pub use classifier::{DomainClassifier, DomainLists};
pub use filter::apply_filters;
