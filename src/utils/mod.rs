//! Shared utilities: HTTP client construction and CLI output formatting.

mod display;
mod http;

pub use display::{render_classification, render_outcome, OutputStyle};
pub use http::HttpClient;
