//! Company page fetching and text extraction.
//!
//! This crate provides:
//! - [`engine`]: [`ContextFetcher`], a single-page fetcher with a bounded timeout
//! - [`extract`]: visible-text extraction from paragraph and heading elements

pub mod engine;
pub mod extract;

pub use engine::{ContextFetcher, ScrapeOutcome};
pub use extract::extract_visible_text;
