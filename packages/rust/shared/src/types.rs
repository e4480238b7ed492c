//! Core domain types for founderlens runs.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Companies
// ---------------------------------------------------------------------------

/// A company parsed from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name (trimmed). Unique within a run.
    pub name: String,
    /// Company website (trimmed, `http://` or `https://`).
    pub url: String,
}

impl CompanyRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Company name → URL, in first-seen order. A repeated name overwrites the URL in place.
pub type CompanyList = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Founder names for one company, deduplicated, first-occurrence order.
pub type FounderList = Vec<String>;

/// Company name → founders. Every parsed company has a key; no founders is an empty list.
pub type ResultMapping = IndexMap<String, FounderList>;

/// Per-run counters. Logged and printed, never written to the results file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Companies processed.
    pub companies: usize,
    /// Companies whose prompt carried a scraped context snippet.
    pub with_context: usize,
    /// Page fetches that failed (network, status, body).
    pub scrape_failures: usize,
    /// Model calls that failed.
    pub model_failures: usize,
    /// Replies that parsed as a JSON array.
    pub structured: usize,
    /// Replies that parsed as JSON but not as an array.
    pub malformed: usize,
    /// Replies that were not JSON and went through the name scan.
    pub unparseable: usize,
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} companies ({} with context), {} scrape failures, {} model failures, \
             replies: {} structured / {} malformed / {} unparseable",
            self.companies,
            self.with_context,
            self.scrape_failures,
            self.model_failures,
            self.structured,
            self.malformed,
            self.unparseable,
        )
    }
}
