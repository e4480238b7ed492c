//! Single-page context fetcher.
//!
//! Fetches a company's listed URL once, with a bounded timeout, and reduces
//! the page to a short plain-text snippet. Failures never propagate: they
//! come back as [`ScrapeOutcome::Failed`] so the caller can fall back to the
//! no-context prompt and still count the miss.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::Url;

use founderlens_shared::{FounderLensError, Result, ScrapeConfig};

use crate::extract::extract_visible_text;

/// User-Agent string for page requests.
const USER_AGENT: &str = concat!("founderlens/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// ScrapeOutcome
// ---------------------------------------------------------------------------

/// Result of fetching one company page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Non-empty text snippet, within the character budget.
    Snippet(String),
    /// The page loaded but had no paragraph or heading text.
    Empty,
    /// The fetch failed (bad URL, timeout, DNS, non-2xx, body read).
    Failed(String),
}

impl ScrapeOutcome {
    /// The context snippet, if any.
    pub fn into_context(self) -> Option<String> {
        match self {
            Self::Snippet(text) => Some(text),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

// ---------------------------------------------------------------------------
// ContextFetcher
// ---------------------------------------------------------------------------

/// Fetches company pages and extracts a bounded text snippet.
#[derive(Debug, Clone)]
pub struct ContextFetcher {
    client: Client,
    max_chars: usize,
}

impl ContextFetcher {
    /// Create a fetcher with the configured timeout and character budget.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                FounderLensError::Network(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            max_chars: config.max_chars,
        })
    }

    /// Fetch `url` and extract its visible text.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> ScrapeOutcome {
        match self.fetch_html(url).await {
            Ok(html) => {
                let text = extract_visible_text(&html, self.max_chars);
                if text.is_empty() {
                    debug!("page has no paragraph or heading text");
                    ScrapeOutcome::Empty
                } else {
                    debug!(chars = text.chars().count(), "extracted context snippet");
                    ScrapeOutcome::Snippet(text)
                }
            }
            Err(e) => {
                warn!(error = %e, "scrape failed, continuing without context");
                ScrapeOutcome::Failed(e.to_string())
            }
        }
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| FounderLensError::Network(format!("invalid URL '{url}': {e}")))?;

        let response = self
            .client
            .get(parsed.as_str())
            .send()
            .await
            .map_err(|e| FounderLensError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FounderLensError::Network(format!("{url}: HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| FounderLensError::Network(format!("{url}: body read failed: {e}")))
    }
}
