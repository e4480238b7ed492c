//! Company line parser.
//!
//! Each non-blank line must start with `Name (https://url)`:
//! - Name: letters, digits, whitespace, and `& . , ' -`
//! - URL: `http://` or `https://` up to the closing parenthesis
//!
//! Anything after the closing parenthesis is ignored.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use founderlens_shared::CompanyList;

/// Matches `Name (http(s)://url)` at the start of a trimmed line.
static COMPANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9\s&.,'-]+)\s*\((https?://[^)]+)\)").expect("company regex")
});

/// Parse company lines into a name → URL mapping.
///
/// Non-matching lines are dropped. A repeated name keeps its first position
/// but takes the URL of its last occurrence.
pub fn parse_companies(content: &str) -> CompanyList {
    let mut companies = CompanyList::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match COMPANY_RE.captures(trimmed) {
            Some(caps) => {
                let name = caps[1].trim().to_string();
                let url = caps[2].trim().to_string();
                companies.insert(name, url);
            }
            None => trace!(line = trimmed, "skipping malformed company line"),
        }
    }

    companies
}
