//! Model reply normalization.
//!
//! A reply is classified once, then mapped to a founder list:
//!
//! | Reply                         | Tag           | Founders                    |
//! |-------------------------------|---------------|-----------------------------|
//! | JSON array                    | `Structured`  | string elements, deduped    |
//! | JSON, but not an array        | `Malformed`   | empty (no name scan)        |
//! | not JSON                      | `Unparseable` | `Capitalized Capitalized` scan, deduped |

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use founderlens_shared::FounderList;

/// Two consecutive capitalized words, e.g. `Jane Doe`.
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z][a-z]+\s[A-Z][a-z]+").expect("name regex"));

/// Which branch of the parse a reply took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    Structured,
    Malformed,
    Unparseable,
}

impl ReplyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Malformed => "malformed",
            Self::Unparseable => "unparseable",
        }
    }
}

/// A model reply after the JSON-then-pattern parse.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    /// Parsed as a JSON array. Elements are not yet type-checked.
    Structured(Vec<Value>),
    /// Parsed as JSON, but not as an array.
    Malformed,
    /// Not JSON. Holds every name-pattern match, in order.
    Unparseable(Vec<String>),
}

impl ParsedReply {
    pub fn kind(&self) -> ReplyKind {
        match self {
            Self::Structured(_) => ReplyKind::Structured,
            Self::Malformed => ReplyKind::Malformed,
            Self::Unparseable(_) => ReplyKind::Unparseable,
        }
    }

    /// Apply the output policy for this tag.
    pub fn into_founders(self) -> FounderList {
        match self {
            Self::Structured(values) => {
                let names = values.into_iter().filter_map(|value| match value {
                    Value::String(name) => Some(name),
                    other => {
                        debug!(element = %other, "dropping non-string founder element");
                        None
                    }
                });
                dedup(names)
            }
            Self::Malformed => Vec::new(),
            Self::Unparseable(matches) => dedup(matches),
        }
    }
}

/// Classify raw model text.
pub fn classify(raw: &str) -> ParsedReply {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(values)) => ParsedReply::Structured(values),
        Ok(_) => ParsedReply::Malformed,
        Err(_) => ParsedReply::Unparseable(
            NAME_RE
                .find_iter(raw)
                .map(|m| m.as_str().to_string())
                .collect(),
        ),
    }
}

/// Raw model text → founder list.
pub fn normalize(raw: &str) -> FounderList {
    classify(raw).into_founders()
}

/// Remove duplicates, keeping first occurrences in order.
fn dedup(names: impl IntoIterator<Item = String>) -> FounderList {
    let mut out: FounderList = Vec::new();
    for name in names {
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}
