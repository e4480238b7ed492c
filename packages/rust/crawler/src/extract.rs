//! Visible-text extraction for prompt grounding.
//!
//! Only `p`, `h1`, `h2`, and `h3` elements are read; everything else on the
//! page is ignored.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Elements whose text is kept, matched in document order.
static TEXT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("p, h1, h2, h3").expect("text selector"));

/// Extract text from `p`/`h1`/`h2`/`h3` elements, space-joined and cut to
/// `max_chars` characters.
pub fn extract_visible_text(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);

    let texts: Vec<String> = doc.select(&TEXT_SEL).map(element_text).collect();

    truncate_chars(&texts.join(" "), max_chars)
}

/// Text nodes of an element, each stripped, empties dropped, joined by single spaces.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cut to at most `max_chars` characters without splitting a code point.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
