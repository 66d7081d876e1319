//! Extraction of human-readable messages from HTML error pages.
//!
//! The upload endpoint answers failures with a framework-rendered HTML page;
//! its first `<p>` carries the explanation.

use scraper::{Html, Selector};

/// Text of the first `<p>` element, trimmed. `None` when there is no paragraph
/// or it is empty.
pub fn extract_error_message(body: &str) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let document = Html::parse_document(body);

    document
        .select(&selector)
        .next()
        .map(|p| p.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
}
