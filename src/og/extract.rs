// src/og/extract.rs
// =============================================================================
// This module extracts Open Graph tags from HTML documents.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// An Open Graph tag looks like:
//   <meta property="og:title" content="Hello">
// Some sites use name= instead of property=, so we accept both:
//   <meta name="og:title" content="Hello">
//
// Rust concepts:
// - HashMap: Key/value storage for the extracted tags
// - Iterators: For walking the selected elements
// - Option: attr() returns Option because attributes may be absent
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashMap;

/// A flat key/value snapshot of every Open Graph tag found in one fetch
/// of one URL, keyed without the "og:" prefix ("og:title" becomes "title").
///
/// A snapshot is never mutated after extraction; diffing and rendering
/// only read it.
pub type Snapshot = HashMap<String, String>;

// Extracts all Open Graph tags from HTML content
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: Snapshot mapping tag name (without "og:") to its content value
//
// Behavior notes:
// - If the same tag appears more than once, the last occurrence wins
// - Elements without a content attribute are skipped, not errors
// - Malformed HTML still yields a best-effort (possibly empty) snapshot;
//   extraction never fails
pub fn extract_og(html: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();

    // Parse the HTML into a document
    // html5ever is lenient, so broken markup still produces a tree
    let document = Html::parse_document(html);

    // Create a CSS selector to find all <meta> tags
    // Selector::parse returns Result, so we use .unwrap() which panics on error
    // This is OK here because our selector is a constant and known to be valid
    let selector = Selector::parse("meta").unwrap();

    for element in document.select(&selector) {
        let meta = element.value();

        // Handle <meta property="og:..." content="...">
        if let Some(prop) = meta.attr("property") {
            if let Some(key) = prop.strip_prefix("og:") {
                if let Some(content) = meta.attr("content") {
                    snapshot.insert(key.to_string(), content.to_string());
                }
            }
        }

        // Handle <meta name="og:..." content="...">
        if let Some(name) = meta.attr("name") {
            if let Some(key) = name.strip_prefix("og:") {
                if let Some(content) = meta.attr("content") {
                    snapshot.insert(key.to_string(), content.to_string());
                }
            }
        }
    }

    snapshot
}
