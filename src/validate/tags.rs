// src/validate/tags.rs
// =============================================================================
// This module checks a snapshot against the required Open Graph tag sets.
//
// Two tiers:
// - Essential: the five tags a shareable preview cannot work without
// - Recommended: the superset checked by default, including the
//   article:* family
//
// A tag that is present but empty counts as missing - social platforms
// treat an empty og:title the same as no og:title at all.
// =============================================================================

use crate::og::Snapshot;

/// Tags that must be present for a shareable preview to work correctly
pub const ESSENTIAL_TAGS: &[&str] = &["title", "type", "image", "url", "description"];

/// The superset checked by the default validation command
pub const RECOMMENDED_TAGS: &[&str] = &[
    "title",
    "type",
    "image",
    "url",
    "description",
    "site_name",
    "locale",
    "video",
    "audio",
    "article:author",
    "article:publisher",
    "article:section",
    "article:tag",
];

// Returns the required tags absent from the snapshot, "og:"-prefixed,
// in required-set order
//
// Parameters:
//   snapshot: the extracted tags
//   essentials_only: check only the essential five instead of the full
//                    recommended set
//
// An empty result means the snapshot passes validation
pub fn missing_tags(snapshot: &Snapshot, essentials_only: bool) -> Vec<String> {
    let required = if essentials_only {
        ESSENTIAL_TAGS
    } else {
        RECOMMENDED_TAGS
    };

    required
        .iter()
        .filter(|tag| snapshot.get(**tag).map(String::as_str).unwrap_or("").is_empty())
        .map(|tag| format!("og:{}", tag))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_complete_essentials_pass() {
        let snapshot = snapshot(&[
            ("title", "Hello"),
            ("type", "website"),
            ("image", "https://example.com/a.png"),
            ("url", "https://example.com"),
            ("description", "A page"),
        ]);
        assert!(missing_tags(&snapshot, true).is_empty());
    }

    #[test]
    fn test_missing_essentials_are_reported_in_order() {
        let snapshot = snapshot(&[("title", "Hello"), ("url", "https://example.com")]);
        let missing = missing_tags(&snapshot, true);
        assert_eq!(missing, vec!["og:type", "og:image", "og:description"]);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let snapshot = snapshot(&[
            ("title", ""),
            ("type", "website"),
            ("image", "x"),
            ("url", "y"),
            ("description", "z"),
        ]);
        let missing = missing_tags(&snapshot, true);
        assert_eq!(missing, vec!["og:title"]);
    }

    #[test]
    fn test_recommended_set_is_stricter() {
        let snapshot = snapshot(&[
            ("title", "Hello"),
            ("type", "website"),
            ("image", "x"),
            ("url", "y"),
            ("description", "z"),
        ]);
        assert!(missing_tags(&snapshot, true).is_empty());
        let missing = missing_tags(&snapshot, false);
        assert!(missing.contains(&"og:site_name".to_string()));
        assert!(missing.contains(&"og:article:tag".to_string()));
    }
}
