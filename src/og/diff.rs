// src/og/diff.rs
// =============================================================================
// This module compares two Open Graph snapshots.
//
// The diff is over a fixed flat key/value snapshot only:
// 1. Build the union of both key sets
// 2. Compare values for each key, treating an absent key as ""
// 3. Keep the key iff the old and new values differ
//
// A brand-new tag and a removed tag both surface as changes, each with
// one empty side. O(|old| + |new|).
//
// Rust concepts:
// - References: We only borrow the snapshots, never consume them
// - HashMap entry iteration: Order is unspecified; renderers sort keys
// =============================================================================

use serde::Serialize;
use std::collections::HashMap;

use super::Snapshot;

/// One changed tag: the value before and after. An empty string stands
/// for "tag absent on that side".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub old: String,
    pub new: String,
}

/// The set of tags whose values differ between two snapshots of the same
/// URL. Computed once, consumed once; iteration order is unspecified.
pub type ChangeSet = HashMap<String, Change>;

// Computes the set of keys that differ between two snapshots
//
// Parameters:
//   old: the previous snapshot (empty map means "no prior data")
//   new: the freshly extracted snapshot
//
// Returns: ChangeSet with an entry per differing key
//
// Deterministic for the same two inputs; reversing the arguments yields
// the same key set with old/new swapped
pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> ChangeSet {
    let mut diff = ChangeSet::new();

    // Build a unified keyset over both snapshots
    let keys = old.keys().chain(new.keys());

    for key in keys {
        // Re-inserting the same key on the second pass is harmless:
        // the computed Change is identical both times
        let old_value = old.get(key).map(String::as_str).unwrap_or("");
        let new_value = new.get(key).map(String::as_str).unwrap_or("");

        if old_value != new_value {
            diff.insert(
                key.clone(),
                Change {
                    old: old_value.to_string(),
                    new: new_value.to_string(),
                },
            );
        }
    }

    diff
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
    fn test_identical_snapshots_diff_empty() {
        let a = snapshot(&[("title", "Hello"), ("type", "website")]);
        assert!(diff_snapshots(&a, &a).is_empty());
    }

    #[test]
    fn test_changed_value() {
        let old = snapshot(&[("title", "Hello")]);
        let new = snapshot(&[("title", "Goodbye")]);
        let diff = diff_snapshots(&old, &new);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff["title"].old, "Hello");
        assert_eq!(diff["title"].new, "Goodbye");
    }

    #[test]
    fn test_added_and_removed_keys() {
        let old = snapshot(&[("title", "Hello")]);
        let new = snapshot(&[("image", "https://example.com/a.png")]);
        let diff = diff_snapshots(&old, &new);

        assert_eq!(diff.len(), 2);
        // Removed key: new side empty
        assert_eq!(diff["title"].old, "Hello");
        assert_eq!(diff["title"].new, "");
        // Added key: old side empty
        assert_eq!(diff["image"].old, "");
        assert_eq!(diff["image"].new, "https://example.com/a.png");
    }

    #[test]
    fn test_diff_against_empty_baseline_reports_all_adds() {
        let old = Snapshot::new();
        let new = snapshot(&[("title", "Hello"), ("type", "website")]);
        let diff = diff_snapshots(&old, &new);
        assert_eq!(diff.len(), 2);
        for change in diff.values() {
            assert_eq!(change.old, "");
            assert!(!change.new.is_empty());
        }
    }

    #[test]
    fn test_key_set_is_symmetric_difference_of_values() {
        let a = snapshot(&[("title", "A"), ("type", "website"), ("url", "x")]);
        let b = snapshot(&[("title", "B"), ("type", "website"), ("image", "y")]);
        let diff = diff_snapshots(&a, &b);

        let mut keys: Vec<_> = diff.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["image", "title", "url"]);
    }

    #[test]
    fn test_reversed_diff_swaps_old_and_new() {
        let a = snapshot(&[("title", "A"), ("url", "x")]);
        let b = snapshot(&[("title", "B")]);
        let forward = diff_snapshots(&a, &b);
        let backward = diff_snapshots(&b, &a);

        assert_eq!(forward.len(), backward.len());
        for (key, change) in &forward {
            let reversed = &backward[key];
            assert_eq!(change.old, reversed.new);
            assert_eq!(change.new, reversed.old);
        }
    }

    #[test]
    fn test_empty_string_value_equals_absent_key() {
        // A key explicitly set to "" compares equal to the key being absent
        let old = snapshot(&[("title", "")]);
        let new = Snapshot::new();
        assert!(diff_snapshots(&old, &new).is_empty());
    }
}
