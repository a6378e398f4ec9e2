// src/render/mod.rs
// =============================================================================
// This module renders snapshots, validation reports and change sets.
//
// Key functionality:
// - Coloured property/value table for inspect
// - Missing-tag report with ✘/✔ verdict lines
// - Three monitor diff modes: coloured text, unified (git style), JSON
//
// The core guarantees no iteration order over snapshots or change sets,
// so every renderer here sorts keys itself before printing. Rendering is
// purely a presentation concern - nothing feeds back into the core.
//
// Rust concepts:
// - colored: Extension trait adding .cyan()/.bold()/... to strings
// - serde_json: Serializes our data structures for the JSON modes
// =============================================================================

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::collections::HashMap;

use crate::og::{ChangeSet, Snapshot};

/// How the monitor presents each cycle's changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Human-readable coloured text (the default)
    Colored,
    /// Structured JSON, one object per changed cycle
    Json,
    /// Unified diff hunks, git style
    Unified,
}

/// The JSON payload emitted per changed monitor cycle
#[derive(Serialize)]
struct DiffPayload<'a> {
    timestamp: DateTime<Utc>,
    diff: &'a ChangeSet,
}

// Sorted keys of any string-keyed map; every renderer goes through this
// so output is stable across runs
fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<&String> {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();
    keys
}

// Renders a snapshot as a compact property/value table with a header
pub fn print_table(snapshot: &Snapshot) {
    println!("\n{}", "Property            Value".bold());
    println!("{}", "─".repeat(40));

    for key in sorted_keys(snapshot) {
        let label = format!("og:{:<15}", key);
        println!("{} {}", label.cyan().bold(), snapshot[key]);
    }
}

// Renders the missing-tag report
//
// Parameters:
//   missing: "og:"-prefixed tags absent from the snapshot, as returned
//            by validate::missing_tags
pub fn print_missing(missing: &[String]) {
    if missing.is_empty() {
        println!("{}", "✔ All required tags are present.".green().bold());
        return;
    }

    println!(
        "\n{}",
        format!("✘ Missing Open Graph tags ({}):", missing.len())
            .red()
            .bold()
    );
    for tag in missing {
        println!("  • {}", tag);
    }
}

// Renders semantic validation warnings, one ⚠ line each
pub fn print_warnings(warnings: &[String]) {
    for warning in warnings {
        println!("{}", format!("⚠ {}", warning).yellow());
    }
}

// Renders the aggregated inspect result as pretty JSON on stdout
//
// Shape: { "<url>": { "<tag>": "<value>", ... }, ... }
pub fn print_inspect_json(aggregated: &HashMap<String, Snapshot>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(aggregated)?);
    Ok(())
}

// Renders one monitor cycle's changes in the selected mode
//
// Every key in the change set is rendered exactly once; an empty change
// set renders nothing (callers skip it before getting here)
pub fn print_diff(mode: DiffMode, timestamp: DateTime<Utc>, diff: &ChangeSet) -> Result<()> {
    match mode {
        DiffMode::Json => print_diff_json(timestamp, diff),
        DiffMode::Unified => {
            print_diff_unified(diff);
            Ok(())
        }
        DiffMode::Colored => {
            print_diff_colored(timestamp, diff);
            Ok(())
        }
    }
}

fn print_diff_json(timestamp: DateTime<Utc>, diff: &ChangeSet) -> Result<()> {
    let payload = DiffPayload { timestamp, diff };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

// Unified diff hunks: one @@ header per changed tag, omitting empty sides
fn print_diff_unified(diff: &ChangeSet) {
    for key in sorted_keys(diff) {
        let change = &diff[key];
        println!("@@ og:{} @@", key);
        if !change.old.is_empty() {
            println!("- {}", change.old);
        }
        if !change.new.is_empty() {
            println!("+ {}", change.new);
        }
    }
}

fn print_diff_colored(timestamp: DateTime<Utc>, diff: &ChangeSet) {
    println!(
        "\n{}",
        format!(
            "🕒 {} – {} change(s) detected",
            timestamp.to_rfc3339(),
            diff.len()
        )
        .yellow()
        .bold()
    );

    for key in sorted_keys(diff) {
        let change = &diff[key];
        println!(
            "{} {} → {}",
            format!("og:{}", key).cyan().bold(),
            change.old.red(),
            change.new.green()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::og::Change;

    fn changeset(pairs: &[(&str, &str, &str)]) -> ChangeSet {
        pairs
            .iter()
            .map(|(k, old, new)| {
                (
                    k.to_string(),
                    Change {
                        old: old.to_string(),
                        new: new.to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_sorted_keys_are_stable() {
        let diff = changeset(&[("url", "", "x"), ("image", "", "y"), ("title", "", "z")]);
        let keys: Vec<&str> = sorted_keys(&diff).into_iter().map(String::as_str).collect();
        assert_eq!(keys, vec!["image", "title", "url"]);
    }

    #[test]
    fn test_diff_payload_serializes_old_and_new() {
        let diff = changeset(&[("title", "Hello", "Goodbye")]);
        let payload = DiffPayload {
            timestamp: Utc::now(),
            diff: &diff,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["diff"]["title"]["old"], "Hello");
        assert_eq!(json["diff"]["title"]["new"], "Goodbye");
        assert!(json["timestamp"].is_string());
    }
}
