// src/og/mod.rs
// =============================================================================
// This module contains the Open Graph core: extraction and diffing.
//
// Submodules:
// - extract: Pulls og:* meta tags out of an HTML document
// - diff: Compares two snapshots and reports changed tags
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod diff;
mod extract;

// Re-export public items from submodules
// This lets users write `og::extract_og()` instead of
// `og::extract::extract_og()`
pub use diff::{diff_snapshots, Change, ChangeSet};
pub use extract::{extract_og, Snapshot};
