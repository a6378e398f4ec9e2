// src/monitor/mod.rs
// =============================================================================
// This module contains the periodic watch loop.
//
// Submodules:
// - watch: Ticker + per-cycle async fetch + ordered event application
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod watch;

// Re-export public items from submodules
pub use watch::{spawn_ticker, MonitorEvent, MonitorState};
