// src/fetch/mod.rs
// =============================================================================
// This module contains all page fetching logic.
//
// Submodules:
// - http: Makes HTTP requests and maps failures to a closed error enum
// - pool: Fetches many URLs concurrently through a bounded worker pool
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

// Declare submodules (tells Rust to include these files)
mod http;
mod pool;

// Re-export public items from submodules
// This lets users write `fetch::fetch_html()` instead of
// `fetch::http::fetch_html()`
pub use http::{build_client, fetch_html, FetchError, USER_AGENT};
pub use pool::{fetch_pool, inspect_urls, resolve_workers, FetchResult};
