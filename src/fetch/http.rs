// src/fetch/http.rs
// =============================================================================
// This module fetches HTML documents over HTTP.
//
// Key functionality:
// - Builds a reqwest client with a per-request timeout
// - Sends an identifying User-Agent and an HTML-preferring Accept header
// - Treats any status >= 400 as an error without parsing the body
// - Maps every failure to one of a closed set of error kinds
//
// Rust concepts:
// - async/await: For network I/O
// - thiserror: Derives Display/Error for our error enum
// - Result<T, E>: For error handling with the ? operator
// =============================================================================

use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Identifying User-Agent sent with every request
pub const USER_AGENT: &str = concat!(
    "og-sentinel/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/og-sentinel/og-sentinel)"
);

/// Accept header preferring HTML, mirroring what a browser would send
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Everything that can go wrong while fetching one URL.
///
/// A closed set of kinds rather than a single opaque message, so callers
/// can distinguish transport failures from HTTP-level rejections.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}")]
    Status { status: u16 },
}

// Builds the HTTP client shared by all fetches of one command invocation
//
// The timeout applies to each request individually, never to a whole
// batch; connection pooling is reused across requests
pub fn build_client(timeout_secs: u64) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))
}

// Fetches a URL and returns its HTML body as a string
//
// Parameters:
//   client: shared reqwest client (cheap to clone, pooled connections)
//   url: the URL to fetch
//
// Returns: the raw HTML on success, or a FetchError describing why the
// fetch failed. A status >= 400 is an error - the body is never parsed.
pub async fn fetch_html(client: &Client, url: &str) -> Result<String, FetchError> {
    // Validate up front so a malformed URL surfaces as InvalidUrl rather
    // than a confusing transport error from deeper in the stack
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    let start = std::time::Instant::now();

    let response = client
        .get(parsed)
        .header(reqwest::header::ACCEPT, ACCEPT)
        .send()
        .await
        .map_err(categorize_error)?;

    let status = response.status();
    if status.as_u16() >= 400 {
        return Err(FetchError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.text().await.map_err(categorize_error)?;

    tracing::debug!(
        url,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "http.fetch"
    );

    Ok(body)
}

// Maps a reqwest error to our closed error set
//
// reqwest exposes predicates (is_timeout, is_connect, ...) instead of a
// public error enum, so we sort failures here once
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_any_request() {
        let client = build_client(1).unwrap();
        let err = fetch_html(&client, "not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_rejected() {
        let client = build_client(1).unwrap();
        let err = fetch_html(&client, "ftp://example.com/file").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn test_error_display_distinguishes_kinds() {
        let status = FetchError::Status { status: 404 };
        assert_eq!(status.to_string(), "HTTP 404");

        let timeout = FetchError::Timeout;
        assert_eq!(timeout.to_string(), "request timed out");

        let transport = FetchError::Transport("connection refused".to_string());
        assert!(transport.to_string().contains("connection refused"));
    }

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("og-sentinel/"));
        assert!(USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
