// src/validate/semantic.rs
// =============================================================================
// This module performs advanced semantic checks beyond tag presence.
//
// Key functionality:
// - og:image should be served over HTTPS
// - og:image should decode, be at least 1200x630 and close to the
//   1.91:1 aspect ratio platforms crop previews to
// - og:type=article pages should name an author and a section
//
// The image check is a single-shot sequential fetch on the validate
// path; it is never orchestrated by the worker pool. All findings are
// warnings - semantic validation does not affect the exit code.
//
// Rust concepts:
// - chunk(): The image body is read chunk by chunk so we can cap it
// - image crate: Decodes only the header to get dimensions, like a
//   lightweight probe rather than a full decode
// =============================================================================

use image::io::Reader as ImageReader;
use reqwest::Client;
use std::io::Cursor;

use crate::og::Snapshot;

/// Download cap for og:image checks; platforms reject larger images
const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Minimum preview resolution platforms render without upscaling
const MIN_WIDTH: u32 = 1200;
const MIN_HEIGHT: u32 = 630;

/// Preview crop ratio and the deviation we tolerate before warning
const TARGET_RATIO: f64 = 1.91;
const RATIO_TOLERANCE: f64 = 0.1;

// Runs every semantic check against a snapshot
//
// Parameters:
//   client: HTTP client used for the image probe
//   snapshot: the extracted tags
//
// Returns: a list of human-readable warnings; empty means all checks pass
pub async fn semantic_validate(client: &Client, snapshot: &Snapshot) -> Vec<String> {
    let mut warnings = offline_warnings(snapshot);

    if let Some(image_url) = snapshot.get("image").filter(|v| !v.is_empty()) {
        warnings.extend(check_image(client, image_url).await);
    }

    warnings
}

// The checks that need no network: URL scheme and article completeness
fn offline_warnings(snapshot: &Snapshot) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(image_url) = snapshot.get("image").filter(|v| !v.is_empty()) {
        if !image_url.starts_with("https://") {
            warnings.push("og:image should use HTTPS".to_string());
        }
    }

    if snapshot.get("type").map(String::as_str) == Some("article") {
        if snapshot.get("article:author").map(String::as_str).unwrap_or("").is_empty() {
            warnings.push("article:author is missing".to_string());
        }
        if snapshot.get("article:section").map(String::as_str).unwrap_or("").is_empty() {
            warnings.push("article:section is missing".to_string());
        }
    }

    warnings
}

// Downloads the og:image and validates size, dimensions and aspect ratio
//
// HEAD first to catch oversized images cheaply, then a GET capped at
// 5 MiB; only the image header is decoded to read the dimensions
pub async fn check_image(client: &Client, image_url: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    // HEAD first to check the advertised size
    match client.head(image_url).send().await {
        Ok(response) => {
            if let Some(length) = response
                .headers()
                .get(reqwest::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<usize>().ok())
            {
                if length > MAX_IMAGE_BYTES {
                    warnings.push("og:image is larger than 5 MB".to_string());
                    return warnings;
                }
            }
        }
        Err(e) => {
            warnings.push(format!("cannot HEAD og:image: {}", e));
            return warnings;
        }
    }

    // Download the image body, capped at 5 MiB; the dimension probe only
    // needs the header bytes anyway
    let mut response = match client.get(image_url).send().await {
        Ok(response) => response,
        Err(e) => {
            warnings.push(format!("cannot download og:image: {}", e));
            return warnings;
        }
    };

    let mut data = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                data.extend_from_slice(&chunk);
                if data.len() >= MAX_IMAGE_BYTES {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warnings.push(format!("cannot download og:image: {}", e));
                return warnings;
            }
        }
    }

    let dimensions = ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .ok()
        .and_then(|reader| reader.into_dimensions().ok());

    match dimensions {
        Some((width, height)) => {
            if width < MIN_WIDTH || height < MIN_HEIGHT {
                warnings.push(format!(
                    "og:image resolution too small ({}x{})",
                    width, height
                ));
            }
            let ratio = f64::from(width) / f64::from(height);
            if (ratio - TARGET_RATIO).abs() > RATIO_TOLERANCE {
                warnings.push(format!(
                    "og:image aspect ratio {:.2} deviates from 1.91:1",
                    ratio
                ));
            }
        }
        None => warnings.push("cannot decode og:image".to_string()),
    }

    warnings
}
