//! Loads raw bytes from a local path or an HTTP(S) URL.

use anyhow::{Context, Result};
use tracing::debug;

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Returns an error on transport failure or a non-success status.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Reads `source` from the network when it looks like a URL, otherwise from disk.
#[tracing::instrument]
pub fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if is_url(source) {
        fetch_bytes(source).with_context(|| format!("failed to fetch '{source}'"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
