//! HTTP retrieval of the raw dataset.
//!
//! [`HttpClient`] is the seam for tests; [`BasicClient`] is the reqwest
//! implementation used by the CLI.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use tracing::debug;

/// Fetches `url` and returns the response body.
///
/// Non-2xx statuses are errors; a dataset endpoint serving an error page
/// must not end up in the cache as data.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;

    let bytes = resp.bytes().await?.to_vec();
    debug!(url, bytes = bytes.len(), "dataset fetched");
    Ok(bytes)
}
