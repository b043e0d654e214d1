use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Download the API reference page.
pub async fn fetch_document(url: &str) -> Result<String> {
    let client = reqwest::Client::new();

    info!("Fetching API reference: {}", url);
    let html = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to reach {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad status from {}", url))?
        .text()
        .await
        .context("Failed to read API reference body")?;

    info!("Fetched {} bytes", html.len());
    Ok(html)
}

/// Read a saved copy of the page instead of hitting the network.
pub fn read_document(path: &Path) -> Result<String> {
    info!("Reading API reference from {}", path.display());
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
