//! One-shot acquisition of the pricing page.
//!
//! Acquisition is the only step of a refresh allowed to fail hard (a
//! timeout or HTTP error aborts the run); everything after it degrades
//! per the extractor's rules.

use scraper::Html;
use tracing::info;

use crate::error::{CostsError, Result};
use crate::extract::{self, Extraction};
use crate::store;

/// Pricing page the defaults point at.
pub const PRICING_URL: &str = "https://aws.amazon.com/bedrock/pricing/";

/// Hard limit on page acquisition.
pub const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Summary of a completed refresh.
pub struct RefreshOutcome {
    pub extraction: Extraction,
    /// Where the snapshot was written, when a cache directory exists.
    pub saved_to: Option<std::path::PathBuf>,
}

/// Download `url` and extract pricing records from its tables.
pub async fn fetch_and_extract(url: &str) -> Result<Extraction> {
    let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
    let body = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    info!(bytes = body.len(), url, "downloaded pricing page");

    let document = Html::parse_document(&body);
    Ok(extract::extract(&document))
}

/// Fetch, extract, and persist a fresh snapshot.
///
/// When nothing classifies, the run reports layout drift and leaves any
/// previously persisted snapshot alone rather than overwriting it with
/// an empty set.
pub async fn refresh(url: &str) -> Result<RefreshOutcome> {
    let extraction = fetch_and_extract(url).await?;
    if extraction.layout_drift() {
        return Err(CostsError::LayoutDrift { tables_seen: extraction.tables_seen });
    }

    let saved_to = match store::snapshot_path() {
        Some(path) => {
            store::save(&path, &extraction.records)?;
            Some(path)
        }
        None => None,
    };
    Ok(RefreshOutcome { extraction, saved_to })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Integration test: actually downloads the pricing page.
    /// Run with: cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn fetch_live_pricing_page() {
        let extraction = fetch_and_extract(PRICING_URL).await.expect("fetch should succeed");
        assert!(extraction.tables_seen > 0, "pricing page should contain tables");
    }
}
