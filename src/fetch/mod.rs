//! Fetch + extract: source pages → decoded heading strings.
//!
//! - **`client`**: retrying HTTP GET
//! - **`extract`**: navigation-link text extraction and category filtering
//!
//! A source whose retries are exhausted contributes no headings; the other
//! sources are still processed.

pub mod client;
pub mod extract;

use std::collections::HashSet;

use crate::config::Config;

pub use client::{FetchError, PageFetcher};
pub use extract::{extract_headings, filter_excluded};

/// Extract and filter the headings of one already-fetched page.
pub fn headings_from_page(html: &str, config: &Config) -> Vec<String> {
    let headings = extract_headings(html, &config.link_class);
    filter_excluded(
        headings,
        &config.excluded_marker,
        config.include_excluded_category,
    )
}

/// Drop repeated headings, keeping first-seen order.
pub fn dedup_headings(headings: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(headings.len());
    headings
        .into_iter()
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

/// Fetch every configured source and collect its headings.
pub async fn fetch_headings(fetcher: &PageFetcher, config: &Config) -> Vec<String> {
    let mut all = Vec::new();
    let mut failed = 0usize;

    for url in &config.sources {
        match fetcher.fetch_page(url).await {
            Ok(html) => {
                let headings = headings_from_page(&html, config);
                log::info!("{}: {} headings", url, headings.len());
                all.extend(headings);
            }
            Err(e) => {
                failed += 1;
                log::warn!("skipping source {}: {}", url, e);
            }
        }
    }

    let all = dedup_headings(all);
    log::info!(
        "collected {} unique headings from {} sources ({} failed)",
        all.len(),
        config.sources.len(),
        failed
    );
    all
}
