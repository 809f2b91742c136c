pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod os_names;
pub mod updates;

use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::models::UpdateRecord;
use crate::os_names::EolFeedClient;
use env_logger::Env;
use std::sync::Once;

pub use crate::error::{Error, Result};
pub use crate::updates::process_headings;

static LOGGER: Once = Once::new();

pub fn init_logger() {
    LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().default_filter_or("info"))
            .format_timestamp_millis()
            .init();
    });
}

/// Fetch all sources, resolve OS names and run the pipeline.
///
/// Only setup failures are errors; unreachable sources and unparseable
/// headings shrink the result instead.
pub async fn run(config: &Config) -> Result<Vec<UpdateRecord>> {
    config.validate()?;

    let fetcher = PageFetcher::new(config)?;
    let feed = EolFeedClient::new(
        config.eol_client_url.as_str(),
        config.eol_server_url.as_str(),
        config.request_timeout,
    )?;

    let table = os_names::load_table(config.os_names, &feed).await;
    let headings = fetch::fetch_headings(&fetcher, config).await;

    let records = tokio::task::spawn_blocking(move || process_headings(&headings, &table)).await?;
    Ok(records)
}
