use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::os_names::EolFeedError;

/// Errors that stop a run.
///
/// Per-heading and per-source failures never surface here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to set up page fetcher: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to set up lifecycle feed client: {0}")]
    EolFeed(#[from] EolFeedError),
    #[error("pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
