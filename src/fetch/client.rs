use log::{debug, warn};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::config::Config;

const BACKOFF_FACTOR: u32 = 2;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("giving up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: String,
    },
}

/// Whether a failed response status is worth another attempt.
///
/// Client errors are final, except 429 Too Many Requests.
fn is_retryable(status: StatusCode) -> bool {
    !status.is_client_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// HTTP GET with exponential backoff.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    http: Client,
    max_attempts: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl PageFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .user_agent("winupdates/0.1")
            .build()?;

        Ok(Self {
            http,
            max_attempts: config.max_fetch_retries.max(1),
            initial_backoff: config.initial_backoff,
            max_backoff: config.max_backoff,
        })
    }

    async fn get_once(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text().await?)
    }

    /// Fetch a page body. Client errors (4xx other than 429) are returned
    /// immediately, everything else is retried until attempts run out.
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        let mut backoff = self.initial_backoff;
        let mut last = String::new();

        for attempt in 1..=self.max_attempts {
            debug!("fetch: GET {} (attempt {} of {})", url, attempt, self.max_attempts);

            match self.get_once(url).await {
                Ok(body) => return Ok(body),
                Err(FetchError::Status { status, .. }) if !is_retryable(status) => {
                    warn!("fetch: {} returned {}, not retrying", url, status);
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
                Err(err) => {
                    warn!("fetch: attempt {} for {} failed: {}", attempt, url, err);
                    last = err.to_string();
                }
            }

            if attempt < self.max_attempts {
                debug!(
                    "fetch: retrying {} after {:?} backoff (attempt {} of {})",
                    url,
                    backoff,
                    attempt + 1,
                    self.max_attempts
                );
                sleep(backoff).await;
                backoff = backoff.saturating_mul(BACKOFF_FACTOR).min(self.max_backoff);
            }
        }

        Err(FetchError::Exhausted {
            url: url.to_string(),
            attempts: self.max_attempts,
            last,
        })
    }
}
