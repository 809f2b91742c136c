//! Lifecycle feed client.
//!
//! Fetches release cycles from an endoflife.date-compatible JSON API and
//! turns them into an [`OsLookupTable`]. Each cycle looks like:
//!
//! ```json
//! {"cycle": "11-24h2-e", "releaseDate": "2024-10-01", "support": "2027-10-12",
//!  "eol": "2027-10-12", "latest": "10.0.26100"}
//! ```
//!
//! `support` and `eol` are either a date or a boolean.

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{Lifecycle, OsLookupTable};

/// Edition suffixes that do not change the release name.
const EDITION_SUFFIXES: &[&str] = &["e", "w", "iot", "lts", "ltsc"];

#[derive(Debug, Error)]
pub enum EolFeedError {
    #[error("lifecycle feed HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("lifecycle feed {url} returned status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to decode lifecycle feed: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EolDate {
    Date(NaiveDate),
    Flag(bool),
}

impl EolDate {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            EolDate::Date(date) => Some(*date),
            EolDate::Flag(_) => None,
        }
    }
}

/// One release cycle from the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EolCycle {
    pub cycle: String,
    #[serde(default)]
    pub latest: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub support: Option<EolDate>,
    #[serde(default)]
    pub eol: Option<EolDate>,
}

impl EolCycle {
    /// Build component of `latest` (`10.0.22631` → 22631).
    pub fn major_build(&self) -> Option<u32> {
        let latest = self.latest.as_deref()?;
        let parts: Vec<&str> = latest.trim().split('.').collect();
        let build = parts.get(2).or(parts.last())?;
        build.parse().ok()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle {
            release: self.release_date,
            support_end: self.support.and_then(|d| d.date()),
            eol: self.eol.and_then(|d| d.date()),
        }
    }
}

/// `11-24h2-e` → `Windows 11 24H2`
pub fn client_name(cycle: &str) -> String {
    let parts: Vec<String> = cycle
        .split('-')
        .filter(|p| !p.is_empty() && !EDITION_SUFFIXES.contains(&p.to_ascii_lowercase().as_str()))
        .map(|p| p.to_ascii_uppercase())
        .collect();
    format!("Windows {}", parts.join(" "))
}

/// `2012-r2` → `Windows Server 2012 R2`
pub fn server_name(cycle: &str) -> String {
    let parts: Vec<String> = cycle
        .split('-')
        .filter(|p| !p.is_empty())
        .map(|p| p.to_ascii_uppercase())
        .collect();
    format!("Windows Server {}", parts.join(" "))
}

#[derive(Clone)]
pub struct EolFeedClient {
    http: reqwest::Client,
    client_url: String,
    server_url: String,
}

impl EolFeedClient {
    pub fn new(
        client_url: impl Into<String>,
        server_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EolFeedError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("winupdates/0.1")
            .build()?;

        Ok(Self {
            http,
            client_url: client_url.into(),
            server_url: server_url.into(),
        })
    }

    pub async fn fetch_cycles(&self, url: &str) -> Result<Vec<EolCycle>, EolFeedError> {
        log::info!("fetching lifecycle feed from {}", url);

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(EolFeedError::Status {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let body = response.bytes().await?;
        let cycles: Vec<EolCycle> = serde_json::from_slice(&body)?;

        log::debug!("lifecycle feed {}: {} cycles", url, cycles.len());
        Ok(cycles)
    }

    /// Fetch both product lines and build a lookup table.
    pub async fn fetch_table(&self) -> Result<OsLookupTable, EolFeedError> {
        let client = self.fetch_cycles(&self.client_url).await?;
        let server = self.fetch_cycles(&self.server_url).await?;
        Ok(OsLookupTable::from_feed(&client, &server))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_feed_cycles() {
        let raw = r#"[
            {"cycle": "11-24h2-e", "releaseDate": "2024-10-01", "support": "2027-10-12",
             "eol": "2027-10-12", "latest": "10.0.26100", "link": null},
            {"cycle": "10-22h2", "releaseDate": "2022-10-18", "support": true,
             "eol": "2025-10-14", "latest": "10.0.19045"},
            {"cycle": "xp", "eol": true}
        ]"#;

        let cycles: Vec<EolCycle> = serde_json::from_str(raw).unwrap();
        assert_eq!(cycles.len(), 3);
        assert_eq!(cycles[0].major_build(), Some(26100));
        assert_eq!(cycles[1].support, Some(EolDate::Flag(true)));
        assert_eq!(cycles[1].lifecycle().eol, NaiveDate::from_ymd_opt(2025, 10, 14));
        assert_eq!(cycles[2].major_build(), None);
    }

    #[test]
    fn test_client_names() {
        assert_eq!(client_name("11-24h2-e"), "Windows 11 24H2");
        assert_eq!(client_name("10-22h2"), "Windows 10 22H2");
        assert_eq!(client_name("10-21h2-iot-lts"), "Windows 10 21H2");
        assert_eq!(client_name("7-sp1"), "Windows 7 SP1");
    }

    #[test]
    fn test_server_names() {
        assert_eq!(server_name("2022"), "Windows Server 2022");
        assert_eq!(server_name("23h2"), "Windows Server 23H2");
        assert_eq!(server_name("2012-r2"), "Windows Server 2012 R2");
    }

    /// Serve one canned HTTP response on a local port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}/api/windows.json", addr)
    }

    fn feed_client() -> EolFeedClient {
        EolFeedClient::new("unused", "unused", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_cycles_reports_bad_status() {
        let url = serve_once("503 Service Unavailable", "").await;
        let err = feed_client().fetch_cycles(&url).await.unwrap_err();

        match err {
            EolFeedError::Status { status, .. } => {
                assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE)
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_cycles_reports_undecodable_body() {
        let url = serve_once("200 OK", "<html>not json</html>").await;
        let err = feed_client().fetch_cycles(&url).await.unwrap_err();
        assert!(matches!(err, EolFeedError::Decode(_)));
    }

    #[tokio::test]
    async fn test_fetch_cycles_decodes_feed() {
        let url = serve_once(
            "200 OK",
            r#"[{"cycle": "2019", "latest": "10.0.17763", "eol": "2029-01-09"}]"#,
        )
        .await;

        let cycles = feed_client().fetch_cycles(&url).await.unwrap();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].major_build(), Some(17763));
    }
}
