use crate::os_names::OsNameSource;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Update-history pages scraped when `UPDATES_SOURCES` is not set.
pub const DEFAULT_SOURCES: &[&str] = &[
    "https://support.microsoft.com/en-us/topic/windows-10-update-history-8127c2c6-6edf-4fdf-8b9f-0f7be1ef3562",
    "https://support.microsoft.com/en-us/topic/windows-11-version-24h2-update-history-0929c747-1815-4543-8461-0160d16f15e5",
    "https://support.microsoft.com/en-us/topic/windows-10-and-windows-server-2019-update-history-725fc2e1-4443-6831-a5ca-51ff5cbcb059",
];

pub const DEFAULT_LINK_CLASS: &str = "supLeftNavLink";
pub const DEFAULT_EXCLUDED_MARKER: &str = "Mobile";
pub const DEFAULT_EOL_CLIENT_URL: &str = "https://endoflife.date/api/windows.json";
pub const DEFAULT_EOL_SERVER_URL: &str = "https://endoflife.date/api/windows-server.json";

pub const MIN_FETCH_RETRIES: u32 = 1;
pub const MAX_FETCH_RETRIES: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max fetch retries must be between 1 and 10, got {0}")]
    RetriesOutOfRange(u32),
    #[error("no update sources configured")]
    NoSources,
    #[error("link class must not be empty")]
    EmptyLinkClass,
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Runtime configuration for fetching and OS-name resolution.
///
/// The parsing pipeline itself takes no configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sources: Vec<String>,
    pub link_class: String,
    pub excluded_marker: String,
    pub include_excluded_category: bool,
    pub max_fetch_retries: u32,
    pub request_timeout: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub os_names: OsNameSource,
    pub eol_client_url: String,
    pub eol_server_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            link_class: DEFAULT_LINK_CLASS.to_string(),
            excluded_marker: DEFAULT_EXCLUDED_MARKER.to_string(),
            include_excluded_category: false,
            max_fetch_retries: 3,
            request_timeout: Duration::from_millis(20_000),
            initial_backoff: Duration::from_millis(750),
            max_backoff: Duration::from_secs(30),
            os_names: OsNameSource::Static,
            eol_client_url: DEFAULT_EOL_CLIENT_URL.to_string(),
            eol_server_url: DEFAULT_EOL_SERVER_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or unparseable values
    /// keep their defaults.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        let sources = lookup("UPDATES_SOURCES")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.sources);

        let os_names = match lookup("UPDATES_OS_NAMES") {
            Some(value) => OsNameSource::from_str(&value).unwrap_or_else(|_| {
                log::warn!("unknown UPDATES_OS_NAMES value {:?}, using static table", value);
                OsNameSource::Static
            }),
            None => defaults.os_names,
        };

        Self {
            sources,
            link_class: string("UPDATES_LINK_CLASS", defaults.link_class),
            excluded_marker: string("UPDATES_EXCLUDED_MARKER", defaults.excluded_marker),
            include_excluded_category: lookup("UPDATES_INCLUDE_EXCLUDED")
                .map(|value| parse_bool(&value))
                .unwrap_or(defaults.include_excluded_category),
            max_fetch_retries: lookup("UPDATES_MAX_FETCH_RETRIES")
                .and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or(defaults.max_fetch_retries),
            request_timeout: millis("UPDATES_FETCH_TIMEOUT_MS", defaults.request_timeout),
            initial_backoff: millis("UPDATES_RETRY_BACKOFF_MS", defaults.initial_backoff),
            max_backoff: defaults.max_backoff,
            os_names,
            eol_client_url: string("UPDATES_EOL_CLIENT_URL", defaults.eol_client_url),
            eol_server_url: string("UPDATES_EOL_SERVER_URL", defaults.eol_server_url),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FETCH_RETRIES..=MAX_FETCH_RETRIES).contains(&self.max_fetch_retries) {
            return Err(ConfigError::RetriesOutOfRange(self.max_fetch_retries));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if self.link_class.trim().is_empty() {
            return Err(ConfigError::EmptyLinkClass);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[]);
        assert_eq!(config, Config::default());
        assert!(!config.include_excluded_category);
        assert_eq!(config.max_fetch_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("UPDATES_SOURCES", "https://a.example/x, ,https://b.example/y"),
            ("UPDATES_INCLUDE_EXCLUDED", "yes"),
            ("UPDATES_MAX_FETCH_RETRIES", "5"),
            ("UPDATES_OS_NAMES", "feed"),
            ("UPDATES_RETRY_BACKOFF_MS", "10"),
        ]);
        assert_eq!(config.sources, vec!["https://a.example/x", "https://b.example/y"]);
        assert!(config.include_excluded_category);
        assert_eq!(config.max_fetch_retries, 5);
        assert_eq!(config.os_names, OsNameSource::Feed);
        assert_eq!(config.initial_backoff, Duration::from_millis(10));
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = from_map(&[
            ("UPDATES_MAX_FETCH_RETRIES", "many"),
            ("UPDATES_OS_NAMES", "ldap"),
        ]);
        assert_eq!(config.max_fetch_retries, 3);
        assert_eq!(config.os_names, OsNameSource::Static);
    }

    #[test]
    fn test_validate_retry_range() {
        for retries in [0, 11] {
            let config = Config {
                max_fetch_retries: retries,
                ..Config::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::RetriesOutOfRange(retries)));
        }
        let config = Config {
            max_fetch_retries: 10,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_sources() {
        let config = Config {
            sources: Vec::new(),
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSources));
    }
}
