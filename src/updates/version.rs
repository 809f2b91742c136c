//! Dotted OS build numbers (`major.minor[.build[.revision]]`).
//!
//! Build numbers are compared component-wise as integers so that `10.9`
//! orders before `10.10`. A missing trailing component orders before any
//! present one (`10.0` < `10.0.0`).

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

static BUILD_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_build_regex() -> &'static Regex {
    BUILD_REGEX.get_or_init(|| {
        Regex::new(r"^\d+\.\d+(?:\.\d+){0,2}$").expect("Invalid build number regex")
    })
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildParseError {
    #[error("`{0}` is not a dotted build number of 2 to 4 components")]
    Malformed(String),
    #[error("component of `{raw}` does not fit in 32 bits: {source}")]
    Overflow {
        raw: String,
        #[source]
        source: ParseIntError,
    },
}

/// Structured build number. Field order drives the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BuildVersion {
    pub major: u32,
    pub minor: u32,
    pub build: Option<u32>,
    pub revision: Option<u32>,
}

impl BuildVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            build: None,
            revision: None,
        }
    }

    /// Whether `token` has the accepted shape, before any numeric conversion.
    pub fn is_well_formed(token: &str) -> bool {
        get_build_regex().is_match(token)
    }
}

impl FromStr for BuildVersion {
    type Err = BuildParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !Self::is_well_formed(s) {
            return Err(BuildParseError::Malformed(s.to_string()));
        }

        let mut parts = Vec::with_capacity(4);
        for part in s.split('.') {
            let value = part.parse::<u32>().map_err(|source| BuildParseError::Overflow {
                raw: s.to_string(),
                source,
            })?;
            parts.push(value);
        }

        Ok(BuildVersion {
            major: parts[0],
            minor: parts[1],
            build: parts.get(2).copied(),
            revision: parts.get(3).copied(),
        })
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(build) = self.build {
            write!(f, ".{}", build)?;
        }
        if let Some(revision) = self.revision {
            write!(f, ".{}", revision)?;
        }
        Ok(())
    }
}

impl Serialize for BuildVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
