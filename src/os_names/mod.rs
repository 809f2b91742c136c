//! OS-name resolution keyed by major build number.
//!
//! Two interchangeable sources build the same [`OsLookupTable`]:
//!
//! - **`static_table`**: compiled-in names for every release since NT 6.1
//! - **`eol_feed`**: an endoflife.date-style lifecycle feed, fetched before the
//!   pipeline runs
//!
//! The pipeline only sees the [`OsNameResolver`] trait. Tables are built once
//! and never mutated afterwards.

pub mod eol_feed;
pub mod static_table;

use chrono::NaiveDate;
use std::collections::HashMap;

pub use eol_feed::{EolCycle, EolDate, EolFeedClient, EolFeedError};

/// Client and server OS names for one major build. Either may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsNames {
    pub client: Option<String>,
    pub server: Option<String>,
}

impl OsNames {
    pub fn is_empty(&self) -> bool {
        self.client.is_none() && self.server.is_none()
    }
}

/// Support and end-of-life dates, only known for feed-backed tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifecycle {
    pub release: Option<NaiveDate>,
    pub support_end: Option<NaiveDate>,
    pub eol: Option<NaiveDate>,
}

/// Resolve a major build number to OS names.
///
/// An unknown major resolves to empty names, never an error.
pub trait OsNameResolver: Send + Sync {
    fn resolve(&self, major: u32) -> OsNames;
}

/// Which source to build the lookup table from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsNameSource {
    Static,
    Feed,
}

impl Default for OsNameSource {
    fn default() -> Self {
        OsNameSource::Static
    }
}

impl std::str::FromStr for OsNameSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "static" | "" => Ok(OsNameSource::Static),
            "feed" | "eol" => Ok(OsNameSource::Feed),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct TableEntry {
    names: OsNames,
    client_lifecycle: Option<Lifecycle>,
    server_lifecycle: Option<Lifecycle>,
}

/// Read-only major-build → OS-name table.
#[derive(Debug, Clone, Default)]
pub struct OsLookupTable {
    entries: HashMap<u32, TableEntry>,
}

impl OsLookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table from the compiled-in release list.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (major, client, server) in static_table::RELEASES {
            table.insert_client(*major, client.map(str::to_string), None);
            table.insert_server(*major, server.map(str::to_string), None);
        }
        table
    }

    /// Table from client and server lifecycle feed snapshots.
    ///
    /// When several cycles of one product line share a major build the first
    /// one listed wins.
    pub fn from_feed(client_cycles: &[EolCycle], server_cycles: &[EolCycle]) -> Self {
        let mut table = Self::new();

        for cycle in client_cycles {
            if let Some(major) = cycle.major_build() {
                let lifecycle = cycle.lifecycle();
                table.insert_client(major, Some(eol_feed::client_name(&cycle.cycle)), Some(lifecycle));
            } else {
                log::debug!("client cycle {:?} has no usable build in {:?}", cycle.cycle, cycle.latest);
            }
        }

        for cycle in server_cycles {
            if let Some(major) = cycle.major_build() {
                let lifecycle = cycle.lifecycle();
                table.insert_server(major, Some(eol_feed::server_name(&cycle.cycle)), Some(lifecycle));
            } else {
                log::debug!("server cycle {:?} has no usable build in {:?}", cycle.cycle, cycle.latest);
            }
        }

        table
    }

    fn insert_client(&mut self, major: u32, name: Option<String>, lifecycle: Option<Lifecycle>) {
        let entry = self.entries.entry(major).or_default();
        if entry.names.client.is_none() {
            entry.names.client = name;
            entry.client_lifecycle = lifecycle;
        }
    }

    fn insert_server(&mut self, major: u32, name: Option<String>, lifecycle: Option<Lifecycle>) {
        let entry = self.entries.entry(major).or_default();
        if entry.names.server.is_none() {
            entry.names.server = name;
            entry.server_lifecycle = lifecycle;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().filter(|e| !e.names.is_empty()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Client lifecycle dates for a major build, if the source provided any.
    pub fn client_lifecycle(&self, major: u32) -> Option<Lifecycle> {
        self.entries.get(&major).and_then(|e| e.client_lifecycle)
    }

    /// Server lifecycle dates for a major build, if the source provided any.
    pub fn server_lifecycle(&self, major: u32) -> Option<Lifecycle> {
        self.entries.get(&major).and_then(|e| e.server_lifecycle)
    }
}

impl OsNameResolver for OsLookupTable {
    fn resolve(&self, major: u32) -> OsNames {
        self.entries
            .get(&major)
            .map(|e| e.names.clone())
            .unwrap_or_default()
    }
}

/// Build the table for the configured source.
///
/// A feed that cannot be fetched, or that yields nothing usable, falls back
/// to the built-in table.
pub async fn load_table(source: OsNameSource, client: &EolFeedClient) -> OsLookupTable {
    match source {
        OsNameSource::Static => OsLookupTable::builtin(),
        OsNameSource::Feed => match client.fetch_table().await {
            Ok(table) if !table.is_empty() => {
                log::info!("loaded {} OS names from lifecycle feed", table.len());
                table
            }
            Ok(_) => {
                log::warn!("lifecycle feed returned no usable cycles, using built-in OS names");
                OsLookupTable::builtin()
            }
            Err(e) => {
                log::warn!("lifecycle feed unavailable, using built-in OS names: {}", e);
                OsLookupTable::builtin()
            }
        },
    }
}
