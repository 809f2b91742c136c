//! Update heading → record pipeline.
//!
//! Turns decoded heading strings scraped from update-history pages into
//! typed, deduplicated [`UpdateRecord`]s.
//!
//! # Data Flow
//!
//! 1. **`heading`**: match the heading shape, capture date, KB, build group
//!    and patch-type qualifiers
//! 2. **`expander`**: split the build group, parse each build, resolve OS
//!    names, parse the date, emit one record per build
//! 3. **`dedup`**: sort by (date, kb, build) and keep the first record per
//!    (kb, build)
//!
//! # Error Handling
//!
//! Every failure is per item. A heading that does not match, a malformed
//! build token or an unparseable date is logged and the item is dropped (or
//! left undated). The pipeline always returns a possibly empty record set.
//!
//! # Parallelism
//!
//! Headings are independent, so they are mapped on the Rayon pool and
//! collected in arrival order before the final dedup step. The resolver is
//! shared read-only.

pub mod dedup;
pub mod expander;
pub mod heading;
pub mod version;

use rayon::prelude::*;

use crate::models::UpdateRecord;
use crate::os_names::OsNameResolver;

pub use dedup::dedup_and_sort;
pub use expander::expand_heading;
pub use heading::{ParsedHeading, parse_heading};
pub use version::BuildVersion;

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub headings: usize,
    pub matched: usize,
    pub records: usize,
    pub unique_records: usize,
}

/// Parse and expand a single heading. Non-update headings yield nothing.
pub fn records_for_heading(heading: &str, resolver: &dyn OsNameResolver) -> Vec<UpdateRecord> {
    match parse_heading(heading) {
        Some(parsed) => expand_heading(&parsed, resolver),
        None => {
            log::debug!("not an update heading: {:?}", heading);
            Vec::new()
        }
    }
}

/// Run the full pipeline and report counters alongside the records.
pub fn process_headings_with_stats<S>(
    headings: &[S],
    resolver: &dyn OsNameResolver,
) -> (Vec<UpdateRecord>, ProcessingStats)
where
    S: AsRef<str> + Sync,
{
    let per_heading: Vec<Vec<UpdateRecord>> = headings
        .par_iter()
        .map(|heading| records_for_heading(heading.as_ref(), resolver))
        .collect();

    let matched = per_heading.iter().filter(|records| !records.is_empty()).count();
    let records: Vec<UpdateRecord> = per_heading.into_iter().flatten().collect();
    let total = records.len();

    let unique = dedup_and_sort(records);

    let stats = ProcessingStats {
        headings: headings.len(),
        matched,
        records: total,
        unique_records: unique.len(),
    };

    log::info!(
        "processed {} headings: {} matched, {} records, {} after dedup",
        stats.headings,
        stats.matched,
        stats.records,
        stats.unique_records
    );

    (unique, stats)
}

/// Run the full pipeline: parse, expand, deduplicate and order.
pub fn process_headings<S>(headings: &[S], resolver: &dyn OsNameResolver) -> Vec<UpdateRecord>
where
    S: AsRef<str> + Sync,
{
    process_headings_with_stats(headings, resolver).0
}
