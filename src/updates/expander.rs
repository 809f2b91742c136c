//! Per-build expansion of a parsed heading.
//!
//! One heading may announce several builds at once
//! (`OS Builds 19042.1469, 19043.1469, and 19044.1469`). Each build becomes
//! its own [`UpdateRecord`] sharing the heading's KB, date and patch type,
//! with OS names resolved from the build's major component.
//!
//! Nothing here fails: a malformed token is skipped, an unparseable date
//! leaves the record undated.

use chrono::{NaiveDate, NaiveTime, Utc};

use super::heading::ParsedHeading;
use super::version::{BuildParseError, BuildVersion};
use crate::models::UpdateRecord;
use crate::os_names::OsNameResolver;

/// Formats tried before falling back to `dateparser`.
const DATE_FORMATS: &[&str] = &["%B %d, %Y", "%B %d %Y", "%d %B %Y", "%b %d, %Y", "%Y-%m-%d"];

/// Turn `a, b, and c` / `a or b` into a plain comma-separated list.
fn normalize_joiners(raw: &str) -> String {
    raw.replace(" and ", ", ").replace(" or ", ", ")
}

/// Keep only digits and periods.
fn strip_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Split the raw build group into parsed build numbers, dropping bad tokens.
pub fn split_builds(raw: &str) -> Vec<BuildVersion> {
    let mut builds = Vec::new();

    for token in normalize_joiners(raw).split(',') {
        let cleaned = strip_token(token);
        if cleaned.is_empty() {
            continue;
        }

        match cleaned.parse::<BuildVersion>() {
            Ok(build) => builds.push(build),
            Err(BuildParseError::Malformed(_)) => {
                log::debug!("skipping malformed build token {:?} in {:?}", token.trim(), raw);
            }
            Err(err) => {
                log::debug!("skipping build token {:?}: {}", token.trim(), err);
            }
        }
    }

    builds
}

/// Parse heading date text such as `January 17, 2022`.
///
/// Returns `None` (with a warning) when no known format applies.
pub fn parse_heading_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        log::warn!("update heading has empty date text");
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&text, format) {
            return Some(date);
        }
    }

    match dateparser::parse_with(&text, &Utc, NaiveTime::MIN) {
        Ok(dt) => Some(dt.date_naive()),
        Err(source) => {
            log::warn!("unparseable update date `{}`: {}", text, source);
            None
        }
    }
}

/// Expand one parsed heading into one record per build number.
pub fn expand_heading(parsed: &ParsedHeading, resolver: &dyn OsNameResolver) -> Vec<UpdateRecord> {
    let builds = split_builds(&parsed.builds_text);
    if builds.is_empty() {
        log::debug!(
            "heading {:?} ({:?}) yielded no build numbers",
            parsed.kb,
            parsed.builds_text
        );
        return Vec::new();
    }

    let date = parse_heading_date(&parsed.date_text);

    builds
        .into_iter()
        .map(|build| {
            let names = resolver.resolve(build.major);
            UpdateRecord {
                kb: parsed.kb.clone(),
                build,
                date,
                client_os: names.client,
                server_os: names.server,
                patch_type: parsed.patch_type.clone(),
            }
        })
        .collect()
}
