//! Update heading parsing.
//!
//! Vendor update-history pages list one navigation link per announcement, e.g.
//!
//! - `January 17, 2022—KB5010793 (OS Builds 19042.1469, 19043.1469, and 19044.1469) Out-of-band`
//! - `September 9, 2025—Hotpatch KB5065474 (OS Build 26100.4946)`
//! - `January 11, 2022—KB5009557 (OS Build 17763.2452)`
//!
//! The regex captures:
//! 1. Date text up to the em-dash
//! 2. Leading qualifier (`Hotpatch` / `Baseline`), optional
//! 3. KB identifier, optional
//! 4. Parenthesised build group
//! 5. Trailing qualifier (`Out-of-band` / `Preview`), optional
//!
//! Keywords are matched case-sensitively. Anything that does not have this
//! shape (navigation links, unrelated headings) is not an update heading.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::PatchType;

static HEADING_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_heading_regex() -> &'static Regex {
    HEADING_REGEX.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(?P<date>.+?)\s*—\s*",
            r"(?:(?P<lead>Hotpatch|Baseline)\b\s*)?",
            r"(?:(?P<kb>KB\d+)\s*)?",
            r"\((?P<builds>[^()]*?\d+\.\d+[^()]*)\)",
            r"\s*(?P<trail>Out-of-band|Preview)?",
        ))
        .expect("Invalid update heading regex")
    })
}

/// Fields captured from one update heading, before per-build expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedHeading {
    pub date_text: String,
    pub kb: Option<String>,
    pub builds_text: String,
    pub patch_type: PatchType,
}

/// Pick the effective patch type.
///
/// A trailing qualifier is applied after the fact (e.g. an out-of-band
/// re-release of a hotpatch) and takes precedence over a leading one.
/// No qualifier at all means the routine monthly release.
pub fn resolve_patch_type(leading: Option<&str>, trailing: Option<&str>) -> PatchType {
    trailing
        .or(leading)
        .and_then(PatchType::from_keyword)
        .unwrap_or_default()
}

/// Parse one decoded heading string.
///
/// Returns `None` when the string is not an update heading.
pub fn parse_heading(heading: &str) -> Option<ParsedHeading> {
    let caps = get_heading_regex().captures(heading)?;

    let date_text = caps.name("date")?.as_str().trim().to_string();
    let builds_text = caps.name("builds")?.as_str().to_string();
    let kb = caps.name("kb").map(|m| m.as_str().to_string());

    let patch_type = resolve_patch_type(
        caps.name("lead").map(|m| m.as_str()),
        caps.name("trail").map(|m| m.as_str()),
    );

    log::trace!(
        "heading matched: date={:?} kb={:?} builds={:?} type={}",
        date_text,
        kb,
        builds_text,
        patch_type
    );

    Some(ParsedHeading {
        date_text,
        kb,
        builds_text,
        patch_type,
    })
}
