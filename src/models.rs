use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::updates::version::BuildVersion;

// ===== Update Models =====

/// Release cadence qualifier attached to an update heading.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatchType {
    /// Routine monthly security release (no qualifier in the heading).
    PatchTuesday,
    Hotpatch,
    Baseline,
    OutOfBand,
    Preview,
}

impl PatchType {
    pub fn label(&self) -> &'static str {
        match self {
            PatchType::PatchTuesday => "Patch Tuesday",
            PatchType::Hotpatch => "Hotpatch",
            PatchType::Baseline => "Baseline",
            PatchType::OutOfBand => "Out-of-band",
            PatchType::Preview => "Preview",
        }
    }

    /// Map a qualifier keyword as it appears in a heading. Matching is
    /// case-sensitive; anything else is not a qualifier.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Hotpatch" => Some(PatchType::Hotpatch),
            "Baseline" => Some(PatchType::Baseline),
            "Out-of-band" => Some(PatchType::OutOfBand),
            "Preview" => Some(PatchType::Preview),
            "Patch Tuesday" => Some(PatchType::PatchTuesday),
            _ => None,
        }
    }
}

impl Default for PatchType {
    fn default() -> Self {
        PatchType::PatchTuesday
    }
}

impl fmt::Display for PatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PatchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One OS build released under one update announcement.
///
/// Identity is `(kb, build)`; every other field is descriptive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub kb: Option<String>,
    pub build: BuildVersion,
    pub date: Option<NaiveDate>,
    #[serde(rename = "clientOS")]
    pub client_os: Option<String>,
    #[serde(rename = "serverOS")]
    pub server_os: Option<String>,
    pub patch_type: PatchType,
}
