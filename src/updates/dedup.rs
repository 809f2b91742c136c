//! Final ordering and duplicate collapse.
//!
//! The same (KB, build) pair is announced on several pages (a build shared by
//! client and server editions, or a heading repeated across release tracks).
//! Records are sorted by date, KB and build, then the first record of each
//! identity is kept.

use std::collections::HashSet;

use crate::models::UpdateRecord;

/// Sort and deduplicate records.
///
/// Sort key is `(date, kb, build)` with the build compared component-wise.
/// Undated records sort before dated ones.
pub fn dedup_and_sort(mut records: Vec<UpdateRecord>) -> Vec<UpdateRecord> {
    records.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.kb.cmp(&b.kb))
            .then_with(|| a.build.cmp(&b.build))
    });

    let mut seen = HashSet::with_capacity(records.len());
    let before = records.len();

    let result: Vec<UpdateRecord> = records
        .into_iter()
        .filter(|record| seen.insert((record.kb.clone(), record.build)))
        .collect();

    if result.len() < before {
        log::debug!("collapsed {} duplicate records", before - result.len());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatchType;
    use chrono::NaiveDate;

    fn record(kb: Option<&str>, build: &str, date: Option<(i32, u32, u32)>) -> UpdateRecord {
        UpdateRecord {
            kb: kb.map(str::to_string),
            build: build.parse().unwrap(),
            date: date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            client_os: None,
            server_os: None,
            patch_type: PatchType::PatchTuesday,
        }
    }

    #[test]
    fn test_collapses_same_identity() {
        let mut first = record(Some("KB1"), "19044.1469", Some((2022, 1, 17)));
        first.client_os = Some("Windows 10 21H2".to_string());
        let second = record(Some("KB1"), "19044.1469", Some((2022, 1, 17)));

        let result = dedup_and_sort(vec![first.clone(), second]);
        assert_eq!(result, vec![first]);
    }

    #[test]
    fn test_kb_is_part_of_identity() {
        let result = dedup_and_sort(vec![
            record(Some("KB1"), "20348.473", Some((2022, 1, 11))),
            record(None, "20348.473", Some((2022, 1, 11))),
        ]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].kb, None);
    }

    #[test]
    fn test_orders_by_date_kb_then_numeric_build() {
        let result = dedup_and_sort(vec![
            record(Some("KB2"), "10.10", Some((2022, 2, 1))),
            record(Some("KB2"), "10.9", Some((2022, 2, 1))),
            record(Some("KB1"), "10.11", Some((2022, 2, 1))),
            record(Some("KB9"), "1.0", Some((2021, 12, 1))),
            record(Some("KB0"), "1.0", None),
        ]);

        let order: Vec<String> = result
            .iter()
            .map(|r| format!("{}/{}", r.kb.as_deref().unwrap_or("-"), r.build))
            .collect();
        assert_eq!(
            order,
            vec!["KB0/1.0", "KB9/1.0", "KB1/10.11", "KB2/10.9", "KB2/10.10"]
        );
    }

    #[test]
    fn test_duplicate_with_different_dates_keeps_earliest() {
        let result = dedup_and_sort(vec![
            record(Some("KB1"), "22621.1", Some((2023, 5, 9))),
            record(Some("KB1"), "22621.1", Some((2023, 5, 1))),
        ]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].date, NaiveDate::from_ymd_opt(2023, 5, 1));
    }
}
