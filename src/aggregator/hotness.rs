//! Hotness ranking of records.
//!
//! Records are ordered by descending effective count. A record without a
//! count (or whose count the precision policy discards) ranks as 0.

use super::precision::PrecisionPolicy;
use super::{all_records, AsRecord, RecordRef};
use crate::parser::TranslationUnit;
use log::debug;
use std::cmp::Reverse;

/// Sort records from hottest to coldest
///
/// **Public** - main entry point for ranking
///
/// The sort is stable: records with equal hotness keep their input order.
pub fn rank_by_hotness<T: AsRecord>(mut records: Vec<T>, policy: &PrecisionPolicy) -> Vec<T> {
    records.sort_by_key(|r| Reverse(policy.hotness(r.as_record()).unwrap_or(0)));
    records
}

/// All records (nested included) emitted by the pass named `pass_name`, hottest first
pub fn records_for_pass<'a>(
    units: &'a [TranslationUnit],
    pass_name: &str,
    policy: &PrecisionPolicy,
) -> Vec<RecordRef<'a>> {
    let matching: Vec<_> = all_records(units)
        .into_iter()
        .filter(|r| r.pass().map(|p| p.name == pass_name).unwrap_or(false))
        .collect();

    debug!("{} records for pass {}", matching.len(), pass_name);
    rank_by_hotness(matching, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Count, Record, RecordBody, RecordKind, Remark};

    fn record(name: &str, count: Option<Count>) -> Record {
        Record {
            kind: RecordKind::Success,
            pass: None,
            function: Some(name.to_string()),
            body: RecordBody::Remark(Remark {
                count,
                ..Default::default()
            }),
        }
    }

    fn names(records: &[&Record]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.function.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_rank_descending_and_stable() {
        let input = vec![
            record("a", None),
            record("b", Some(Count::new("guessed", 10))),
            record("c", Some(Count::new("guessed", 0))),
            record("d", Some(Count::new("guessed", 10))),
            record("e", Some(Count::new("guessed", 50))),
        ];

        let ranked = rank_by_hotness(input.iter().collect(), &PrecisionPolicy::retain_all());
        // a (absent) and c (zero) tie; input order is kept
        assert_eq!(names(&ranked), vec!["e", "b", "d", "a", "c"]);
    }

    #[test]
    fn test_rank_ignores_discarded_counts() {
        let input = vec![
            record("guess", Some(Count::new("guessed", 1000))),
            record("real", Some(Count::new("precise", 3))),
        ];

        let ranked = rank_by_hotness(input.iter().collect(), &PrecisionPolicy::precise_only());
        assert_eq!(names(&ranked), vec!["real", "guess"]);
    }
}
