//! Corpus-wide decision on which execution counts to trust.
//!
//! If any record carries a precise count (profile feedback), every
//! non-precise count is ignored by rankings and lookups. Otherwise all
//! counts are used as recorded.

use super::AsRecord;
use crate::parser::{Count, Record, TranslationUnit};
use log::debug;

/// Which counts participate in hotness computations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrecisionPolicy {
    precise_only: bool,
}

impl PrecisionPolicy {
    /// Use every count regardless of quality
    pub fn retain_all() -> Self {
        Self { precise_only: false }
    }

    /// Use precise counts only
    pub fn precise_only() -> Self {
        Self { precise_only: true }
    }

    /// Decide once for a set of counts
    pub fn from_counts<'a>(counts: impl IntoIterator<Item = &'a Count>) -> Self {
        let precise_only = counts.into_iter().any(Count::is_precise);
        Self { precise_only }
    }

    /// Decide once for a whole corpus, nested records included
    pub fn from_units(units: &[TranslationUnit]) -> Self {
        let policy = Self::from_counts(
            units
                .iter()
                .flat_map(|unit| unit.iter_all_records())
                .filter_map(Record::count),
        );
        debug!(
            "Count precision policy: {}",
            if policy.precise_only {
                "precise counts only"
            } else {
                "all counts"
            }
        );
        policy
    }

    pub fn is_precise_only(&self) -> bool {
        self.precise_only
    }

    /// The count as seen under this policy
    pub fn effective<'a>(&self, count: Option<&'a Count>) -> Option<&'a Count> {
        count.filter(|c| !self.precise_only || c.is_precise())
    }

    /// Effective count value of a record, if it has one
    pub fn hotness(&self, record: &Record) -> Option<u64> {
        self.effective(record.count()).map(|c| c.value)
    }
}

/// Apply the precision rule to a set of optional counts
///
/// All-or-nothing: with at least one precise entry, every non-precise
/// entry becomes `None`; with none, the set is returned unchanged.
pub fn reconcile_counts(counts: Vec<Option<Count>>) -> Vec<Option<Count>> {
    let policy = PrecisionPolicy::from_counts(counts.iter().flatten());
    counts
        .into_iter()
        .map(|count| policy.effective(count.as_ref()).cloned())
        .collect()
}

/// Highest effective count among `records`; records without one rank lowest
pub fn highest_count<T: AsRecord>(
    records: impl IntoIterator<Item = T>,
    policy: &PrecisionPolicy,
) -> Option<u64> {
    records
        .into_iter()
        .filter_map(|r| policy.hotness(r.as_record()))
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(items: &[(&str, u64)]) -> Vec<Option<Count>> {
        items.iter().map(|(q, v)| Some(Count::new(*q, *v))).collect()
    }

    #[test]
    fn test_mixed_counts_keep_precise_only() {
        let mut input = counts(&[("guessed", 100), ("precise", 5), ("adjusted", 7)]);
        input.push(None);

        let reconciled = reconcile_counts(input);
        assert_eq!(
            reconciled,
            vec![
                None,
                Some(Count::new("precise", 5)),
                Some(Count::new("adjusted", 7)),
                None
            ]
        );
    }

    #[test]
    fn test_estimates_only_are_untouched() {
        let input = counts(&[("guessed", 100), ("guessed_local", 5)]);
        assert_eq!(reconcile_counts(input.clone()), input);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let input = counts(&[("guessed", 1), ("precise", 2), ("afdo", 3)]);
        let once = reconcile_counts(input);
        let twice = reconcile_counts(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_effective_respects_policy() {
        let guess = Count::new("guessed", 10);
        assert_eq!(
            PrecisionPolicy::retain_all().effective(Some(&guess)),
            Some(&guess)
        );
        assert_eq!(PrecisionPolicy::precise_only().effective(Some(&guess)), None);
        assert_eq!(PrecisionPolicy::precise_only().effective(None), None);
    }
}
