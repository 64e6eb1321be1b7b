//! Grouping views: by source file, by line, by function and by pass.
//!
//! All groupings walk nested records too, and keep encounter order
//! inside each group.

use super::precision::PrecisionPolicy;
use super::{all_records, RecordRef};
use crate::parser::{Location, TranslationUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records carrying a location, keyed by `location.file`
///
/// Records without a location do not appear in this view.
pub fn group_by_source_file(units: &[TranslationUnit]) -> BTreeMap<String, Vec<RecordRef<'_>>> {
    let mut by_file: BTreeMap<String, Vec<RecordRef<'_>>> = BTreeMap::new();
    for r in all_records(units) {
        if let Some(loc) = r.record.location() {
            by_file.entry(loc.file.clone()).or_default().push(r);
        }
    }
    by_file
}

/// Sub-partition one file's records by `location.line`
pub fn group_by_line<'a>(records: &[RecordRef<'a>]) -> BTreeMap<u32, Vec<RecordRef<'a>>> {
    let mut by_line: BTreeMap<u32, Vec<RecordRef<'a>>> = BTreeMap::new();
    for r in records {
        if let Some(loc) = r.record.location() {
            by_line.entry(loc.line).or_default().push(*r);
        }
    }
    by_line
}

/// Aggregate view of one function across all records naming it
#[derive(Debug, Clone)]
pub struct FunctionSummary<'a> {
    pub name: String,
    /// Unit of the first record seen for this function
    pub unit: &'a TranslationUnit,
    /// Highest effective count seen
    pub hotness: Option<u64>,
    /// File of the first record with a location
    pub source_file: Option<String>,
    /// Location of the record that produced the peak hotness
    pub peak_location: Option<Location>,
}

impl<'a> FunctionSummary<'a> {
    fn new(name: &str, unit: &'a TranslationUnit) -> Self {
        Self {
            name: name.to_string(),
            unit,
            hotness: None,
            source_file: None,
            peak_location: None,
        }
    }

    /// Fold one more record for this function into the summary
    pub fn merge(&mut self, hotness: Option<u64>, location: Option<&Location>) {
        if hotness > self.hotness {
            self.hotness = hotness;
            self.peak_location = location.cloned();
        } else if self.hotness.is_none() && self.peak_location.is_none() {
            self.peak_location = location.cloned();
        }

        if self.source_file.is_none() {
            self.source_file = location.map(|loc| loc.file.clone());
        }
    }
}

/// One summary per distinct function name, hottest first
///
/// Functions with equal hotness are ordered by name.
pub fn summarize_functions<'a>(
    units: &'a [TranslationUnit],
    policy: &PrecisionPolicy,
) -> Vec<FunctionSummary<'a>> {
    let mut by_name: BTreeMap<String, FunctionSummary<'a>> = BTreeMap::new();

    for r in all_records(units) {
        let Some(name) = r.record.function.as_deref() else {
            continue;
        };
        by_name
            .entry(name.to_string())
            .or_insert_with(|| FunctionSummary::new(name, r.unit))
            .merge(policy.hotness(r.record), r.record.location());
    }

    let mut summaries: Vec<_> = by_name.into_values().collect();
    summaries.sort_by(|a, b| b.hotness.cmp(&a.hotness));
    summaries
}

/// Occurrence counts for one pass name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    /// Pass name; `None` collects records without a pass
    pub name: Option<String>,
    /// Occurrences among top-level records
    pub top_level: usize,
    /// Occurrences among all records, nested included
    pub total: usize,
}

impl PassSummary {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(none)")
    }
}

/// One summary per distinct pass name, in name order (the no-pass bucket first)
pub fn summarize_passes(units: &[TranslationUnit]) -> Vec<PassSummary> {
    let mut by_name: BTreeMap<Option<String>, PassSummary> = BTreeMap::new();

    for r in all_records(units) {
        let name = r.pass().map(|p| p.name.clone());
        let summary = by_name
            .entry(name.clone())
            .or_insert_with(|| PassSummary {
                name,
                top_level: 0,
                total: 0,
            });
        summary.total += 1;
        if r.depth == 0 {
            summary.top_level += 1;
        }
    }

    by_name.into_values().collect()
}
