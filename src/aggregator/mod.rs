//! Read-only views over parsed translation units.
//!
//! This module derives:
//! - Hotness rankings (with corpus-wide count precision reconciliation)
//! - Per-source-file and per-line groupings
//! - Per-function and per-pass summaries
//! - Rendered message text

pub mod grouping;
pub mod hotness;
pub mod message;
pub mod precision;

// Re-export main types and functions
pub use grouping::{
    group_by_line, group_by_source_file, summarize_functions, summarize_passes, FunctionSummary,
    PassSummary,
};
pub use hotness::{rank_by_hotness, records_for_pass};
pub use message::{message_text, render_message, MessageMarkup, PlainMarkup};
pub use precision::{highest_count, reconcile_counts, PrecisionPolicy};

use crate::parser::{Pass, Record, TranslationUnit};

/// A record together with the unit that owns it
#[derive(Debug, Clone, Copy)]
pub struct RecordRef<'a> {
    pub unit: &'a TranslationUnit,
    pub record: &'a Record,
    /// Nesting depth below the unit's top-level records
    pub depth: usize,
}

impl<'a> RecordRef<'a> {
    pub fn pass(&self) -> Option<&'a Pass> {
        self.unit.pass_of(self.record)
    }
}

/// Anything the ranking and grouping functions can read a record from
pub trait AsRecord {
    fn as_record(&self) -> &Record;
}

impl AsRecord for Record {
    fn as_record(&self) -> &Record {
        self
    }
}

impl<T: AsRecord + ?Sized> AsRecord for &T {
    fn as_record(&self) -> &Record {
        (**self).as_record()
    }
}

impl AsRecord for RecordRef<'_> {
    fn as_record(&self) -> &Record {
        self.record
    }
}

/// Every record of every unit, nested records included, in encounter order
pub fn all_records(units: &[TranslationUnit]) -> Vec<RecordRef<'_>> {
    let mut out = Vec::new();
    for unit in units {
        let mut walk = unit.iter_all_records();
        while let Some(record) = walk.next() {
            out.push(RecordRef {
                unit,
                record,
                depth: walk.depth(),
            });
        }
    }
    out
}

/// Top-level records of every unit, in encounter order
pub fn top_level_records(units: &[TranslationUnit]) -> Vec<RecordRef<'_>> {
    units
        .iter()
        .flat_map(|unit| {
            unit.records().iter().map(move |record| RecordRef {
                unit,
                record,
                depth: 0,
            })
        })
        .collect()
}
