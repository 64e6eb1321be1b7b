//! Output JSON schema definitions for report summaries.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::PassSummary;
use crate::parser::Location;
use serde::{Deserialize, Serialize};

/// Top-level summary structure written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Schema version for compatibility checking
    pub version: String,

    /// Number of translation units read
    pub translation_units: usize,

    /// Whether estimated counts were discarded in favour of profile data
    pub precise_counts_only: bool,

    /// Per-function aggregates, hottest first
    pub functions: Vec<FunctionEntry>,

    /// Per-pass occurrence counts
    pub passes: Vec<PassSummary>,

    /// Top records (ranked by hotness)
    pub hottest_records: Vec<HotRecord>,

    /// Timestamp when summary was generated
    pub generated_at: String,
}

/// One function in the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionEntry {
    pub name: String,

    /// Record file the function was first seen in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_unit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotness: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_location: Option<Location>,
}

/// One ranked record in the summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotRecord {
    pub kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Effective count under the report's precision policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,

    /// Rendered message including nested records
    pub message: String,
}
