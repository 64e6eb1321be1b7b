//! JSON summary output writer.
//!
//! Builds `ReportSummary` values from a corpus and writes them to JSON
//! files with proper formatting.

use super::schema::{FunctionEntry, HotRecord, ReportSummary};
use crate::aggregator::{
    all_records, rank_by_hotness, render_message, summarize_functions, summarize_passes,
    PlainMarkup, PrecisionPolicy,
};
use crate::parser::TranslationUnit;
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Build a summary of the corpus
///
/// **Public** - used by commands to create the JSON output
///
/// # Arguments
/// * `units` - Parsed (and possibly filtered) translation units
/// * `policy` - Precision policy decided for this corpus
/// * `top_n` - Number of hottest records to include
pub fn to_summary(
    units: &[TranslationUnit],
    policy: &PrecisionPolicy,
    top_n: usize,
) -> ReportSummary {
    let functions = summarize_functions(units, policy)
        .into_iter()
        .map(|f| FunctionEntry {
            translation_unit: f.unit.filename().map(|p| p.display().to_string()),
            name: f.name,
            hotness: f.hotness,
            source_file: f.source_file,
            peak_location: f.peak_location,
        })
        .collect();

    let hottest_records = rank_by_hotness(all_records(units), policy)
        .into_iter()
        .take(top_n)
        .map(|r| HotRecord {
            kind: r.record.kind.to_string(),
            pass: r.pass().map(|p| p.name.clone()),
            function: r.record.function.clone(),
            location: r.record.location().cloned(),
            count: policy.hotness(r.record),
            message: render_message(r.record, &PlainMarkup),
        })
        .collect();

    ReportSummary {
        version: SCHEMA_VERSION.to_string(),
        translation_units: units.len(),
        precise_counts_only: policy.is_precise_only(),
        functions,
        passes: summarize_passes(units),
        hottest_records,
        generated_at: Utc::now().to_rfc3339(),
    }
}

/// Write a summary to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_summary(
    summary: &ReportSummary,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing summary to: {}", output_path.display());

    super::validate_path(output_path)?;
    super::create_parent_dirs(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, summary).map_err(OutputError::SerializationFailed)?;

    info!(
        "Summary written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a summary from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_summary(input_path: impl AsRef<Path>) -> Result<ReportSummary, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading summary from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let summary: ReportSummary =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Summary loaded: version {}, {} functions",
        summary.version,
        summary.functions.len()
    );

    Ok(summary)
}
