//! Output writers for report data.
//!
//! This module handles writing data to disk in various formats:
//! - Static HTML report pages
//! - JSON summaries
//! - Text summaries for the terminal

pub mod html;
pub mod json;
pub mod schema;
pub mod text;

// Re-export main functions
pub use html::{write_static_report, ReportStats};
pub use json::{read_summary, to_summary, write_summary};
pub use schema::{FunctionEntry, HotRecord, ReportSummary};
pub use text::generate_text_summary;

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Create parent directories of an output file if needed
pub(crate) fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    Ok(())
}
