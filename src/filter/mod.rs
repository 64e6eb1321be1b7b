//! Noise filtering of top-level records.
//!
//! A top-level record is dropped when its source file matches a noisy
//! generator substring, or when its pass is in the exclusion set. State
//! records are always kept, and nested children are never pruned.
//!
//! # Example
//! ```ignore
//! use optrecord_studio::filter::{filter_unit, load_filter_config};
//!
//! let config = load_filter_config("filter.toml")?;
//! let unit = filter_unit(unit, &config);
//! ```

use crate::parser::{Record, TranslationUnit};
use crate::utils::config::{DEFAULT_EXCLUDED_PASSES, DEFAULT_NOISY_FILE_SUBSTRINGS};
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Filter heuristics
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Turn filtering off entirely
    pub enabled: bool,

    /// Records whose `location.file` contains any of these are dropped
    pub noisy_file_substrings: Vec<String>,

    /// Records from passes with these names are dropped
    pub excluded_passes: BTreeSet<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            noisy_file_substrings: DEFAULT_NOISY_FILE_SUBSTRINGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_passes: DEFAULT_EXCLUDED_PASSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A config that keeps every record
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            noisy_file_substrings: Vec::new(),
            excluded_passes: BTreeSet::new(),
        }
    }

    pub fn with_noisy_file(mut self, substring: impl Into<String>) -> Self {
        self.noisy_file_substrings.push(substring.into());
        self
    }

    pub fn with_excluded_pass(mut self, name: impl Into<String>) -> Self {
        self.excluded_passes.insert(name.into());
        self
    }

    /// True if the top-level `record` of `unit` should be dropped
    pub fn is_noise(&self, unit: &TranslationUnit, record: &Record) -> bool {
        if !self.enabled || record.is_state() {
            return false;
        }

        let noisy_file = record.location().is_some_and(|loc| {
            self.noisy_file_substrings
                .iter()
                .any(|s| loc.file.contains(s.as_str()))
        });

        let excluded_pass = unit
            .pass_of(record)
            .is_some_and(|pass| self.excluded_passes.contains(&pass.name));

        noisy_file || excluded_pass
    }
}

/// Load filter heuristics from a TOML file
///
/// Missing keys take their default values.
pub fn load_filter_config(path: impl AsRef<Path>) -> Result<FilterConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: FilterConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Drop noisy top-level records, producing a new unit
pub fn filter_unit(unit: TranslationUnit, config: &FilterConfig) -> TranslationUnit {
    let before = unit.records().len();
    let unit = unit.retain_records(|unit, record| !config.is_noise(unit, record));

    debug!(
        "Filtered {}: kept {} of {} top-level records",
        unit.filename()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<memory>".to_string()),
        unit.records().len(),
        before
    );

    unit
}

/// Filter every unit of a corpus
pub fn filter_units(units: Vec<TranslationUnit>, config: &FilterConfig) -> Vec<TranslationUnit> {
    units
        .into_iter()
        .map(|unit| filter_unit(unit, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FilterConfig = toml::from_str("excluded_passes = [\"slp\"]").unwrap();
        assert!(config.enabled);
        assert_eq!(
            config.noisy_file_substrings,
            FilterConfig::default().noisy_file_substrings
        );
        assert!(config.excluded_passes.contains("slp"));
        assert_eq!(config.excluded_passes.len(), 1);
    }

    #[test]
    fn test_disabled_toml() {
        let config: FilterConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
    }
}
