use crate::aggregator::{summarize_passes, PrecisionPolicy};
use crate::parser::load_translation_unit;
use crate::utils::config::{ParseOptions, SCHEMA_VERSION};
use anyhow::{Context, Result};
use std::path::Path;

/// Validate a single record file
pub fn validate_record_file(file_path: &Path, options: ParseOptions) -> Result<()> {
    println!("Validating record file: {}", file_path.display());

    let unit = load_translation_unit(file_path, options)
        .with_context(|| format!("Invalid record file {}", file_path.display()))?;
    let units = std::slice::from_ref(&unit);
    let generator = unit.generator();

    println!("✓ Valid optimization record file");
    println!("  Format: {}", unit.format());
    println!(
        "  Generator: {} {} ({})",
        generator.name, generator.version, generator.target
    );
    println!("  Passes: {}", unit.passes().len());
    println!("  Top-level Records: {}", unit.records().len());
    println!("  All Records: {}", unit.iter_all_records().count());
    println!("  Distinct Pass Names: {}", summarize_passes(units).len());
    println!(
        "  Profile Counts: {}",
        if PrecisionPolicy::from_units(units).is_precise_only() {
            "yes"
        } else {
            "no"
        }
    );

    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("Optrecord Studio v{}", env!("CARGO_PKG_VERSION"));
    println!("Summary Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Browsable reports for compiler optimization records.");
}
