//! Report command implementation.
//!
//! The report command:
//! 1. Scans the build directory for record files
//! 2. Parses each translation unit
//! 3. Filters noisy records
//! 4. Decides the count precision policy
//! 5. Writes the requested outputs

use super::models::ReportArgs;
use crate::aggregator::{all_records, rank_by_hotness, PrecisionPolicy};
use crate::filter::filter_units;
use crate::output::{generate_text_summary, to_summary, write_static_report, write_summary};
use crate::parser::{find_record_files, load_translation_units};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Build directory scan failures
/// * Record parse errors (unless `skip_invalid` is set)
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting report for: {}", args.build_dir.display());

    // Step 1: Find record files
    info!("Step 1/5: Scanning for record files...");
    let files = find_record_files(&args.build_dir).context("Failed to scan build directory")?;
    if files.is_empty() {
        warn!("No optimization record files found");
    }

    // Step 2: Parse
    info!("Step 2/5: Parsing {} record files...", files.len());
    let units = load_translation_units(&files, args.parse_options, args.skip_invalid)
        .context("Failed to load record files")?;

    // Step 3: Filter
    let units = if args.filter.enabled {
        info!("Step 3/5: Filtering noisy records...");
        filter_units(units, &args.filter)
    } else {
        info!("Step 3/5: Skipping filtering (disabled)");
        units
    };

    // Step 4: Precision
    info!("Step 4/5: Reconciling count precision...");
    let policy = PrecisionPolicy::from_units(&units);
    debug!("Precise counts only: {}", policy.is_precise_only());

    // Step 5: Outputs
    info!("Step 5/5: Writing outputs...");

    if let Some(dir) = &args.output_dir {
        let stats = write_static_report(&units, &policy, &args.impl_links, dir)
            .context("Failed to write HTML report")?;
        info!("✓ HTML report written to: {} ({} pages)", dir.display(), stats.pages_written);
    }

    if let Some(path) = &args.output_json {
        let summary = to_summary(&units, &policy, args.top_records);
        write_summary(&summary, path).context("Failed to write JSON summary")?;
        info!("✓ Summary written to: {}", path.display());
    }

    if args.print_summary {
        let ranked = rank_by_hotness(all_records(&units), &policy);
        println!("\n{}", "=".repeat(80));
        println!("OPTIMIZATION RECORD SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Translation units: {}", units.len());
        println!("Records:           {}", ranked.len());
        println!(
            "Counts:            {}",
            if policy.is_precise_only() {
                "profile data only"
            } else {
                "all estimates"
            }
        );
        println!(
            "\n{}",
            generate_text_summary(&ranked, &policy, args.top_records)
        );
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if !args.build_dir.is_dir() {
        anyhow::bail!(
            "Build directory does not exist: {}",
            args.build_dir.display()
        );
    }

    if args.top_records == 0 {
        anyhow::bail!("top_records must be greater than 0");
    }

    if args.top_records > 10_000 {
        anyhow::bail!("top_records is too large (max 10000)");
    }

    if let Some(dir) = &args.output_dir {
        if dir.exists() && !dir.is_dir() {
            anyhow::bail!("Output path is not a directory: {}", dir.display());
        }
    }

    if args.output_dir.is_none() && args.output_json.is_none() && !args.print_summary {
        anyhow::bail!("Nothing to do: request an HTML report, a JSON summary, or a text summary");
    }

    Ok(())
}
