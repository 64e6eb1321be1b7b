//! Optrecord Studio CLI
//!
//! Turns a build tree's optimization record files into a static HTML
//! report, a JSON summary, or a terminal summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use optrecord_studio::commands::{
    display_version, execute_report, validate_args, validate_record_file, ReportArgs,
};
use optrecord_studio::filter::{load_filter_config, FilterConfig};
use optrecord_studio::utils::config::{ImplLinkConfig, ParseOptions};

/// Optrecord Studio - reports for compiler optimization records
#[derive(Parser, Debug)]
#[command(name = "opt-viewer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Accept `name` as a synonym for `symtab_node` in messages
    #[arg(long, global = true)]
    accept_name_as_symtab: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Build reports from every record file under a build directory
    Report {
        /// The directory in which to look for .opt-record.json[.gz] files
        build_dir: PathBuf,

        /// The directory to which to write .html output
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output path for JSON summary (optional)
        #[arg(short, long)]
        json: Option<PathBuf>,

        /// Number of hottest records to include in summaries
        #[arg(long, default_value = "20")]
        top: usize,

        /// Do not print the text summary
        #[arg(long)]
        quiet: bool,

        /// Keep every record (disable noise filtering)
        #[arg(long)]
        no_filter: bool,

        /// TOML file with filter heuristics
        #[arg(long, env = "OPT_VIEWER_FILTER")]
        filter_config: Option<PathBuf>,

        /// Skip record files that fail to parse
        #[arg(long)]
        skip_invalid: bool,

        /// Path prefix of compiler sources in implementation locations
        #[arg(long)]
        impl_prefix: Option<String>,

        /// URL compiler source paths are appended to
        #[arg(long)]
        impl_base_url: Option<String>,
    },

    /// Validate a single record file
    Validate {
        /// Path to record file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let parse_options = ParseOptions::new().with_symtab_name_synonym(cli.accept_name_as_symtab);

    // Execute command
    match cli.command {
        Commands::Report {
            build_dir,
            output_dir,
            json,
            top,
            quiet,
            no_filter,
            filter_config,
            skip_invalid,
            impl_prefix,
            impl_base_url,
        } => {
            let filter = if no_filter {
                FilterConfig::disabled()
            } else if let Some(path) = filter_config {
                load_filter_config(&path)
                    .with_context(|| format!("Failed to load filter config {}", path.display()))?
            } else {
                FilterConfig::default()
            };

            let mut impl_links = ImplLinkConfig::default();
            if let Some(prefix) = impl_prefix {
                impl_links.prefix = prefix;
            }
            if let Some(base_url) = impl_base_url {
                impl_links.base_url = base_url;
            }

            let args = ReportArgs {
                build_dir,
                output_dir,
                output_json: json,
                top_records: top,
                print_summary: !quiet,
                filter,
                parse_options,
                impl_links,
                skip_invalid,
            };

            // Validate args first
            validate_args(&args)?;

            execute_report(args)?;
        }

        Commands::Validate { file } => {
            validate_record_file(&file, parse_options)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
