use crate::filter::FilterConfig;
use crate::utils::config::{ImplLinkConfig, ParseOptions, DEFAULT_TOP_RECORDS};
use std::path::PathBuf;

/// Arguments for the report command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Directory scanned for record files
    pub build_dir: PathBuf,

    /// Directory for the static HTML report (optional)
    pub output_dir: Option<PathBuf>,

    /// Output path for JSON summary (optional)
    pub output_json: Option<PathBuf>,

    /// Number of hottest records in summaries
    pub top_records: usize,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Noise filter applied to top-level records
    pub filter: FilterConfig,

    /// Parser options
    pub parse_options: ParseOptions,

    /// Links from implementation locations to compiler sources
    pub impl_links: ImplLinkConfig,

    /// Skip unreadable record files instead of aborting
    pub skip_invalid: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            build_dir: PathBuf::from("."),
            output_dir: None,
            output_json: None,
            top_records: DEFAULT_TOP_RECORDS,
            print_summary: true,
            filter: FilterConfig::default(),
            parse_options: ParseOptions::default(),
            impl_links: ImplLinkConfig::default(),
            skip_invalid: false,
        }
    }
}
