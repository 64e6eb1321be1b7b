//! Configuration and constants for the CLI.

/// Current JSON summary schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// File suffixes written by `-fsave-optimization-record`
pub const RECORD_FILE_SUFFIXES: &[&str] = &[".opt-record.json.gz", ".opt-record.json"];

/// First two bytes of every gzip stream
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Count qualities backed by real profile data
pub const PRECISE_QUALITIES: &[&str] = &["precise", "adjusted"];

/// Record kind tag that selects the per-function state variant
pub const STATE_KIND: &str = "state";

// Heuristics for the default record filter.
// Generated sources produce thousands of records nobody reads.
pub const DEFAULT_NOISY_FILE_SUBSTRINGS: &[&str] = &[
    "pgen.c",
    "gimple-match.c",
    "generic-match.c",
    "insn-recog.c",
    "insn-emit.c",
];

// Internal bookkeeping passes (GCC prefixes these with '*')
pub const DEFAULT_EXCLUDED_PASSES: &[&str] = &[
    "*free_lang_data",
    "*warn_function_noreturn",
    "*free_inline_summary",
];

/// Number of records shown in summaries unless overridden
pub const DEFAULT_TOP_RECORDS: usize = 20;

/// Compiler source paths as recorded in `impl_location`
pub const DEFAULT_IMPL_PREFIX: &str = "../../src/";

/// Where compiler sources can be browsed
pub const DEFAULT_IMPL_BASE_URL: &str = "https://github.com/gcc-mirror/gcc/blob/master/";

/// Options controlling how documents are turned into translation units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Accept `name` as a synonym for `symtab_node` in message items
    pub symtab_name_synonym: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symtab_name_synonym(mut self, enabled: bool) -> Self {
        self.symtab_name_synonym = enabled;
        self
    }
}

/// Builds "view source" links into the compiler's own codebase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplLinkConfig {
    /// Path prefix that marks a file as part of the compiler tree
    pub prefix: String,

    /// URL the path remainder is appended to
    pub base_url: String,
}

impl Default for ImplLinkConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_IMPL_PREFIX.to_string(),
            base_url: DEFAULT_IMPL_BASE_URL.to_string(),
        }
    }
}
