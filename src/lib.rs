//! Optrecord Studio library
//!
//! Parses compiler optimization records (`-fsave-optimization-record`)
//! into an in-memory model and derives browsable views over them.
//!
//! ## Getting Started
//!
//! ```ignore
//! use optrecord_studio::aggregator::{all_records, rank_by_hotness, PrecisionPolicy};
//! use optrecord_studio::parser::find_records;
//!
//! let units = find_records("build", Default::default())?;
//! let policy = PrecisionPolicy::from_units(&units);
//! let hottest = rank_by_hotness(all_records(&units), &policy);
//! ```

pub mod aggregator;
pub mod commands;
pub mod filter;
pub mod output;
pub mod parser;
pub mod utils;
