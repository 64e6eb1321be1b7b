//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a translation unit from a document
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    #[error("Record references unknown pass id: {0}")]
    UnknownPassId(String),

    #[error("Unrecognized message item: {0}")]
    UnrecognizedMessageItem(String),

    #[error("CFG block {block} has an edge to undefined block {dest}")]
    UndefinedBlock { block: u64, dest: u64 },

    #[error("Invalid execution count: {0}")]
    InvalidCount(String),
}

/// Errors that can occur while reading record files from disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Failed to scan directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a filter configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Filter TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}
