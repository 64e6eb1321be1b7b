//! Reading record files from disk.
//!
//! Handles gzip detection, JSON decoding, and scanning a build tree
//! for `*.opt-record.json[.gz]` files.

use super::model::TranslationUnit;
use super::optrecord::parse_translation_unit;
use crate::utils::config::{ParseOptions, GZIP_MAGIC, RECORD_FILE_SUFFIXES};
use crate::utils::error::LoadError;
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Read and decode one record file into a JSON document
///
/// The file is decompressed when it starts with the gzip magic bytes,
/// regardless of its extension.
pub fn read_document(path: impl AsRef<Path>) -> Result<serde_json::Value, LoadError> {
    let path = path.as_ref();
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let raw = fs::read(path).map_err(io_err)?;
    let bytes = if raw.starts_with(&GZIP_MAGIC) {
        debug!("Decompressing {}", path.display());
        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .map_err(io_err)?;
        decoded
    } else {
        raw
    };

    serde_json::from_slice(&bytes).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load one translation unit from a record file
///
/// **Public** - main entry point for single-file loading
pub fn load_translation_unit(
    path: impl AsRef<Path>,
    options: ParseOptions,
) -> Result<TranslationUnit, LoadError> {
    let path = path.as_ref();
    let document = read_document(path)?;

    let unit = parse_translation_unit(&document, options).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(unit.with_filename(path))
}

/// True if the file name looks like an optimization record file
pub fn is_record_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| RECORD_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
        .unwrap_or(false)
}

/// Scan `build_dir` and below for record files, sorted by path
pub fn find_record_files(build_dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let build_dir = build_dir.as_ref();
    info!("Scanning for optimization records in {}", build_dir.display());

    let mut files = Vec::new();
    for entry in WalkDir::new(build_dir) {
        let entry = entry?;
        if entry.file_type().is_file() && is_record_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();

    debug!("Found {} record files", files.len());
    Ok(files)
}

/// Load each of `paths` in order
///
/// With `skip_invalid` set, files that fail to load are logged and left out.
/// Otherwise the first failure is returned.
pub fn load_translation_units(
    paths: &[PathBuf],
    options: ParseOptions,
    skip_invalid: bool,
) -> Result<Vec<TranslationUnit>, LoadError> {
    let mut units = Vec::with_capacity(paths.len());
    for path in paths {
        info!("Reading {}", path.display());
        match load_translation_unit(path, options) {
            Ok(unit) => units.push(unit),
            Err(e) if skip_invalid => warn!("Skipping {}: {}", path.display(), e),
            Err(e) => return Err(e),
        }
    }
    Ok(units)
}

/// Load every record file under `build_dir`
///
/// Stops at the first file that fails to load.
pub fn find_records(
    build_dir: impl AsRef<Path>,
    options: ParseOptions,
) -> Result<Vec<TranslationUnit>, LoadError> {
    load_translation_units(&find_record_files(build_dir)?, options, false)
}
