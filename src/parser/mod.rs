//! Optimization record parsing and the record model.
//!
//! This module handles:
//! - Reading (optionally gzip-compressed) record files
//! - Building translation units from the `[metadata, passes, records]` document
//! - The typed model: passes, records, messages, locations, CFGs

pub mod loader;
pub mod model;
pub mod optrecord;

// Re-export main types
pub use loader::{
    find_record_files, find_records, load_translation_unit, load_translation_units, read_document,
};
pub use model::{
    Block, Cfg, Count, Edge, Generator, ImplLocation, InliningNode, Location, MessageItem, Pass,
    PassIndex, Record, RecordBody, RecordKind, Remark, StateSnapshot, TranslationUnit, Walk,
};
pub use optrecord::parse_translation_unit;
