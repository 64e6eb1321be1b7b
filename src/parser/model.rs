//! In-memory representation of one translation unit's optimization records.
//!
//! A `TranslationUnit` owns its passes (in an arena indexed by `PassIndex`)
//! and its top-level records. Records refer to passes by index only.

use crate::utils::config::{PRECISE_QUALITIES, STATE_KIND};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};

/// Position of a pass inside its translation unit's pass arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PassIndex(pub(crate) usize);

impl PassIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Metadata about what created the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generator {
    pub name: String,
    pub pkgversion: String,
    pub version: String,
    pub target: String,
}

/// An optimization pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pass {
    /// Document-scoped identifier referenced by records
    pub id: String,
    pub name: String,
    pub num: i64,
    pub optgroups: BTreeSet<String>,
    #[serde(rename = "type")]
    pub pass_type: String,
    /// Sub-passes, as indices into the same arena
    pub children: Vec<PassIndex>,
}

/// A source location (1-based line and column)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A location within the compiler itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImplLocation {
    pub file: String,
    pub line: u32,
    pub function: String,
}

impl ImplLocation {
    /// Link into the compiler sources, if the file lives under the configured prefix
    pub fn browse_link(&self, config: &crate::utils::config::ImplLinkConfig) -> Option<String> {
        let rest = self.file.strip_prefix(config.prefix.as_str())?;
        Some(format!("{}{}#L{}", config.base_url, rest, self.line))
    }
}

impl fmt::Display for ImplLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: '{}'", self.file, self.line, self.function)
    }
}

/// An execution count estimate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub quality: String,
    pub value: u64,
}

impl Count {
    pub fn new(quality: impl Into<String>, value: u64) -> Self {
        Self {
            quality: quality.into(),
            value,
        }
    }

    /// True for counts backed by profile feedback
    pub fn is_precise(&self) -> bool {
        PRECISE_QUALITIES.contains(&self.quality.as_str())
    }
}

/// One frame of an inlining chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InliningNode {
    pub fndecl: String,
    pub site: Option<Location>,
}

/// One fragment of a record's message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageItem {
    Text { text: String },
    Expr { expr: String, location: Option<Location> },
    Stmt { stmt: String, location: Option<Location> },
    SymtabNode { node: String, location: Option<Location> },
}

impl MessageItem {
    /// The fragment's text, without any markup
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
            Self::Expr { expr, .. } => expr,
            Self::Stmt { stmt, .. } => stmt,
            Self::SymtabNode { node, .. } => node,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        match self {
            Self::Text { .. } => None,
            Self::Expr { location, .. }
            | Self::Stmt { location, .. }
            | Self::SymtabNode { location, .. } => location.as_ref(),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }
}

impl fmt::Display for MessageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Record kind tag
///
/// The set of kinds is open: unknown tags are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Success,
    Failure,
    Note,
    Scope,
    State,
    Other(String),
}

impl std::str::FromStr for RecordKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "success" => Self::Success,
            "failure" => Self::Failure,
            "note" => Self::Note,
            "scope" => Self::Scope,
            STATE_KIND => Self::State,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Note => "note",
            Self::Scope => "scope",
            Self::State => STATE_KIND,
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A basic block in a CFG snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub index: u64,
    pub flags: BTreeSet<String>,
    pub stmts: Option<String>,
}

/// A resolved CFG edge; `src` and `dest` are positions in `Cfg::blocks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub src: usize,
    pub dest: usize,
    pub flags: BTreeSet<String>,
}

/// Control-flow graph attached to a state record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cfg {
    pub blocks: Vec<Block>,
    pub edges: Vec<Edge>,
}

impl Cfg {
    pub fn block_by_index(&self, index: u64) -> Option<&Block> {
        self.blocks.iter().find(|b| b.index == index)
    }

    /// Blocks reached from the block at position `src`
    pub fn successors(&self, src: usize) -> impl Iterator<Item = &Block> + '_ {
        self.edges
            .iter()
            .filter(move |e| e.src == src)
            .map(move |e| &self.blocks[e.dest])
    }
}

/// Payload of a success/failure/note/scope record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Remark {
    pub impl_location: Option<ImplLocation>,
    pub message: Vec<MessageItem>,
    pub count: Option<Count>,
    pub location: Option<Location>,
    pub inlining_chain: Option<Vec<InliningNode>>,
    pub children: Vec<Record>,
}

/// Payload of a per-function state snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateSnapshot {
    pub cfg: Option<Cfg>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordBody {
    Remark(Remark),
    State(StateSnapshot),
}

/// One optimization record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub kind: RecordKind,
    pub pass: Option<PassIndex>,
    pub function: Option<String>,
    pub body: RecordBody,
}

impl Record {
    pub fn is_state(&self) -> bool {
        matches!(self.body, RecordBody::State(_))
    }

    pub fn remark(&self) -> Option<&Remark> {
        match &self.body {
            RecordBody::Remark(remark) => Some(remark),
            RecordBody::State(_) => None,
        }
    }

    pub fn cfg(&self) -> Option<&Cfg> {
        match &self.body {
            RecordBody::State(state) => state.cfg.as_ref(),
            RecordBody::Remark(_) => None,
        }
    }

    pub fn location(&self) -> Option<&Location> {
        self.remark().and_then(|r| r.location.as_ref())
    }

    pub fn count(&self) -> Option<&Count> {
        self.remark().and_then(|r| r.count.as_ref())
    }

    pub fn impl_location(&self) -> Option<&ImplLocation> {
        self.remark().and_then(|r| r.impl_location.as_ref())
    }

    pub fn inlining_chain(&self) -> Option<&[InliningNode]> {
        self.remark().and_then(|r| r.inlining_chain.as_deref())
    }

    pub fn message(&self) -> &[MessageItem] {
        self.remark().map(|r| r.message.as_slice()).unwrap_or(&[])
    }

    pub fn children(&self) -> &[Record] {
        self.remark().map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    /// All nested records, depth-first, parents before children
    pub fn iter_all_descendants(&self) -> Walk<'_> {
        Walk::new(self.children())
    }
}

/// Pre-order walk over a record forest
///
/// Yields every record followed by its descendants.
pub struct Walk<'a> {
    stack: Vec<std::slice::Iter<'a, Record>>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(roots: &'a [Record]) -> Self {
        Self {
            stack: vec![roots.iter()],
        }
    }

    /// Nesting depth of the record most recently yielded (0 = root)
    pub fn depth(&self) -> usize {
        self.stack.len().saturating_sub(2)
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<&'a Record> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(record) => {
                    self.stack.push(record.children().iter());
                    return Some(record);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Top-level container for one input document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationUnit {
    pub(crate) filename: Option<PathBuf>,
    pub(crate) format: String,
    pub(crate) generator: Generator,
    pub(crate) passes: Vec<Pass>,
    pub(crate) root_passes: Vec<PassIndex>,
    pub(crate) pass_by_id: HashMap<String, PassIndex>,
    pub(crate) records: Vec<Record>,
}

impl TranslationUnit {
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Every pass in document order, nested passes included
    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Passes that are not a sub-pass of another pass
    pub fn root_passes(&self) -> impl Iterator<Item = &Pass> + '_ {
        self.root_passes.iter().map(move |idx| &self.passes[idx.0])
    }

    pub fn pass(&self, index: PassIndex) -> &Pass {
        &self.passes[index.0]
    }

    pub fn pass_by_id(&self, id: &str) -> Option<&Pass> {
        self.pass_by_id.get(id).map(|idx| &self.passes[idx.0])
    }

    /// The pass a record was emitted by, if it names one
    pub fn pass_of(&self, record: &Record) -> Option<&Pass> {
        record.pass.map(|idx| self.pass(idx))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// All records, depth-first, parents before children
    pub fn iter_all_records(&self) -> Walk<'_> {
        Walk::new(&self.records)
    }

    pub(crate) fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Keep only the top-level records for which `keep` returns true
    pub(crate) fn retain_records<F>(mut self, mut keep: F) -> Self
    where
        F: FnMut(&TranslationUnit, &Record) -> bool,
    {
        let records = std::mem::take(&mut self.records);
        let kept = records.into_iter().filter(|r| keep(&self, r)).collect();
        self.records = kept;
        self
    }
}
