//! Builds a `TranslationUnit` from a parsed optimization-record document.
//!
//! The document is a 3-element array `[metadata, passes, records]`.
//! Passes are registered in the unit's id table as they are parsed, so
//! every record must name a pass that was declared in the pass list.

use super::model::{
    Block, Cfg, Count, Edge, Generator, ImplLocation, InliningNode, Location, MessageItem, Pass,
    PassIndex, Record, RecordBody, RecordKind, Remark, StateSnapshot, TranslationUnit,
};
use crate::utils::config::{ParseOptions, STATE_KIND};
use crate::utils::error::ParseError;
use log::debug;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

type Object = Map<String, Value>;

/// Partially built unit; passes land here before records are read
struct UnitBuilder {
    passes: Vec<Pass>,
    pass_by_id: HashMap<String, PassIndex>,
    options: ParseOptions,
}

/// Parse a whole document into a translation unit
///
/// **Public** - main entry point for parsing
///
/// # Errors
/// * `ParseError::MalformedDocument` - wrong top-level shape or missing required fields
/// * `ParseError::UnknownPassId` - a record names a pass that was never declared
/// * `ParseError::UnrecognizedMessageItem` - a message element has no known shape
/// * `ParseError::UndefinedBlock` - a CFG edge points at a missing block
pub fn parse_translation_unit(
    document: &Value,
    options: ParseOptions,
) -> Result<TranslationUnit, ParseError> {
    let parts = document
        .as_array()
        .filter(|parts| parts.len() == 3)
        .ok_or_else(|| {
            ParseError::MalformedDocument(
                "expected a 3-element array [metadata, passes, records]".to_string(),
            )
        })?;

    let metadata = as_object(&parts[0], "metadata")?;
    let format = scalar_string(metadata, "format", "metadata")?;
    let generator = parse_generator(required(metadata, "generator", "metadata")?)?;

    let mut builder = UnitBuilder {
        passes: Vec::new(),
        pass_by_id: HashMap::new(),
        options,
    };

    let root_passes = as_array(&parts[1], "pass list")?
        .iter()
        .map(|p| builder.parse_pass(p))
        .collect::<Result<Vec<_>, _>>()?;

    let records = as_array(&parts[2], "record list")?
        .iter()
        .map(|r| builder.parse_record(r))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Parsed {} passes and {} top-level records (format {})",
        builder.passes.len(),
        records.len(),
        format
    );

    Ok(TranslationUnit {
        filename: None,
        format,
        generator,
        passes: builder.passes,
        root_passes,
        pass_by_id: builder.pass_by_id,
        records,
    })
}

fn parse_generator(value: &Value) -> Result<Generator, ParseError> {
    let obj = as_object(value, "generator")?;
    Ok(Generator {
        name: scalar_string(obj, "name", "generator")?,
        pkgversion: scalar_string(obj, "pkgversion", "generator")?,
        version: scalar_string(obj, "version", "generator")?,
        target: scalar_string(obj, "target", "generator")?,
    })
}

impl UnitBuilder {
    /// Parse a pass and its sub-passes, registering each id before descending
    fn parse_pass(&mut self, value: &Value) -> Result<PassIndex, ParseError> {
        let obj = as_object(value, "pass")?;
        let id = scalar_string(obj, "id", "pass")?;

        if self.pass_by_id.contains_key(&id) {
            return Err(ParseError::MalformedDocument(format!(
                "duplicate pass id {}",
                id
            )));
        }

        let optgroups = string_set(required(obj, "optgroups", "pass")?, "optgroups")?;

        let index = PassIndex(self.passes.len());
        self.passes.push(Pass {
            id: id.clone(),
            name: string_field(obj, "name", "pass")?,
            num: required(obj, "num", "pass")?.as_i64().ok_or_else(|| {
                ParseError::MalformedDocument(format!("pass {}: 'num' is not an integer", id))
            })?,
            optgroups,
            pass_type: string_field(obj, "type", "pass")?,
            children: Vec::new(),
        });
        self.pass_by_id.insert(id, index);

        if let Some(children) = obj.get("children") {
            let children = as_array(children, "pass children")?
                .iter()
                .map(|c| self.parse_pass(c))
                .collect::<Result<Vec<_>, _>>()?;
            self.passes[index.0].children = children;
        }

        Ok(index)
    }

    /// Parse one record, dispatching on its kind tag
    fn parse_record(&self, value: &Value) -> Result<Record, ParseError> {
        let obj = as_object(value, "record")?;
        let kind_tag = string_field(obj, "kind", "record")?;

        let pass = match obj.get("pass") {
            Some(id) => {
                let id = scalar_to_string(id)
                    .ok_or_else(|| ParseError::MalformedDocument(format!("bad pass id {}", id)))?;
                Some(
                    *self
                        .pass_by_id
                        .get(&id)
                        .ok_or(ParseError::UnknownPassId(id))?,
                )
            }
            None => None,
        };

        let function = optional_string(obj, "function", "record")?;

        let body = if kind_tag == STATE_KIND {
            RecordBody::State(self.parse_state(obj)?)
        } else {
            RecordBody::Remark(self.parse_remark(obj)?)
        };

        Ok(Record {
            kind: RecordKind::from_tag(&kind_tag),
            pass,
            function,
            body,
        })
    }

    fn parse_remark(&self, obj: &Object) -> Result<Remark, ParseError> {
        let message = as_array(required(obj, "message", "record")?, "message")?
            .iter()
            .map(|item| self.parse_message_item(item))
            .collect::<Result<Vec<_>, _>>()?;

        let inlining_chain = match obj.get("inlining_chain") {
            Some(chain) => Some(
                as_array(chain, "inlining_chain")?
                    .iter()
                    .map(parse_inlining_node)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        let children = match obj.get("children") {
            Some(children) => as_array(children, "record children")?
                .iter()
                .map(|c| self.parse_record(c))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(Remark {
            impl_location: obj.get("impl_location").map(parse_impl_location).transpose()?,
            message,
            count: obj.get("count").map(parse_count).transpose()?,
            location: obj.get("location").map(parse_location).transpose()?,
            inlining_chain,
            children,
        })
    }

    fn parse_state(&self, obj: &Object) -> Result<StateSnapshot, ParseError> {
        Ok(StateSnapshot {
            cfg: obj.get("cfg").map(parse_cfg).transpose()?,
        })
    }

    fn parse_message_item(&self, value: &Value) -> Result<MessageItem, ParseError> {
        if let Some(text) = value.as_str() {
            return Ok(MessageItem::Text {
                text: text.to_string(),
            });
        }

        let obj = value
            .as_object()
            .ok_or_else(|| ParseError::UnrecognizedMessageItem(value.to_string()))?;
        let location = obj.get("location").map(parse_location).transpose()?;

        if obj.contains_key("expr") {
            Ok(MessageItem::Expr {
                expr: string_field(obj, "expr", "message item")?,
                location,
            })
        } else if obj.contains_key("stmt") {
            Ok(MessageItem::Stmt {
                stmt: string_field(obj, "stmt", "message item")?,
                location,
            })
        } else if obj.contains_key("symtab_node") {
            Ok(MessageItem::SymtabNode {
                node: string_field(obj, "symtab_node", "message item")?,
                location,
            })
        } else if self.options.symtab_name_synonym && obj.contains_key("name") {
            Ok(MessageItem::SymtabNode {
                node: string_field(obj, "name", "message item")?,
                location,
            })
        } else {
            Err(ParseError::UnrecognizedMessageItem(value.to_string()))
        }
    }
}

fn parse_location(value: &Value) -> Result<Location, ParseError> {
    let obj = as_object(value, "location")?;
    Ok(Location {
        file: string_field(obj, "file", "location")?,
        line: u32_field(obj, "line", "location")?,
        column: u32_field(obj, "column", "location")?,
    })
}

fn parse_impl_location(value: &Value) -> Result<ImplLocation, ParseError> {
    let obj = as_object(value, "impl_location")?;
    Ok(ImplLocation {
        file: string_field(obj, "file", "impl_location")?,
        line: u32_field(obj, "line", "impl_location")?,
        function: string_field(obj, "function", "impl_location")?,
    })
}

fn parse_inlining_node(value: &Value) -> Result<InliningNode, ParseError> {
    let obj = as_object(value, "inlining node")?;
    Ok(InliningNode {
        fndecl: string_field(obj, "fndecl", "inlining node")?,
        site: obj.get("site").map(parse_location).transpose()?,
    })
}

/// Parse an execution count; values may be integers or (non-negative) floats
fn parse_count(value: &Value) -> Result<Count, ParseError> {
    let obj = as_object(value, "count")?;
    let quality = string_field(obj, "quality", "count")?;
    let raw = required(obj, "value", "count")?;

    let value = if let Some(n) = raw.as_u64() {
        n
    } else if let Some(f) = raw.as_f64().filter(|f| *f >= 0.0 && f.is_finite()) {
        f as u64
    } else {
        return Err(ParseError::InvalidCount(raw.to_string()));
    };

    Ok(Count { quality, value })
}

/// Parse a CFG, building the block table before resolving any edge
fn parse_cfg(value: &Value) -> Result<Cfg, ParseError> {
    let raw_blocks = as_array(value, "cfg")?;

    let mut blocks = Vec::with_capacity(raw_blocks.len());
    let mut position_of: HashMap<u64, usize> = HashMap::new();
    for raw in raw_blocks {
        let obj = as_object(raw, "block")?;
        let index = required(obj, "index", "block")?.as_u64().ok_or_else(|| {
            ParseError::MalformedDocument("block 'index' is not a non-negative integer".to_string())
        })?;

        if position_of.insert(index, blocks.len()).is_some() {
            return Err(ParseError::MalformedDocument(format!(
                "duplicate block index {}",
                index
            )));
        }

        blocks.push(Block {
            index,
            flags: match obj.get("flags") {
                Some(flags) => string_set(flags, "block flags")?,
                None => BTreeSet::new(),
            },
            stmts: obj.get("stmts").map(stmts_text),
        });
    }

    let mut edges = Vec::new();
    for (src, raw) in raw_blocks.iter().enumerate() {
        let Some(succs) = raw.get("succs") else {
            continue;
        };
        for succ in as_array(succs, "succs")? {
            let succ_obj = as_object(succ, "edge")?;
            let dest_index = required(succ_obj, "dest", "edge")?.as_u64().ok_or_else(|| {
                ParseError::MalformedDocument("edge 'dest' is not a block index".to_string())
            })?;
            let dest = *position_of
                .get(&dest_index)
                .ok_or(ParseError::UndefinedBlock {
                    block: blocks[src].index,
                    dest: dest_index,
                })?;

            edges.push(Edge {
                src,
                dest,
                flags: match succ_obj.get("flags") {
                    Some(flags) => string_set(flags, "edge flags")?,
                    None => BTreeSet::new(),
                },
            });
        }
    }

    Ok(Cfg { blocks, edges })
}

/// Statement dumps arrive either as one string or as a list of lines
fn stmts_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(lines) => lines
            .iter()
            .map(|l| l.as_str().map(str::to_string).unwrap_or_else(|| l.to_string()))
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}

// Field access helpers. All of them turn shape problems into MalformedDocument.

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, ParseError> {
    value
        .as_object()
        .ok_or_else(|| ParseError::MalformedDocument(format!("{} is not an object", what)))
}

fn as_array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, ParseError> {
    value
        .as_array()
        .ok_or_else(|| ParseError::MalformedDocument(format!("{} is not an array", what)))
}

fn required<'a>(obj: &'a Object, key: &str, what: &str) -> Result<&'a Value, ParseError> {
    obj.get(key)
        .ok_or_else(|| ParseError::MalformedDocument(format!("{} is missing '{}'", what, key)))
}

fn string_field(obj: &Object, key: &str, what: &str) -> Result<String, ParseError> {
    required(obj, key, what)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ParseError::MalformedDocument(format!("{}: '{}' is not a string", what, key))
        })
}

fn optional_string(obj: &Object, key: &str, what: &str) -> Result<Option<String>, ParseError> {
    match obj.get(key) {
        Some(_) => string_field(obj, key, what).map(Some),
        None => Ok(None),
    }
}

/// Like `string_field`, but also accepts numbers (ids and versions are sometimes numeric)
fn scalar_string(obj: &Object, key: &str, what: &str) -> Result<String, ParseError> {
    let value = required(obj, key, what)?;
    scalar_to_string(value).ok_or_else(|| {
        ParseError::MalformedDocument(format!("{}: '{}' is not a string or number", what, key))
    })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn u32_field(obj: &Object, key: &str, what: &str) -> Result<u32, ParseError> {
    required(obj, key, what)?
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            ParseError::MalformedDocument(format!("{}: '{}' is not a valid number", what, key))
        })
}

fn string_set(value: &Value, what: &str) -> Result<BTreeSet<String>, ParseError> {
    as_array(value, what)?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ParseError::MalformedDocument(format!("{} must be strings", what)))
        })
        .collect()
}
