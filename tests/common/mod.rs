#![allow(dead_code)]

use optrecord_studio::parser::{parse_translation_unit, TranslationUnit};
use serde_json::{json, Value};

pub fn metadata() -> Value {
    json!({
        "format": "1",
        "generator": {
            "name": "GNU C17",
            "pkgversion": "(GCC) ",
            "version": "13.2.0 20230801",
            "target": "x86_64-pc-linux-gnu"
        }
    })
}

pub fn passes() -> Value {
    json!([
        {
            "id": "0x1",
            "name": "vect",
            "num": 159,
            "optgroups": ["loop", "vec"],
            "type": "gimple"
        },
        {
            "id": "0x2",
            "name": "inline",
            "num": 84,
            "optgroups": ["inline"],
            "type": "ipa",
            "children": [
                {
                    "id": "0x3",
                    "name": "einline",
                    "num": 27,
                    "optgroups": ["inline"],
                    "type": "gimple"
                }
            ]
        },
        {
            "id": "0x4",
            "name": "*free_lang_data",
            "num": -1,
            "optgroups": [],
            "type": "simple_ipa"
        }
    ])
}

pub fn document(records: Value) -> Value {
    json!([metadata(), passes(), records])
}

pub fn unit(records: Value) -> TranslationUnit {
    parse_translation_unit(&document(records), Default::default()).unwrap()
}

pub fn loc(file: &str, line: u32) -> Value {
    json!({"file": file, "line": line, "column": 3})
}

/// A remark with a count and optional location
pub fn remark(
    kind: &str,
    function: &str,
    count: Option<(&str, u64)>,
    location: Option<Value>,
) -> Value {
    let mut record = json!({
        "kind": kind,
        "pass": "0x1",
        "function": function,
        "message": [format!("{} in {}", kind, function)]
    });
    if let Some((quality, value)) = count {
        record["count"] = json!({"quality": quality, "value": value});
    }
    if let Some(location) = location {
        record["location"] = location;
    }
    record
}
