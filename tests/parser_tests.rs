mod common;

use common::{document, metadata, passes, unit};
use flate2::write::GzEncoder;
use flate2::Compression;
use optrecord_studio::parser::{
    find_records, load_translation_unit, parse_translation_unit, MessageItem, RecordKind,
};
use optrecord_studio::utils::error::{LoadError, ParseError};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;

#[test]
fn test_parse_minimal_document() {
    let tu = unit(json!([
        {"kind": "success", "pass": "0x1", "function": "main", "message": ["loop vectorized"]}
    ]));

    assert_eq!(tu.format(), "1");
    assert_eq!(tu.generator().name, "GNU C17");
    assert_eq!(tu.generator().target, "x86_64-pc-linux-gnu");
    assert_eq!(tu.records().len(), 1);
    assert_eq!(tu.records()[0].kind, RecordKind::Success);
    assert_eq!(tu.records()[0].function.as_deref(), Some("main"));
}

#[test]
fn test_record_pass_is_the_declared_pass() {
    let tu = unit(json!([
        {"kind": "success", "pass": "0x1", "message": ["ok"]}
    ]));

    let record = &tu.records()[0];
    let via_record = tu.pass_of(record).unwrap();
    let via_id = tu.pass_by_id("0x1").unwrap();

    assert!(std::ptr::eq(via_record, via_id));
    assert_eq!(via_record.name, "vect");
    assert!(via_record.optgroups.contains("vec"));
}

#[test]
fn test_nested_passes_are_registered() {
    let tu = unit(json!([
        {"kind": "note", "pass": "0x3", "message": ["inlined"]}
    ]));

    assert_eq!(tu.passes().len(), 4);
    assert_eq!(tu.root_passes().count(), 3);

    let inline = tu.pass_by_id("0x2").unwrap();
    assert_eq!(inline.children.len(), 1);
    assert_eq!(tu.pass(inline.children[0]).name, "einline");
    assert_eq!(tu.pass_of(&tu.records()[0]).unwrap().name, "einline");
}

#[test]
fn test_unknown_pass_id_aborts() {
    let doc = json!([
        metadata(),
        [{"id": "P1", "name": "vect", "num": 1, "optgroups": [], "type": "gimple"}],
        [
            {"kind": "success", "pass": "P1", "message": ["fine"]},
            {"kind": "success", "pass": "P99", "message": ["broken"]}
        ]
    ]);

    let err = parse_translation_unit(&doc, Default::default()).unwrap_err();
    match err {
        ParseError::UnknownPassId(id) => assert_eq!(id, "P99"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_unknown_pass_id_in_nested_record() {
    let doc = document(json!([
        {
            "kind": "scope",
            "pass": "0x1",
            "message": ["considering loop"],
            "children": [{"kind": "failure", "pass": "0x99", "message": ["no"]}]
        }
    ]));

    assert!(matches!(
        parse_translation_unit(&doc, Default::default()),
        Err(ParseError::UnknownPassId(_))
    ));
}

#[test]
fn test_message_item_dispatch() {
    let tu = unit(json!([
        {
            "kind": "success",
            "message": [
                "inlined ",
                {"symtab_node": "foo/3", "location": {"file": "a.c", "line": 4, "column": 1}},
                " into ",
                {"expr": "x + 1"},
                {"stmt": "x_2 = x_1 + 1;\n"}
            ]
        }
    ]));

    let message = tu.records()[0].message();
    assert_eq!(message.len(), 5);
    assert!(message[0].is_text());
    assert!(matches!(&message[1], MessageItem::SymtabNode { node, .. } if node == "foo/3"));
    assert_eq!(message[1].location().unwrap().line, 4);
    assert!(matches!(&message[3], MessageItem::Expr { location: None, .. }));
    assert!(matches!(&message[4], MessageItem::Stmt { .. }));
}

#[test]
fn test_unrecognized_message_item() {
    let doc = document(json!([
        {"kind": "note", "message": [{"type": "mystery"}]}
    ]));

    assert!(matches!(
        parse_translation_unit(&doc, Default::default()),
        Err(ParseError::UnrecognizedMessageItem(_))
    ));
}

#[test]
fn test_optional_fields_absent_vs_zero() {
    let tu = unit(json!([
        {"kind": "note", "message": []},
        {"kind": "note", "message": [], "count": {"quality": "precise", "value": 0}}
    ]));

    assert!(tu.records()[0].count().is_none());
    assert_eq!(tu.records()[1].count().unwrap().value, 0);
    assert!(tu.records()[0].location().is_none());
    assert!(tu.records()[0].inlining_chain().is_none());
    assert!(tu.records()[0].impl_location().is_none());
    assert!(tu.records()[0].pass.is_none());
}

#[test]
fn test_full_remark_fields() {
    let tu = unit(json!([
        {
            "kind": "failure",
            "pass": "0x1",
            "function": "compute",
            "impl_location": {
                "file": "../../src/gcc/tree-vect-loop.cc",
                "line": 3012,
                "function": "vect_analyze_loop"
            },
            "message": ["couldn't vectorize loop"],
            "count": {"quality": "guessed_local", "value": 955630224},
            "location": {"file": "compute.c", "line": 10, "column": 5},
            "inlining_chain": [
                {"fndecl": "helper"},
                {"fndecl": "compute", "site": {"file": "compute.c", "line": 30, "column": 7}}
            ]
        }
    ]));

    let record = &tu.records()[0];
    assert_eq!(record.kind, RecordKind::Failure);
    assert_eq!(record.impl_location().unwrap().function, "vect_analyze_loop");
    assert_eq!(record.count().unwrap().quality, "guessed_local");
    assert!(!record.count().unwrap().is_precise());
    assert_eq!(record.location().unwrap().to_string(), "compute.c:10:5");

    let chain = record.inlining_chain().unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].fndecl, "helper");
    assert!(chain[0].site.is_none());
    assert_eq!(chain[1].site.as_ref().unwrap().line, 30);
}

#[test]
fn test_nested_children_and_traversal() {
    let tu = unit(json!([
        {
            "kind": "scope",
            "message": ["analyzing loop"],
            "children": [
                {"kind": "note", "message": ["step 1"], "children": [
                    {"kind": "note", "message": ["step 1a"]}
                ]},
                {"kind": "failure", "message": ["step 2"]}
            ]
        },
        {"kind": "success", "message": ["done"]}
    ]));

    assert_eq!(tu.records().len(), 2);
    assert_eq!(tu.records()[0].children().len(), 2);
    assert_eq!(tu.records()[0].iter_all_descendants().count(), 3);

    let kinds: Vec<_> = tu
        .iter_all_records()
        .map(|r| r.kind.as_str().to_string())
        .collect();
    assert_eq!(kinds, vec!["scope", "note", "note", "failure", "success"]);
}

#[test]
fn test_state_record_with_cfg() {
    let tu = unit(json!([
        {
            "kind": "state",
            "pass": "0x1",
            "function": "main",
            "cfg": [
                {"index": 0, "flags": ["ENTRY"], "succs": [{"dest": 2, "flags": ["FALLTHRU"]}]},
                {"index": 1, "flags": ["EXIT"], "succs": []},
                {"index": 2, "flags": [], "stmts": "return 0;", "succs": [{"dest": 1, "flags": []}]}
            ]
        }
    ]));

    let record = &tu.records()[0];
    assert!(record.is_state());
    assert_eq!(record.kind, RecordKind::State);
    assert!(record.message().is_empty());
    assert!(record.children().is_empty());

    let cfg = record.cfg().unwrap();
    assert_eq!(cfg.blocks.len(), 3);
    assert_eq!(cfg.edges.len(), 2);

    let from_entry: Vec<_> = cfg.successors(0).map(|b| b.index).collect();
    assert_eq!(from_entry, vec![2]);
    assert!(cfg.edges[0].flags.contains("FALLTHRU"));
    assert_eq!(
        cfg.block_by_index(2).unwrap().stmts.as_deref(),
        Some("return 0;")
    );
}

#[test]
fn test_cfg_edge_to_undefined_block() {
    let doc = document(json!([
        {
            "kind": "state",
            "cfg": [
                {"index": 0, "flags": [], "succs": [{"dest": 5, "flags": []}]},
                {"index": 1, "flags": [], "succs": []},
                {"index": 2, "flags": [], "succs": []}
            ]
        }
    ]));

    match parse_translation_unit(&doc, Default::default()) {
        Err(ParseError::UndefinedBlock { block, dest }) => {
            assert_eq!(block, 0);
            assert_eq!(dest, 5);
        }
        other => panic!("expected UndefinedBlock, got {:?}", other),
    }
}

#[test]
fn test_malformed_top_level() {
    for doc in [
        json!({"format": "1"}),
        json!([metadata(), passes()]),
        json!([{"generator": metadata()["generator"].clone()}, [], []]),
        json!([metadata(), {}, []]),
    ] {
        assert!(matches!(
            parse_translation_unit(&doc, Default::default()),
            Err(ParseError::MalformedDocument(_))
        ));
    }
}

#[test]
fn test_load_gzip_and_plain_files() {
    let dir = tempfile::tempdir().unwrap();
    let doc = document(json!([{"kind": "note", "message": ["hello"]}]));
    let bytes = serde_json::to_vec(&doc).unwrap();

    let gz_path = dir.path().join("a.c.opt-record.json.gz");
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&bytes).unwrap();
    std::fs::write(&gz_path, encoder.finish().unwrap()).unwrap();

    let plain_path = dir.path().join("sub").join("b.c.opt-record.json");
    std::fs::create_dir_all(plain_path.parent().unwrap()).unwrap();
    std::fs::write(&plain_path, &bytes).unwrap();

    std::fs::write(dir.path().join("unrelated.json"), b"not json").unwrap();

    let tu = load_translation_unit(&gz_path, Default::default()).unwrap();
    assert_eq!(tu.filename(), Some(gz_path.as_path()));
    assert_eq!(tu.records().len(), 1);

    let units = find_records(dir.path(), Default::default()).unwrap();
    assert_eq!(units.len(), 2);
    assert_eq!(units[0].filename(), Some(gz_path.as_path()));
    assert_eq!(units[1].filename(), Some(plain_path.as_path()));
}

#[test]
fn test_load_reports_parse_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.opt-record.json");
    std::fs::write(&path, b"[1, 2]").unwrap();

    match load_translation_unit(&path, Default::default()) {
        Err(LoadError::Parse { path: p, source }) => {
            assert_eq!(p, path);
            assert!(matches!(source, ParseError::MalformedDocument(_)));
        }
        other => panic!("expected parse error, got {:?}", other),
    }

    let garbage = dir.path().join("garbage.opt-record.json");
    std::fs::write(&garbage, b"{not json").unwrap();
    assert!(matches!(
        load_translation_unit(&garbage, Default::default()),
        Err(LoadError::Json { .. })
    ));
}
