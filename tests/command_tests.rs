mod common;

use common::{document, loc, remark};
use optrecord_studio::commands::{execute_report, validate_args, validate_record_file, ReportArgs};
use optrecord_studio::filter::FilterConfig;
use optrecord_studio::output::read_summary;
use serde_json::json;
use std::fs;
use std::path::Path;

fn write_record_file(path: &Path, records: serde_json::Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_vec(&document(records)).unwrap()).unwrap();
}

#[test]
fn test_report_end_to_end() {
    let build = tempfile::tempdir().unwrap();
    write_record_file(
        &build.path().join("obj/a.c.opt-record.json"),
        json!([
            remark("success", "hot", Some(("precise", 900)), Some(loc("src/a.c", 3))),
            remark("note", "gen", Some(("precise", 9000)), Some(loc("obj/insn-emit.c", 1))),
        ]),
    );
    write_record_file(
        &build.path().join("obj/b.c.opt-record.json"),
        json!([remark("failure", "cold", Some(("guessed", 50_000)), Some(loc("src/b.c", 7)))]),
    );

    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("summary.json");
    let html_dir = out.path().join("html");

    let args = ReportArgs {
        build_dir: build.path().to_path_buf(),
        output_dir: Some(html_dir.clone()),
        output_json: Some(json_path.clone()),
        print_summary: false,
        ..Default::default()
    };

    validate_args(&args).unwrap();
    execute_report(args).unwrap();

    assert!(html_dir.join("index.html").is_file());
    assert!(html_dir.join("src|a.c.html").is_file());
    assert!(!html_dir.join("obj|insn-emit.c.html").exists());

    let summary = read_summary(&json_path).unwrap();
    assert_eq!(summary.translation_units, 2);
    assert!(summary.precise_counts_only);
    assert_eq!(summary.hottest_records.len(), 2);
    assert_eq!(summary.hottest_records[0].function.as_deref(), Some("hot"));
    assert_eq!(summary.hottest_records[0].count, Some(900));
    assert_eq!(summary.hottest_records[1].count, None);
}

#[test]
fn test_report_without_filter_keeps_noise() {
    let build = tempfile::tempdir().unwrap();
    write_record_file(
        &build.path().join("a.c.opt-record.json"),
        json!([remark("note", "gen", None, Some(loc("obj/insn-emit.c", 1)))]),
    );

    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("summary.json");
    let args = ReportArgs {
        build_dir: build.path().to_path_buf(),
        output_json: Some(json_path.clone()),
        print_summary: false,
        filter: FilterConfig::disabled(),
        ..Default::default()
    };

    execute_report(args).unwrap();
    assert_eq!(read_summary(&json_path).unwrap().hottest_records.len(), 1);
}

#[test]
fn test_report_invalid_file_aborts_or_skips() {
    let build = tempfile::tempdir().unwrap();
    write_record_file(
        &build.path().join("good.opt-record.json"),
        json!([remark("success", "ok", None, None)]),
    );
    write_record_file(
        &build.path().join("bad.opt-record.json"),
        json!([{"kind": "note", "pass": "0xdead", "message": []}]),
    );

    let out = tempfile::tempdir().unwrap();
    let json_path = out.path().join("summary.json");
    let args = ReportArgs {
        build_dir: build.path().to_path_buf(),
        output_json: Some(json_path.clone()),
        print_summary: false,
        ..Default::default()
    };

    assert!(execute_report(args.clone()).is_err());
    assert!(!json_path.exists());

    execute_report(ReportArgs {
        skip_invalid: true,
        ..args
    })
    .unwrap();
    assert_eq!(read_summary(&json_path).unwrap().translation_units, 1);
}

#[test]
fn test_validate_args_rejects_file_output_dir() {
    let build = tempfile::tempdir().unwrap();
    let taken = build.path().join("taken");
    fs::write(&taken, "x").unwrap();

    let args = ReportArgs {
        build_dir: build.path().to_path_buf(),
        output_dir: Some(taken),
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());

    let args = ReportArgs {
        build_dir: build.path().to_path_buf(),
        top_records: 10_001,
        ..Default::default()
    };
    assert!(validate_args(&args).is_err());
}

#[test]
fn test_validate_record_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("x.opt-record.json");
    write_record_file(&good, json!([remark("success", "f", None, None)]));
    assert!(validate_record_file(&good, Default::default()).is_ok());

    let bad = dir.path().join("y.opt-record.json");
    fs::write(&bad, "[]").unwrap();
    assert!(validate_record_file(&bad, Default::default()).is_err());
}
