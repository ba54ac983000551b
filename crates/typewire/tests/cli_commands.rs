#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::{Command, Output};

const SCORED: &str = r#"{
    "type": "record",
    "name": "Scored",
    "fields": [
        { "name": "id", "type": { "type": "int", "signed": true, "width": 4 } },
        { "name": "name", "type": { "type": "string" } },
        { "name": "scores", "type": { "type": "sequence",
          "element": { "type": "int", "signed": false, "width": 2 } } }
    ]
}"#;

const SCORED_HEX: &str = "fbffffff020000006f6b03000000010002000300";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "typewire-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn write_schema(tag: &str, text: &str) -> PathBuf {
    let path = unique_temp_dir(tag).join("schema.json");
    std::fs::write(&path, text).expect("schema should be writable");
    path
}

fn typewire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_typewire"))
        .args(args)
        .output()
        .expect("typewire should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn encode_record_matches_wire_layout() {
    let schema = write_schema("encode", SCORED);
    let output = typewire(&[
        "encode",
        schema.to_str().expect("utf-8 path"),
        "--json",
        r#"{"id":-5,"name":"ok","scores":[1,2,3]}"#,
        "--format",
        "json",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let json = stdout_json(&output);
    assert_eq!(json["hex"], SCORED_HEX);
    assert_eq!(json["size"], 20);
    assert_eq!(json["schema"], "record Scored");
}

#[test]
fn decode_hex_back_to_json() {
    let schema = write_schema("decode", SCORED);
    let output = typewire(&[
        "decode",
        schema.to_str().expect("utf-8 path"),
        "--hex",
        SCORED_HEX,
        "--format",
        "json",
    ]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({ "id": -5, "name": "ok", "scores": [1, 2, 3] })
    );
}

#[test]
fn decode_raw_file() {
    let schema = write_schema("decode-file", SCORED);
    let wire = schema.with_file_name("value.bin");
    std::fs::write(&wire, hex::decode(SCORED_HEX).expect("valid hex")).expect("writable");

    let output = typewire(&[
        "decode",
        schema.to_str().expect("utf-8 path"),
        "--file",
        wire.to_str().expect("utf-8 path"),
        "--format",
        "json",
    ]);

    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["scores"], serde_json::json!([1, 2, 3]));
}

#[test]
fn truncated_input_is_data_error() {
    let schema = write_schema("truncated", SCORED);
    let output = typewire(&[
        "decode",
        schema.to_str().expect("utf-8 path"),
        "--hex",
        "fbffffff0200",
    ]);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode failed"));
}

#[test]
fn trailing_bytes_are_rejected() {
    let schema = write_schema("trailing", r#"{ "type": "int", "signed": false, "width": 1 }"#);
    let output = typewire(&["decode", schema.to_str().expect("utf-8 path"), "--hex", "0102"]);

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn out_of_range_value_is_data_error() {
    let schema = write_schema("range", r#"{ "type": "int", "signed": false, "width": 1 }"#);
    let output = typewire(&["encode", schema.to_str().expect("utf-8 path"), "--json", "256"]);

    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn inspect_lists_layout() {
    let schema = write_schema("inspect", SCORED);
    let output = typewire(&["inspect", schema.to_str().expect("utf-8 path"), "--format", "json"]);

    assert!(output.status.success());
    let rows = stdout_json(&output);
    let paths: Vec<&str> = rows
        .as_array()
        .expect("layout should be an array")
        .iter()
        .filter_map(|row| row["path"].as_str())
        .collect();
    assert_eq!(paths, ["$", "$.id", "$.name", "$.scores", "$.scores[]"]);
}

#[test]
fn unsupported_width_is_data_error() {
    let schema = write_schema("width", r#"{ "type": "int", "signed": true, "width": 8 }"#);
    let output = typewire(&["inspect", schema.to_str().expect("utf-8 path")]);

    assert_eq!(output.status.code(), Some(60));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid schema"));
}

#[test]
fn missing_schema_is_not_found() {
    let output = typewire(&["inspect", "/nonexistent/typewire/schema.json"]);
    assert_eq!(output.status.code(), Some(66));
}

#[test]
fn conflicting_inputs_are_usage_error() {
    let output = typewire(&["decode", "schema.json", "--hex", "00", "--file", "x.bin"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn version_prints_package_version() {
    let output = typewire(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        format!("typewire {}", env!("CARGO_PKG_VERSION"))
    );
}
