use std::fs;
use std::process::Command;

use mapforge::model::{Mapping, MappingModel};

fn run(args: &[&str]) -> std::process::Output {
    let exe = env!("CARGO_BIN_EXE_mapforge-cli");
    Command::new(exe)
        .args(args)
        .output()
        .expect("run mapforge-cli")
}

fn write_model(path: &std::path::Path, model: &MappingModel) {
    fs::write(path, serde_json::to_string_pretty(model).unwrap()).unwrap();
}

#[test]
fn test_cli_generate_parse_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.json");
    let script_path = dir.path().join("script.py");
    let recovered_path = dir.path().join("recovered.json");

    let mut model = MappingModel::new();
    let main = model.main_mut().unwrap();
    main.push_mapping(Mapping::direct("CUSTOMER.NAME", "customer.name"));
    main.push_mapping(Mapping::direct("CUSTOMER.CITY", "customer.address.city"));
    write_model(&model_path, &model);

    let out = run(&[
        "generate",
        "--model",
        model_path.to_str().unwrap(),
        "--output",
        script_path.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let script = fs::read_to_string(&script_path).unwrap();
    assert!(script.starts_with("#!/usr/bin/env python3\n"));
    assert!(script.contains("def transform(INPUT):"));

    let out = run(&[
        "parse",
        "--script",
        script_path.to_str().unwrap(),
        "--output",
        recovered_path.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Recovered 2 mapping(s)"), "{stdout}");

    let recovered: MappingModel =
        serde_json::from_str(&fs::read_to_string(&recovered_path).unwrap()).unwrap();
    assert_eq!(recovered.total_mappings(), 2);
}

#[test]
fn test_cli_diff_reports_changes() {
    let dir = tempfile::tempdir().unwrap();
    let original_model = {
        let mut m = MappingModel::new();
        m.main_mut().unwrap().push_mapping(Mapping::direct("x", "a"));
        m
    };
    let current_model = {
        let mut m = MappingModel::new();
        let main = m.main_mut().unwrap();
        main.push_mapping(Mapping::direct("x", "b"));
        main.push_mapping(Mapping::direct("y", "c"));
        m
    };

    let original_py = dir.path().join("original.py");
    let current_py = dir.path().join("current.py");
    fs::write(
        &original_py,
        mapforge::generator::generate_script(&original_model),
    )
    .unwrap();
    fs::write(
        &current_py,
        mapforge::generator::generate_script(&current_model),
    )
    .unwrap();

    let out = run(&[
        "diff",
        "--original",
        original_py.to_str().unwrap(),
        "--current",
        current_py.to_str().unwrap(),
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("added: 1  removed: 0  modified: 1  unchanged: 0"),
        "{stdout}"
    );
    assert!(stdout.contains("+ main/field:y"), "{stdout}");
    assert!(stdout.contains("~ main/field:x (a -> b)"), "{stdout}");
}

#[test]
fn test_cli_parse_without_mappings_is_non_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "just some notes\nno template here\n").unwrap();

    let out = run(&["parse", "--script", path.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("No mappings found"), "{stdout}");
}

#[test]
fn test_cli_automap_emits_script() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.json");
    let output = dir.path().join("output.json");
    fs::write(&input, r#"{"customer": {"firstName": "Ada"}}"#).unwrap();
    fs::write(&output, r#"{"CUSTOMER": {"FIRST_NAME": ""}}"#).unwrap();

    let out = run(&[
        "automap",
        "--input-schema",
        input.to_str().unwrap(),
        "--output-schema",
        output.to_str().unwrap(),
        "--emit-script",
    ]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Auto-mapped 1 of"), "{stdout}");
    assert!(
        stdout.contains("OUTPUT[\"CUSTOMER\"][\"FIRST_NAME\"] = INPUT.customer.firstName"),
        "{stdout}"
    );
}

#[test]
fn test_cli_index_lists_flattened_fields() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("record.json");
    fs::write(&schema, r#"{"order": {"id": 1, "total": 9.5}}"#).unwrap();

    let out = run(&["index", "--schema", schema.to_str().unwrap()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("order (object)"), "{stdout}");
    assert!(stdout.contains("order.id (number)"), "{stdout}");
    assert!(stdout.contains("3 field(s)."), "{stdout}");
}
