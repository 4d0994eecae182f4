use std::fs;

use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("fieldctl"))
        .stdout(contains("settings"));
}

#[test]
fn prints_choice_inline() {
    let caller = r#"{
        "class": "inline",
        "fieldInfo": {
            "field": "Priority",
            "fieldId": "3",
            "jsonConfig": {"options": {"choices": [{"id": "A", "label": "Alpha"}, {"id": "B", "label": "Beta"}]}},
            "jsonValue": {"choice": "B"}
        }
    }"#;
    let dir = tempfile::tempdir().unwrap();
    let caller_path = dir.path().join("caller.json");
    fs::write(&caller_path, caller).unwrap();
    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.args(["print", "--field-type", "choice", "--caller"])
        .arg(&caller_path)
        .assert()
        .success()
        .stdout(contains("Beta"));
}

#[test]
fn print_without_field_fails() {
    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.args(["print", "--field-type", "text", "--caller", "{}"])
        .assert()
        .failure()
        .stderr(contains("without passing a field"));
}

#[test]
fn settings_advanced_edit_is_saved_to_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.json");
    let edit = dir.path().join("edit.json");
    fs::write(&edit, r#"{"size": "xl"}"#).unwrap();

    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.arg("settings")
        .arg("--store")
        .arg(&store)
        .arg("--advanced")
        .arg(&edit)
        .arg("--save")
        .assert()
        .success()
        .stdout(contains("size: xl"))
        .stdout(contains("dirty: true"));

    let saved = fs::read_to_string(&store).unwrap();
    assert!(saved.contains("fieldctlCustomerSettings"));
    assert!(saved.contains(r#"\"size\":\"xl\""#));

    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.arg("settings")
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(contains("size: xl"))
        .stdout(contains("dirty: false"));
}

#[test]
fn project_settings_need_an_item_to_save() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("store.json");
    let mut cmd = cargo::cargo_bin_cmd!("fieldctl");
    cmd.arg("settings")
        .arg("--store")
        .arg(&store)
        .args(["--scope", "project", "--save"])
        .assert()
        .failure()
        .stderr(contains("no item is selected"));
}
