use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;

#[test]
fn extract_from_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("fragment.templ");
    fs::write(&path, "if x > 3 {\n<div>big</div>\n}").expect("write fragment");

    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("extract").arg(&path);
    cmd.assert().success().stdout("if x > 3 {\n");
}

#[test]
fn extract_from_stdin() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("extract").write_stdin("components.Other() }</span>");
    cmd.assert().success().stdout("components.Other()\n");
}

#[test]
fn extract_as_json() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.args(["extract", "--format", "json"])
        .write_stdin("for _, item := range items {\n<li>{ item }</li>\n}");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(value["category"], "for");
    assert_eq!(value["expression"], "for _, item := range items {");
    assert!(value["error"].is_null());
}

#[test]
fn extract_with_explicit_category() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.args(["extract", "--category", "children"])
        .write_stdin("children...}");
    cmd.assert().success().stdout("children\n");
}

#[test]
fn syntax_error_exits_with_one() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("extract")
        .write_stdin("if x := ; x > 3 {\n<div>\n</div>}");
    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(
            predicate::str::contains("1:9: expected operand, found ';'")
                .and(predicate::str::contains(">>   1 | if x := ; x > 3 {")),
        );
}

#[test]
fn syntax_error_as_json() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.args(["extract", "-f", "json"])
        .write_stdin("case 1 +:\n<div>x</div>");

    let output = cmd.assert().code(1).get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    assert_eq!(value["category"], "case");
    assert_eq!(value["error"]["offset"], 8);
    assert_eq!(value["error"]["line"], 1);
    assert_eq!(value["error"]["column"], 9);
}

#[test]
fn config_file_enables_category_prefix() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[output]\nshow_category = true\n").expect("write config");

    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("extract")
        .arg("--config")
        .arg(&config)
        .write_stdin("switch x {\ncase 1:\n}");
    cmd.assert().success().stdout("switch: switch x {\n");
}

#[test]
fn local_config_is_picked_up() {
    let dir = tempfile::tempdir().expect("temp dir");
    fs::write(dir.path().join("goexpr.toml"), "[output]\nformat = \"json\"\n")
        .expect("write config");

    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.current_dir(dir.path())
        .arg("extract")
        .write_stdin("title }");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"expression\": \"title\""));
}

#[test]
fn missing_config_file_is_an_error() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.args(["extract", "--config", "/nonexistent/goexpr.toml"])
        .write_stdin("x }");
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn tokens_as_json() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("tokens").write_stdin("f(a)\n");

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    let tokens = value.as_array().expect("token array");
    let kinds: Vec<&str> = tokens
        .iter()
        .map(|t| t["token"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(kinds, ["IDENT", "(", "IDENT", ")", ";", "EOF"]);
    assert_eq!(tokens[4]["text"], "\n");
}

#[test]
fn ast_lists_errors() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.arg("ast").write_stdin("if x {\n<div>");
    cmd.assert().success().stdout(
        predicate::str::contains("IfStmt").and(predicate::str::contains("error: ")),
    );
}

#[test]
fn unknown_category_is_rejected() {
    let mut cmd = cargo_bin_cmd!("goexpr");
    cmd.args(["extract", "--category", "while"]).write_stdin("x");
    cmd.assert().failure();
}
