use predicates::prelude::*;

mod common;

#[test]
fn test_list_empty_shows_header() {
    let mut ctx = common::obsdisk();
    ctx.cmd
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("NAME"))
        .stdout(predicate::str::contains("TYPE"))
        .stdout(predicate::str::contains("CREATED"));
}

#[test]
fn test_list_json() {
    let ctx = common::obsdisk();
    ctx.create_volume("a");
    ctx.create_volume("b");

    let output = ctx
        .new_cmd()
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "a");
    assert_eq!(records[0]["obsType"], "oss");
    assert!(records[1]["createdAt"].is_string());
}

#[test]
fn test_list_alias_ls() {
    let mut ctx = common::obsdisk();
    ctx.cmd.arg("ls").assert().success();
}
