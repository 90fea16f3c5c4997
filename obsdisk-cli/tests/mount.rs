use predicates::prelude::*;

mod common;

#[test]
fn test_mount_prints_mount_point() {
    let mut ctx = common::obsdisk();
    let mount_point = ctx.home.join("vols").join("d1");

    ctx.cmd
        .args(["mount", "d1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(mount_point.to_str().unwrap()));
}

#[test]
fn test_mount_multiple_partial_failure() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["mount", "d1", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to mount 1 of 2 volume(s)"))
        .stderr(predicate::str::contains("broken: mount"));
}

#[test]
fn test_mount_rejects_path_names() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["mount", "../escape"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("single path component"));
}

#[test]
fn test_unmount_and_alias() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["unmount", "d1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("d1"));

    ctx.new_cmd().args(["umount", "d1", "d2"]).assert().success();
}

#[test]
fn test_missing_tool_fails() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["--tool", "/nonexistent/juicefs", "mount", "d1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/juicefs"));
}
