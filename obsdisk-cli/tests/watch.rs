use predicates::prelude::*;

mod common;

#[test]
fn test_watch_once_lists_registered_volumes() {
    let mut ctx = common::obsdisk();
    ctx.create_volume("d1");
    ctx.create_volume("d2");

    ctx.cmd
        .args(["watch", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::contains("d1\toss\t"))
        .stdout(predicate::str::contains("d2\toss\t"));
}

#[test]
fn test_watch_once_empty_registry() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["watch", "--once"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_watch_rejects_zero_interval() {
    let mut ctx = common::obsdisk();

    ctx.cmd
        .args(["watch", "--interval", "0"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--interval"));
}
