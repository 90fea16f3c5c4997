#![allow(dead_code)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

/// Stands in for juicefs.
///
/// - `format` creates the metadata file, then fails if the bucket contains
///   "unreachable"
/// - `mount` fails for mount points ending in "broken"
/// - `umount` always succeeds
const FAKE_TOOL: &str = r#"#!/bin/sh
cmd="$1"; shift
case "$cmd" in
  format)
    bucket=""
    while [ $# -gt 2 ]; do
      case "$1" in
        --bucket) bucket="$2"; shift 2 ;;
        --*) shift 2 ;;
        *) shift ;;
      esac
    done
    meta="${1#sqlite3://}"
    : > "$meta"
    case "$bucket" in
      *unreachable*)
        echo "2024/05/01 juicefs[1] <INFO>: Meta address: $1" >&2
        echo "2024/05/01 juicefs[1] <FATAL>: bucket $bucket is not reachable" >&2
        exit 1 ;;
    esac
    ;;
  mount)
    case "$3" in
      *broken) echo "<FATAL>: mount $3 failed" >&2; exit 1 ;;
    esac
    ;;
  umount) ;;
  *) echo "unknown command $cmd" >&2; exit 2 ;;
esac
exit 0
"#;

/// Written once per test binary; rewriting an executable other tests are
/// running fails with ETXTBSY.
static FAKE_TOOL_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn fake_tool() -> &'static Path {
    FAKE_TOOL_PATH.get_or_init(|| {
        use std::os::unix::fs::PermissionsExt;

        let dir = std::env::temp_dir().join(format!("obsdisk-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("Failed to create fake tool dir");

        let path = dir.join("juicefs");
        std::fs::write(&path, FAKE_TOOL).expect("Failed to write fake tool");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
        path
    })
}

pub struct TestContext {
    pub cmd: Command,
    pub home: PathBuf,
    _temp: TempDir,
}

impl TestContext {
    /// New command against the same home dir
    pub fn new_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_obsdisk"));
        cmd.timeout(Duration::from_secs(30));
        cmd.env("OBSDISK_ALLOW_ROOT", "1")
            .env_remove("OBSDISK_HOME")
            .env_remove("OBSDISK_TOOL")
            .env_remove("OBSDISK_ACCESS_KEY")
            .env_remove("OBSDISK_SECRET_KEY")
            .env_remove("RUST_LOG");
        cmd.arg("--home").arg(&self.home);
        cmd.arg("--tool").arg(fake_tool());
        cmd
    }

    /// Run `create` for `name` against an Alibaba Cloud bucket.
    pub fn create_volume(&self, name: &str) {
        self.new_cmd()
            .args([
                "create",
                "--name",
                name,
                "--bucket",
                "https://b.oss-cn-hangzhou.aliyuncs.com",
                "--access-key",
                "AK",
                "--secret-key",
                "SK",
            ])
            .assert()
            .success();
    }

    pub fn meta_path(&self, name: &str) -> PathBuf {
        self.home.join("metas").join(name)
    }
}

/// Fresh home dir per test
pub fn obsdisk() -> TestContext {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let home = temp.path().join("ObsDisk");

    let mut ctx = TestContext {
        cmd: Command::new(env!("CARGO_BIN_EXE_obsdisk")),
        home,
        _temp: temp,
    };
    ctx.cmd = ctx.new_cmd();
    ctx
}
