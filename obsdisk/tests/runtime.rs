//! Integration tests for the async runtime facade.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use obsdisk::{
    CreateVolumeRequest, Credentials, FormatRequest, MountTool, ObsdiskError, ObsdiskOptions,
    ObsdiskRuntime, ToolOutput,
};
use obsdisk_test_utils::StubTool;
use tempfile::TempDir;

/// Helper to create a test runtime with a temporary home directory
fn create_test_runtime(tool: Arc<dyn MountTool>) -> (ObsdiskRuntime, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let options = ObsdiskOptions {
        home_dir: temp_dir.path().join("ObsDisk"),
        ..Default::default()
    };
    let runtime = ObsdiskRuntime::with_tool(options, tool).expect("Failed to create runtime");
    (runtime, temp_dir)
}

fn request(name: &str, bucket: &str) -> CreateVolumeRequest {
    CreateVolumeRequest {
        name: name.into(),
        credentials: Credentials::new("AK", "SK"),
        bucket: bucket.into(),
    }
}

#[tokio::test]
async fn test_create_then_list() {
    let tool = Arc::new(StubTool::new());
    let (runtime, _temp_dir) = create_test_runtime(tool.clone());

    let record = runtime
        .create(request("d1", "https://b.oss-cn-hangzhou.aliyuncs.com"))
        .await
        .unwrap();
    assert_eq!(record.provider_type, "oss");

    let cos = runtime
        .create(request("d2", "https://b-125.cos.ap-guangzhou.myqcloud.com"))
        .await
        .unwrap();
    assert_eq!(cos.provider_type, "cos");

    let names: Vec<_> = runtime
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["d1", "d2"]);
    assert_eq!(tool.format_calls(), 2);
}

#[tokio::test]
async fn test_registry_survives_runtime_restart() {
    let temp_dir = TempDir::new().unwrap();
    let options = ObsdiskOptions {
        home_dir: temp_dir.path().join("ObsDisk"),
        ..Default::default()
    };

    {
        let runtime =
            ObsdiskRuntime::with_tool(options.clone(), Arc::new(StubTool::new())).unwrap();
        runtime
            .create(request("d1", "https://b.obs.cn-north-4.myhuaweicloud.com"))
            .await
            .unwrap();
    }

    let tool = Arc::new(StubTool::new());
    let runtime = ObsdiskRuntime::with_tool(options, tool.clone()).unwrap();
    let err = runtime
        .create(request("d1", "https://b.obs.cn-north-4.myhuaweicloud.com"))
        .await
        .unwrap_err();

    assert_eq!(err, ObsdiskError::DuplicateName("d1".into()));
    assert_eq!(tool.format_calls(), 0);
}

#[tokio::test]
async fn test_watch_reports_existing_then_new_volumes() {
    let (runtime, _temp_dir) = create_test_runtime(Arc::new(StubTool::new()));
    runtime
        .create(request("d1", "https://b.aliyuncs.com"))
        .await
        .unwrap();

    let (poller, mut rx) = runtime.watch(Duration::from_millis(20));

    let first = rx.recv().await.unwrap().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "d1");

    runtime
        .create(request("d2", "https://b.aliyuncs.com"))
        .await
        .unwrap();

    let second = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("poller delivered nothing")
        .unwrap()
        .unwrap();
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name, "d2");

    poller.stop().await;
}

#[tokio::test]
async fn test_watch_with_zero_interval_still_polls() {
    let (runtime, _temp_dir) = create_test_runtime(Arc::new(StubTool::new()));
    runtime
        .create(request("d1", "https://b.aliyuncs.com"))
        .await
        .unwrap();

    let (poller, mut rx) = runtime.watch(Duration::ZERO);

    let first = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("poller delivered nothing")
        .unwrap()
        .unwrap();
    assert_eq!(first[0].name, "d1");

    poller.stop().await;
}

#[tokio::test]
async fn test_mount_and_unmount_through_runtime() {
    let tool = Arc::new(StubTool::new());
    let (runtime, _temp_dir) = create_test_runtime(tool.clone());

    runtime.mount("d1").await.unwrap();
    runtime.unmount("d1").await.unwrap();

    let mount_point = runtime.layout().mount_point("d1");
    assert_eq!(tool.mount_points(), vec![mount_point.clone(), mount_point]);
}

/// A tool whose mount blocks far longer than the runtime is willing to wait.
struct SlowTool;

impl MountTool for SlowTool {
    fn format(&self, _request: &FormatRequest<'_>) -> io::Result<ToolOutput> {
        Ok(ToolOutput {
            code: Some(0),
            ..Default::default()
        })
    }

    fn mount(&self, _meta_url: &str, _mount_point: &Path) -> io::Result<ToolOutput> {
        std::thread::sleep(Duration::from_millis(500));
        Ok(ToolOutput {
            code: Some(0),
            ..Default::default()
        })
    }

    fn unmount(&self, _mount_point: &Path) -> io::Result<ToolOutput> {
        Ok(ToolOutput {
            code: Some(0),
            ..Default::default()
        })
    }
}

#[tokio::test]
async fn test_tool_timeout_reports_operation_failure() {
    let temp_dir = TempDir::new().unwrap();
    let options = ObsdiskOptions {
        home_dir: temp_dir.path().join("ObsDisk"),
        tool_timeout: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let runtime = ObsdiskRuntime::with_tool(options, Arc::new(SlowTool)).unwrap();

    let err = runtime.mount("d1").await.unwrap_err();
    assert!(matches!(err, ObsdiskError::MountFailed { .. }));
    assert!(err.to_string().starts_with("timed out after"));

    runtime.unmount("d1").await.unwrap();
}
