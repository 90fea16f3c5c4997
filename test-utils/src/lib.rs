//! Shared fixtures for obsdisk integration tests.
//!
//! - [`StubTool`]: scripted [`MountTool`] that counts calls and writes the
//!   metadata artifact the way the real tool does
//! - [`MemoryStore`] / [`FailingStore`]: in-process [`VolumeStore`]s
//! - [`TestHome`]: prepared working directory under a temp dir

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use obsdisk::{FilesystemLayout, FormatRequest, MountTool, ToolOutput, VolumeRecord, VolumeStore};
use obsdisk_shared::constants::tool::META_SCHEME;
use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use parking_lot::Mutex;
use tempfile::TempDir;

// ============================================================================
// STUB TOOL
// ============================================================================

/// Scripted answer for one kind of tool call.
#[derive(Debug, Clone, Default)]
pub struct StubAnswer {
    pub code: i32,
    pub stderr: String,
}

impl StubAnswer {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn fail(stderr: impl Into<String>) -> Self {
        Self {
            code: 1,
            stderr: stderr.into(),
        }
    }

    fn output(&self) -> io::Result<ToolOutput> {
        Ok(ToolOutput {
            code: Some(self.code),
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}

/// A [`MountTool`] that never spawns anything.
///
/// `format` creates `<home>/metas/<name>` before answering, like the real
/// tool does even when it later fails.
#[derive(Debug, Default)]
pub struct StubTool {
    format_answer: Mutex<StubAnswer>,
    mount_answer: Mutex<StubAnswer>,
    unmount_answer: Mutex<StubAnswer>,
    format_calls: AtomicUsize,
    mount_calls: AtomicUsize,
    unmount_calls: AtomicUsize,
    mount_points: Mutex<Vec<PathBuf>>,
}

impl StubTool {
    /// Every call succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// `format` exits non-zero with `stderr`.
    pub fn failing_format(stderr: impl Into<String>) -> Self {
        let tool = Self::default();
        *tool.format_answer.lock() = StubAnswer::fail(stderr);
        tool
    }

    pub fn set_mount_answer(&self, answer: StubAnswer) {
        *self.mount_answer.lock() = answer;
    }

    pub fn set_unmount_answer(&self, answer: StubAnswer) {
        *self.unmount_answer.lock() = answer;
    }

    pub fn format_calls(&self) -> usize {
        self.format_calls.load(Ordering::SeqCst)
    }

    pub fn mount_calls(&self) -> usize {
        self.mount_calls.load(Ordering::SeqCst)
    }

    pub fn unmount_calls(&self) -> usize {
        self.unmount_calls.load(Ordering::SeqCst)
    }

    /// Mount points passed to `mount` and `unmount`, in call order.
    pub fn mount_points(&self) -> Vec<PathBuf> {
        self.mount_points.lock().clone()
    }
}

impl MountTool for StubTool {
    fn format(&self, request: &FormatRequest<'_>) -> io::Result<ToolOutput> {
        self.format_calls.fetch_add(1, Ordering::SeqCst);

        let meta = request
            .meta_url
            .strip_prefix(META_SCHEME)
            .unwrap_or(request.meta_url);
        std::fs::write(meta, b"stub metadata")?;

        self.format_answer.lock().output()
    }

    fn mount(&self, _meta_url: &str, mount_point: &Path) -> io::Result<ToolOutput> {
        self.mount_calls.fetch_add(1, Ordering::SeqCst);
        self.mount_points.lock().push(mount_point.to_path_buf());
        self.mount_answer.lock().output()
    }

    fn unmount(&self, mount_point: &Path) -> io::Result<ToolOutput> {
        self.unmount_calls.fetch_add(1, Ordering::SeqCst);
        self.mount_points.lock().push(mount_point.to_path_buf());
        self.unmount_answer.lock().output()
    }
}

// ============================================================================
// STORES
// ============================================================================

/// In-memory registry. Listing order can be reversed to check that callers
/// do not depend on it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<VolumeRecord>>,
    reverse_listing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reversed() -> Self {
        Self {
            reverse_listing: true,
            ..Self::default()
        }
    }
}

impl VolumeStore for MemoryStore {
    fn exists(&self, name: &str) -> ObsdiskResult<bool> {
        Ok(self.records.lock().iter().any(|r| r.name == name))
    }

    fn create(&self, name: &str, provider_type: &str) -> ObsdiskResult<VolumeRecord> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.name == name) {
            return Err(ObsdiskError::DuplicateName(name.to_string()));
        }
        let record = VolumeRecord {
            name: name.to_string(),
            provider_type: provider_type.to_string(),
            created_at: Utc::now(),
        };
        records.push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> ObsdiskResult<Vec<VolumeRecord>> {
        let mut records = self.records.lock().clone();
        if self.reverse_listing {
            records.reverse();
        }
        Ok(records)
    }
}

/// A registry whose writes and listings always fail; `exists` reports an
/// empty registry.
#[derive(Debug, Default)]
pub struct FailingStore;

impl FailingStore {
    pub const REASON: &'static str = "disk I/O error";
}

impl VolumeStore for FailingStore {
    fn exists(&self, _name: &str) -> ObsdiskResult<bool> {
        Ok(false)
    }

    fn create(&self, _name: &str, _provider_type: &str) -> ObsdiskResult<VolumeRecord> {
        Err(ObsdiskError::StoreUnavailable(Self::REASON.to_string()))
    }

    fn list_all(&self) -> ObsdiskResult<Vec<VolumeRecord>> {
        Err(ObsdiskError::StoreUnavailable(Self::REASON.to_string()))
    }
}

// ============================================================================
// WORKING DIRECTORY
// ============================================================================

/// A prepared `ObsDisk` working directory, removed on drop.
pub struct TestHome {
    _temp: TempDir,
    pub layout: FilesystemLayout,
}

impl TestHome {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp dir");
        let layout = FilesystemLayout::new(temp.path().join("ObsDisk"));
        layout.prepare().expect("Failed to prepare layout");
        Self {
            _temp: temp,
            layout,
        }
    }

    pub fn home_dir(&self) -> &Path {
        self.layout.home_dir()
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}
