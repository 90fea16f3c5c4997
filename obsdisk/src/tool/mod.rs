//! External mount tool boundary.
//!
//! The orchestrator talks to the tool only through [`MountTool`]. The
//! production implementation is [`JuiceFsTool`], which runs the tool as a
//! subprocess; tests substitute a stub.

mod detail;
mod juicefs;

pub use detail::extract_fatal_detail;
pub use juicefs::JuiceFsTool;

use std::io;
use std::path::Path;

use crate::runtime::types::Credentials;

/// Captured result of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Arguments of a `format` invocation.
#[derive(Debug, Clone, Copy)]
pub struct FormatRequest<'a> {
    /// Metadata URL, e.g. `sqlite3:///home/u/ObsDisk/metas/d1`.
    pub meta_url: &'a str,
    /// Volume name registered with the tool.
    pub name: &'a str,
    /// Storage driver tag (`oss`, `obs`, `cos`).
    pub storage: &'a str,
    pub bucket: &'a str,
    pub credentials: &'a Credentials,
    /// Days deleted files stay in the volume's trash.
    pub trash_days: u32,
}

/// The filesystem tool that formats, mounts and unmounts volumes.
///
/// Every call blocks until the tool exits. `Err` means the tool could not be
/// started at all; a started tool that fails is reported through
/// [`ToolOutput::code`].
pub trait MountTool: Send + Sync {
    /// Initialize a volume's metadata against a bucket.
    fn format(&self, request: &FormatRequest<'_>) -> io::Result<ToolOutput>;

    /// Attach a provisioned volume at `mount_point`.
    fn mount(&self, meta_url: &str, mount_point: &Path) -> io::Result<ToolOutput>;

    /// Detach whatever is mounted at `mount_point`.
    fn unmount(&self, mount_point: &Path) -> io::Result<ToolOutput>;
}
