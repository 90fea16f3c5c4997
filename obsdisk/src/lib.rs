//! # obsdisk
//!
//! Local registry and mount lifecycle coordinator for object-storage-backed
//! disks. Volumes are provisioned and mounted by an external JuiceFS-style
//! tool; this crate keeps the durable record of which volumes exist and makes
//! sure the record and the external state never diverge.
//!
//! | Module | Purpose |
//! |---|---|
//! | [`store`] | [`VolumeStore`] trait and the SQLite-backed registry. |
//! | [`tool`] | [`MountTool`] trait, the subprocess adapter, stderr detail extraction. |
//! | [`orchestrator`] | [`MountOrchestrator`]: provision-then-register, mount, unmount. |
//! | [`observer`] | [`RegistryObserver`] and the periodic [`RegistryPoller`]. |
//! | [`classify`] | Provider detection from a bucket URL. |
//! | [`runtime`] | Options, filesystem layout, registry lock and the [`ObsdiskRuntime`] facade. |

pub mod classify;
pub mod observer;
pub mod orchestrator;
pub mod runtime;
pub mod store;
pub mod tool;
pub mod util;

pub use classify::classify;
pub use observer::{RegistryObserver, RegistryPoller};
pub use orchestrator::MountOrchestrator;
pub use runtime::ObsdiskRuntime;
pub use runtime::layout::FilesystemLayout;
pub use runtime::options::ObsdiskOptions;
pub use runtime::types::{CreateVolumeRequest, Credentials, Provider, VolumeRecord};
pub use store::{SqliteVolumeStore, VolumeStore};
pub use tool::{FormatRequest, JuiceFsTool, MountTool, ToolOutput, extract_fatal_detail};

pub use obsdisk_shared::{ObsdiskError, ObsdiskResult};

use runtime::constants::filenames;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Install daily-rotated file logging under the layout's logs directory.
///
/// Only the first call has any effect. If the embedding application already
/// installed a global subscriber, that subscriber is kept and the file
/// appender stays idle.
pub fn init_logging_for(layout: &FilesystemLayout) -> ObsdiskResult<()> {
    if LOG_GUARD.get().is_some() {
        return Ok(());
    }

    let logs_dir = layout.logs_dir();
    std::fs::create_dir_all(&logs_dir)
        .map_err(|e| ObsdiskError::Storage(format!("failed to create logs dir: {e}")))?;

    let file_appender = tracing_appender::rolling::daily(logs_dir, filenames::LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
        .map_err(ObsdiskError::internal)?;

    util::register_to_tracing(non_blocking, env_filter);
    let _ = LOG_GUARD.set(guard);
    Ok(())
}
