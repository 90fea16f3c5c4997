//! Async entry point over the blocking orchestrator.

use std::sync::Arc;
use std::time::Duration;

use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use tokio::sync::mpsc;

use crate::classify::classify;
use crate::init_logging_for;
use crate::observer::{RegistryObserver, RegistryPoller};
use crate::orchestrator::MountOrchestrator;
use crate::runtime::layout::FilesystemLayout;
use crate::runtime::options::ObsdiskOptions;
use crate::runtime::types::{CreateVolumeRequest, VolumeRecord};
use crate::store::{SqliteVolumeStore, VolumeStore};
use crate::tool::{JuiceFsTool, MountTool};

// ============================================================================
// PUBLIC API
// ============================================================================

/// ObsdiskRuntime is the main entry point for creating, mounting and
/// watching volumes.
///
/// Tool invocations block for the lifetime of the subprocess, so every
/// operation that reaches the tool runs on tokio's blocking pool.
///
/// **Cloning**: Runtime is cheaply cloneable via `Arc` - all clones share the
/// same store and tool.
#[derive(Clone)]
pub struct ObsdiskRuntime {
    inner: Arc<RuntimeInner>,
}

struct RuntimeInner {
    store: Arc<dyn VolumeStore>,
    orchestrator: MountOrchestrator,
    tool_timeout: Option<Duration>,
}

impl std::fmt::Debug for ObsdiskRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObsdiskRuntime")
            .field("home_dir", &self.layout().home_dir())
            .field("tool_timeout", &self.inner.tool_timeout)
            .finish()
    }
}

impl ObsdiskRuntime {
    /// Create a runtime that drives the JuiceFS binary.
    ///
    /// The binary is `options.tool_path` when set, otherwise `juicefs` looked
    /// up at invocation time.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - `home_dir` is not absolute
    /// - the working directory cannot be created
    /// - the registry cannot be opened
    pub fn new(options: ObsdiskOptions) -> ObsdiskResult<Self> {
        let tool = match &options.tool_path {
            Some(path) => JuiceFsTool::new(path),
            None => JuiceFsTool::discover(),
        };
        Self::with_tool(options, Arc::new(tool))
    }

    /// Create a runtime around a caller-supplied tool.
    pub fn with_tool(options: ObsdiskOptions, tool: Arc<dyn MountTool>) -> ObsdiskResult<Self> {
        if !options.home_dir.is_absolute() {
            return Err(ObsdiskError::InvalidInput(format!(
                "home_dir must be absolute path, got: {}",
                options.home_dir.display()
            )));
        }

        let layout = FilesystemLayout::new(options.home_dir.clone());
        layout.prepare().map_err(|e| {
            ObsdiskError::Storage(format!(
                "Failed to initialize filesystem at {}: {}",
                layout.home_dir().display(),
                e
            ))
        })?;

        init_logging_for(&layout)?;

        let store: Arc<dyn VolumeStore> = Arc::new(SqliteVolumeStore::open(&layout.registry_db())?);
        let orchestrator = MountOrchestrator::new(Arc::clone(&store), tool, layout);

        tracing::debug!(home_dir = %options.home_dir.display(), "Runtime initialized");

        Ok(Self {
            inner: Arc::new(RuntimeInner {
                store,
                orchestrator,
                tool_timeout: options.tool_timeout,
            }),
        })
    }

    pub fn layout(&self) -> &FilesystemLayout {
        self.inner.orchestrator.layout()
    }

    /// Provision and register a volume; the provider is derived from the
    /// bucket URL before anything is touched.
    pub async fn create(&self, request: CreateVolumeRequest) -> ObsdiskResult<VolumeRecord> {
        let bucket = request.bucket.trim().to_string();
        if bucket.is_empty() {
            return Err(ObsdiskError::InvalidInput(
                "bucket must not be empty".to_string(),
            ));
        }
        let provider = classify(&bucket).map_err(|e| {
            ObsdiskError::InvalidInput(format!("parse obs type from bucket failed: {e}"))
        })?;

        self.run_blocking(
            move |orchestrator| {
                orchestrator.provision_and_register(
                    &request.name,
                    provider.as_str(),
                    &request.credentials,
                    &bucket,
                )
            },
            |detail| ObsdiskError::ProvisionFailed { detail },
        )
        .await
    }

    pub async fn mount(&self, name: &str) -> ObsdiskResult<()> {
        let name = name.to_string();
        self.run_blocking(
            move |orchestrator| orchestrator.mount(&name),
            |detail| ObsdiskError::MountFailed { detail },
        )
        .await
    }

    pub async fn unmount(&self, name: &str) -> ObsdiskResult<()> {
        let name = name.to_string();
        self.run_blocking(
            move |orchestrator| orchestrator.unmount(&name),
            |detail| ObsdiskError::UnmountFailed { detail },
        )
        .await
    }

    /// Every registered volume.
    pub async fn list(&self) -> ObsdiskResult<Vec<VolumeRecord>> {
        let store = Arc::clone(&self.inner.store);
        tokio::task::spawn_blocking(move || store.list_all())
            .await
            .map_err(ObsdiskError::internal)?
    }

    /// A fresh observer over this runtime's registry.
    pub fn observer(&self) -> RegistryObserver {
        RegistryObserver::new(Arc::clone(&self.inner.store))
    }

    /// Start polling a fresh observer every `interval`.
    ///
    /// The first batch holds every volume already registered.
    pub fn watch(
        &self,
        interval: Duration,
    ) -> (RegistryPoller, mpsc::Receiver<ObsdiskResult<Vec<VolumeRecord>>>) {
        RegistryPoller::spawn(Arc::new(self.observer()), interval)
    }

    async fn run_blocking<T, F, E>(&self, op: F, on_timeout: E) -> ObsdiskResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&MountOrchestrator) -> ObsdiskResult<T> + Send + 'static,
        E: FnOnce(String) -> ObsdiskError,
    {
        let inner = Arc::clone(&self.inner);
        let task = tokio::task::spawn_blocking(move || op(&inner.orchestrator));

        let joined = match self.inner.tool_timeout {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The subprocess keeps running; only the caller stops waiting
                    tracing::warn!(timeout = ?limit, "Tool invocation timed out");
                    return Err(on_timeout(format!("timed out after {limit:?}")));
                }
            },
            None => task.await,
        };

        joined.map_err(ObsdiskError::internal)?
    }
}
