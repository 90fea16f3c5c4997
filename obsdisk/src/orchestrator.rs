//! Provision-then-register coordination.
//!
//! The registry and the external tool's state must never diverge: a record is
//! written only after the tool formatted the volume, and a failed format or a
//! failed registry write leaves no metadata artifact behind.

use std::io;
use std::path::Path;
use std::sync::Arc;

use obsdisk_shared::constants::tool::TRASH_DAYS;
use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};

use crate::runtime::layout::FilesystemLayout;
use crate::runtime::lock::RegistryLock;
use crate::runtime::types::{Credentials, VolumeRecord};
use crate::store::VolumeStore;
use crate::tool::{FormatRequest, MountTool, ToolOutput, extract_fatal_detail};

/// Coordinates the volume store and the mount tool.
///
/// Every operation blocks for the lifetime of the tool subprocess and is
/// attempted exactly once.
pub struct MountOrchestrator {
    store: Arc<dyn VolumeStore>,
    tool: Arc<dyn MountTool>,
    layout: FilesystemLayout,
}

impl std::fmt::Debug for MountOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountOrchestrator")
            .field("home_dir", &self.layout.home_dir())
            .finish()
    }
}

impl MountOrchestrator {
    pub fn new(
        store: Arc<dyn VolumeStore>,
        tool: Arc<dyn MountTool>,
        layout: FilesystemLayout,
    ) -> Self {
        Self {
            store,
            tool,
            layout,
        }
    }

    pub fn layout(&self) -> &FilesystemLayout {
        &self.layout
    }

    /// Format a new volume with the tool, then record it in the registry.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a blank field or a name that is not a single path
    ///   component; nothing is touched
    /// - `RegistryLocked` if another provisioning is running
    /// - `DuplicateName` if the name is registered; the tool is not invoked
    /// - `ProvisionFailed` if the tool fails; its metadata artifact is removed
    /// - any store error from the final write; the artifact is removed
    pub fn provision_and_register(
        &self,
        name: &str,
        provider_type: &str,
        credentials: &Credentials,
        bucket: &str,
    ) -> ObsdiskResult<VolumeRecord> {
        let name = name.trim();
        let provider_type = provider_type.trim();
        let bucket = bucket.trim();
        let credentials = Credentials::new(
            credentials.access_key.trim(),
            credentials.secret_key.trim(),
        );

        validate_name(name)?;
        require("provider type", provider_type)?;
        require("access key", &credentials.access_key)?;
        require("secret key", &credentials.secret_key)?;
        require("bucket", bucket)?;

        let _lock = RegistryLock::acquire(self.layout.home_dir())?;

        if self.store.exists(name)? {
            return Err(ObsdiskError::DuplicateName(name.to_string()));
        }

        let meta_url = self.layout.meta_url(name);
        let request = FormatRequest {
            meta_url: &meta_url,
            name,
            storage: provider_type,
            bucket,
            credentials: &credentials,
            trash_days: TRASH_DAYS,
        };

        if let Err(detail) = tool_detail(self.tool.format(&request)) {
            tracing::warn!(name, %detail, "Provisioning failed");
            self.cleanup_meta(name);
            return Err(ObsdiskError::ProvisionFailed { detail });
        }

        match self.store.create(name, provider_type) {
            Ok(record) => {
                tracing::info!(name, provider_type, "Volume provisioned and registered");
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(name, error = %e, "Registering provisioned volume failed");
                self.cleanup_meta(name);
                Err(e)
            }
        }
    }

    /// Attach a volume at `<home>/vols/<name>`.
    ///
    /// The registry is not consulted; the tool decides whether the volume
    /// exists.
    pub fn mount(&self, name: &str) -> ObsdiskResult<()> {
        let name = name.trim();
        validate_name(name)?;

        let mount_point = self.layout.mount_point(name);
        let meta_url = self.layout.meta_url(name);

        tool_detail(self.tool.mount(&meta_url, &mount_point))
            .map_err(|detail| ObsdiskError::MountFailed { detail })?;

        tracing::info!(name, mount_point = %mount_point.display(), "Volume mounted");
        Ok(())
    }

    /// Detach whatever is mounted at `<home>/vols/<name>`.
    pub fn unmount(&self, name: &str) -> ObsdiskResult<()> {
        let name = name.trim();
        validate_name(name)?;

        let mount_point = self.layout.mount_point(name);

        tool_detail(self.tool.unmount(&mount_point))
            .map_err(|detail| ObsdiskError::UnmountFailed { detail })?;

        tracing::info!(name, mount_point = %mount_point.display(), "Volume unmounted");
        Ok(())
    }

    /// Best-effort removal of a volume's metadata artifact. Never fails.
    fn cleanup_meta(&self, name: &str) {
        let path = self.layout.meta_path(name);
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed metadata artifact"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove metadata artifact"
                );
            }
        }
    }
}

/// Reduce a tool invocation to `Ok` or the detail a user should see.
fn tool_detail(result: io::Result<ToolOutput>) -> Result<(), String> {
    match result {
        Ok(output) if output.success() => Ok(()),
        Ok(output) => Err(extract_fatal_detail(&output.stderr)),
        Err(e) => Err(e.to_string()),
    }
}

fn require(field: &str, value: &str) -> ObsdiskResult<()> {
    if value.is_empty() {
        return Err(ObsdiskError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Names become path components under `vols/` and `metas/`.
fn validate_name(name: &str) -> ObsdiskResult<()> {
    require("name", name)?;

    let single_component = !name.contains(['/', '\\', '\0'])
        && name != "."
        && name != ".."
        && Path::new(name).file_name().is_some();

    if !single_component {
        return Err(ObsdiskError::InvalidInput(format!(
            "invalid volume name {name:?}: must be a single path component"
        )));
    }
    Ok(())
}
