use obsdisk_shared::constants::tool;
use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};
use std::path::{Path, PathBuf};

use crate::runtime::constants::filenames;

/// Directory structure constants
pub mod dirs {
    /// Base directory name for ObsDisk data, created under the user's home
    pub const OBSDISK_DIR: &str = "ObsDisk";

    /// Subdirectory holding the registry database
    pub const INI_DIR: &str = "ini";

    /// Subdirectory holding one mount point per volume
    pub const VOLS_DIR: &str = "vols";

    /// Subdirectory holding one tool metadata database per volume
    pub const METAS_DIR: &str = "metas";

    /// Subdirectory for log files
    pub const LOGS_DIR: &str = "logs";
}

// ============================================================================
// FILESYSTEM LAYOUT (working directory)
// ============================================================================

/// Per-user working directory:
///
/// ```text
/// ~/ObsDisk/
/// ├── ini/disks        # registry database
/// ├── metas/<name>     # tool metadata artifact per volume
/// ├── vols/<name>/     # mount point per volume
/// └── logs/
/// ```
#[derive(Clone, Debug)]
pub struct FilesystemLayout {
    home_dir: PathBuf,
}

impl FilesystemLayout {
    pub fn new(home_dir: PathBuf) -> Self {
        Self { home_dir }
    }

    pub fn home_dir(&self) -> &Path {
        &self.home_dir
    }

    pub fn ini_dir(&self) -> PathBuf {
        self.home_dir.join(dirs::INI_DIR)
    }

    pub fn vols_dir(&self) -> PathBuf {
        self.home_dir.join(dirs::VOLS_DIR)
    }

    pub fn metas_dir(&self) -> PathBuf {
        self.home_dir.join(dirs::METAS_DIR)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.home_dir.join(dirs::LOGS_DIR)
    }

    /// Registry database: ~/ObsDisk/ini/disks
    pub fn registry_db(&self) -> PathBuf {
        self.ini_dir().join(filenames::REGISTRY_DB)
    }

    /// Tool metadata artifact for a volume: ~/ObsDisk/metas/<name>
    pub fn meta_path(&self, name: &str) -> PathBuf {
        self.metas_dir().join(name)
    }

    /// Metadata URL handed to the tool, e.g. `sqlite3:///home/u/ObsDisk/metas/d1`
    pub fn meta_url(&self, name: &str) -> String {
        format!("{}{}", tool::META_SCHEME, self.meta_path(name).display())
    }

    /// Mount point for a volume: ~/ObsDisk/vols/<name>
    pub fn mount_point(&self, name: &str) -> PathBuf {
        self.vols_dir().join(name)
    }

    /// Initialize the filesystem structure.
    ///
    /// A path that already exists is fine as long as it is a directory.
    pub fn prepare(&self) -> ObsdiskResult<()> {
        for dir in [
            self.home_dir.clone(),
            self.ini_dir(),
            self.vols_dir(),
            self.metas_dir(),
            self.logs_dir(),
        ] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> ObsdiskResult<()> {
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if dir.exists() && !dir.is_dir() => Err(ObsdiskError::Storage(format!(
            "{} exists but is not a directory: {e}",
            dir.display()
        ))),
        Err(e) => Err(ObsdiskError::Storage(format!(
            "failed to create {}: {e}",
            dir.display()
        ))),
    }
}
