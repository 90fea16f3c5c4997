//! Constants for the obsdisk runtime
//!
//! Centralized location for paths, environment variables and defaults.

// Re-export shared constants from obsdisk-shared
pub use obsdisk_shared::constants::{observer, providers, tool};

pub mod envs {
    /// Overrides the working directory (default `~/ObsDisk`)
    pub const OBSDISK_HOME: &str = "OBSDISK_HOME";

    /// Overrides the external mount tool binary
    pub const OBSDISK_TOOL: &str = "OBSDISK_TOOL";
}

/// File naming patterns
pub mod filenames {
    /// Lock file name
    pub const LOCK_FILE: &str = ".lock";

    /// Registry database file inside the ini directory
    pub const REGISTRY_DB: &str = "disks";

    /// Log file prefix inside the logs directory
    pub const LOG_FILE: &str = "obsdisk.log";
}
