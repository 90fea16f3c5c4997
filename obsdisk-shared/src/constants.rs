//! Shared constants for the registry and the external mount tool.

/// External mount tool invocation
pub mod tool {
    /// Default binary name of the external mount tool
    pub const BINARY: &str = "juicefs";

    /// URL scheme the tool expects for its per-volume metadata database
    pub const META_SCHEME: &str = "sqlite3://";

    /// Trash retention passed to `format` (volumes keep no trash)
    pub const TRASH_DAYS: u32 = 0;

    /// Marker the tool prints in front of its fatal error message
    pub const FATAL_MARKER: &str = "<FATAL>:";

    /// Subcommand names
    pub const FORMAT: &str = "format";
    pub const MOUNT: &str = "mount";
    pub const UNMOUNT: &str = "umount";
}

/// Object storage providers, keyed by the hostname keyword that identifies them
pub mod providers {
    /// Alibaba Cloud OSS
    pub const OSS: &str = "oss";
    pub const OSS_KEYWORD: &str = "aliyuncs";

    /// Huawei Cloud OBS
    pub const OBS: &str = "obs";
    pub const OBS_KEYWORD: &str = "myhuaweicloud";

    /// Tencent Cloud COS
    pub const COS: &str = "cos";
    pub const COS_KEYWORD: &str = "myqcloud";
}

/// Registry observation defaults
pub mod observer {
    /// Poll interval of the registry watch loop, in milliseconds
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
}
