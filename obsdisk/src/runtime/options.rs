use std::path::PathBuf;
use std::time::Duration;

use dirs::home_dir;

use crate::runtime::constants::{envs as const_envs, observer};
use crate::runtime::layout::dirs as const_dirs;

// ============================================================================
// Runtime Options
// ============================================================================
/// Configuration options for [`ObsdiskRuntime`](crate::ObsdiskRuntime).
///
/// Users can create it with defaults and modify fields as needed.
#[derive(Clone, Debug)]
pub struct ObsdiskOptions {
    /// Working directory holding the registry, mount points and metadata.
    ///
    /// Defaults to `$OBSDISK_HOME`, or `~/ObsDisk` when unset.
    pub home_dir: PathBuf,

    /// External mount tool binary.
    ///
    /// Defaults to `$OBSDISK_TOOL`. When `None`, `juicefs` is looked up next
    /// to the running executable and then on `PATH`.
    pub tool_path: Option<PathBuf>,

    /// Interval of the registry watch loop.
    pub poll_interval: Duration,

    /// Upper bound on a single tool invocation as seen by async callers.
    ///
    /// Expiry is reported as the operation's failure kind with a timeout
    /// detail. The subprocess is not killed. `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
}

impl Default for ObsdiskOptions {
    fn default() -> Self {
        let home_dir = std::env::var(const_envs::OBSDISK_HOME)
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                let mut path = home_dir().unwrap_or_else(|| PathBuf::from("."));
                path.push(const_dirs::OBSDISK_DIR);
                path
            });

        let tool_path = std::env::var_os(const_envs::OBSDISK_TOOL)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Self {
            home_dir,
            tool_path,
            poll_interval: Duration::from_millis(observer::DEFAULT_POLL_INTERVAL_MS),
            tool_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_poll_interval_is_one_second() {
        let options = ObsdiskOptions::default();
        assert_eq!(options.poll_interval, Duration::from_secs(1));
        assert!(options.tool_timeout.is_none());
    }
}
