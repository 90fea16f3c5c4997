use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use obsdisk_shared::constants::tool;

use super::{FormatRequest, MountTool, ToolOutput};
use crate::util;

/// Runs the JuiceFS command-line tool as a subprocess.
///
/// Standard output and standard error are captured separately and returned
/// whole once the process exits; nothing is streamed.
#[derive(Debug, Clone, Default)]
pub struct JuiceFsTool {
    /// Explicit binary; `None` resolves `juicefs` on every call.
    binary: Option<PathBuf>,
}

impl JuiceFsTool {
    /// Use a specific tool binary.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: Some(binary.into()),
        }
    }

    /// Look the binary up next to the running executable or on `PATH` at
    /// invocation time.
    pub fn discover() -> Self {
        Self { binary: None }
    }

    fn binary(&self) -> io::Result<PathBuf> {
        match &self.binary {
            Some(path) => Ok(path.clone()),
            None => util::find_binary(tool::BINARY)
                .map_err(|e| io::Error::new(io::ErrorKind::NotFound, e.to_string())),
        }
    }

    fn run(&self, args: Vec<OsString>) -> io::Result<ToolOutput> {
        let binary = self.binary()?;
        let output = Command::new(&binary).args(&args).output().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("failed to run {}: {}", binary.display(), e),
            )
        })?;

        let result = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.success() {
            tracing::debug!(
                binary = %binary.display(),
                code = ?result.code,
                stderr = %result.stderr,
                "Tool exited with failure"
            );
        }

        Ok(result)
    }
}

/// `format --trash-days N --access-key AK --secret-key SK --bucket B --storage S META NAME`
pub(crate) fn format_args(request: &FormatRequest<'_>) -> Vec<OsString> {
    let trash_days = request.trash_days.to_string();
    let args: [&str; 13] = [
        tool::FORMAT,
        "--trash-days",
        &trash_days,
        "--access-key",
        &request.credentials.access_key,
        "--secret-key",
        &request.credentials.secret_key,
        "--bucket",
        request.bucket,
        "--storage",
        request.storage,
        request.meta_url,
        request.name,
    ];
    args.into_iter().map(OsString::from).collect()
}

/// `mount -d META MOUNT_POINT` (daemonized)
pub(crate) fn mount_args(meta_url: &str, mount_point: &Path) -> Vec<OsString> {
    vec![
        tool::MOUNT.into(),
        "-d".into(),
        meta_url.into(),
        mount_point.as_os_str().to_owned(),
    ]
}

/// `umount MOUNT_POINT`
pub(crate) fn unmount_args(mount_point: &Path) -> Vec<OsString> {
    vec![tool::UNMOUNT.into(), mount_point.as_os_str().to_owned()]
}

impl MountTool for JuiceFsTool {
    fn format(&self, request: &FormatRequest<'_>) -> io::Result<ToolOutput> {
        // Credentials stay out of the log
        tracing::info!(
            name = request.name,
            storage = request.storage,
            bucket = request.bucket,
            "Formatting volume"
        );
        self.run(format_args(request))
    }

    fn mount(&self, meta_url: &str, mount_point: &Path) -> io::Result<ToolOutput> {
        tracing::info!(meta_url, mount_point = %mount_point.display(), "Mounting volume");
        self.run(mount_args(meta_url, mount_point))
    }

    fn unmount(&self, mount_point: &Path) -> io::Result<ToolOutput> {
        tracing::info!(mount_point = %mount_point.display(), "Unmounting volume");
        self.run(unmount_args(mount_point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::types::Credentials;

    fn args_to_strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.into_string().unwrap())
            .collect()
    }

    #[test]
    fn test_format_args_order() {
        let creds = Credentials::new("AK", "SK");
        let request = FormatRequest {
            meta_url: "sqlite3:///h/metas/d1",
            name: "d1",
            storage: "oss",
            bucket: "https://b.oss-cn-hangzhou.aliyuncs.com",
            credentials: &creds,
            trash_days: 0,
        };

        assert_eq!(
            args_to_strings(format_args(&request)),
            vec![
                "format",
                "--trash-days",
                "0",
                "--access-key",
                "AK",
                "--secret-key",
                "SK",
                "--bucket",
                "https://b.oss-cn-hangzhou.aliyuncs.com",
                "--storage",
                "oss",
                "sqlite3:///h/metas/d1",
                "d1",
            ]
        );
    }

    #[test]
    fn test_mount_and_unmount_args() {
        let mount_point = Path::new("/h/vols/d1");
        assert_eq!(
            args_to_strings(mount_args("sqlite3:///h/metas/d1", mount_point)),
            vec!["mount", "-d", "sqlite3:///h/metas/d1", "/h/vols/d1"]
        );
        assert_eq!(
            args_to_strings(unmount_args(mount_point)),
            vec!["umount", "/h/vols/d1"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_exit() {
        let tool = JuiceFsTool::new("true");
        let output = tool.unmount(Path::new("/tmp/none")).unwrap();
        assert!(output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_exit_captures_stderr() {
        // `sh umount <path>` tries to run a script named "umount" and fails
        let tool = JuiceFsTool::new("sh");
        let output = tool.unmount(Path::new("/tmp/none")).unwrap();
        assert!(!output.success());
        assert!(!output.stderr.is_empty());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let tool = JuiceFsTool::new("/nonexistent/obsdisk/juicefs");
        let err = tool
            .mount("sqlite3:///tmp/m", Path::new("/tmp/none"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/obsdisk/juicefs"));
    }
}
