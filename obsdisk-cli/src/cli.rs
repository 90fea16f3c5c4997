use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use obsdisk::{ObsdiskOptions, ObsdiskRuntime};

use crate::commands::{create, list, mount, unmount, watch};

#[derive(Parser, Debug)]
#[command(name = "obsdisk", version, about = "Manage object-storage-backed disks")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision a new volume and register it
    Create(create::CreateArgs),

    /// Mount one or more volumes under <home>/vols
    Mount(mount::MountArgs),

    /// Unmount one or more volumes
    #[command(alias = "umount")]
    Unmount(unmount::UnmountArgs),

    /// List registered volumes
    #[command(alias = "ls")]
    List(list::ListArgs),

    /// Print volumes as they get registered
    Watch(watch::WatchArgs),
}

#[derive(Args, Debug)]
pub struct GlobalFlags {
    /// Working directory (registry, mount points, metadata)
    #[arg(long, global = true, env = "OBSDISK_HOME")]
    pub home: Option<PathBuf>,

    /// Mount tool binary
    #[arg(long, global = true, env = "OBSDISK_TOOL")]
    pub tool: Option<PathBuf>,

    /// Give up waiting for the mount tool after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub tool_timeout: Option<u64>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Allow running as root
    #[arg(
        long,
        global = true,
        env = "OBSDISK_ALLOW_ROOT",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub allow_root: bool,
}

impl GlobalFlags {
    pub fn options(&self) -> ObsdiskOptions {
        let mut options = ObsdiskOptions::default();
        if let Some(home) = &self.home {
            options.home_dir = home.clone();
        }
        if let Some(tool) = &self.tool {
            options.tool_path = Some(tool.clone());
        }
        options.tool_timeout = self.tool_timeout.map(Duration::from_secs);
        options
    }

    pub fn create_runtime(&self) -> anyhow::Result<ObsdiskRuntime> {
        let mut options = self.options();
        if options.home_dir.is_relative() {
            options.home_dir = std::env::current_dir()?.join(&options.home_dir);
        }
        Ok(ObsdiskRuntime::new(options)?)
    }
}
