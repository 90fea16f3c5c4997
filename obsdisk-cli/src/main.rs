mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use obsdisk::ObsdiskError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    }
}

/// 2 for input errors, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ObsdiskError>() {
        Some(e) if e.is_input_error() => 2,
        _ => 1,
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if !cli.global.allow_root && nix::unistd::Uid::effective().is_root() {
        anyhow::bail!("don't run as root (pass --allow-root to override)");
    }

    match cli.command {
        Commands::Create(args) => commands::create::execute(args, &cli.global).await,
        Commands::Mount(args) => commands::mount::execute(args, &cli.global).await,
        Commands::Unmount(args) => commands::unmount::execute(args, &cli.global).await,
        Commands::List(args) => commands::list::execute(args, &cli.global).await,
        Commands::Watch(args) => commands::watch::execute(args, &cli.global).await,
    }
}

/// Log to stderr. `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
