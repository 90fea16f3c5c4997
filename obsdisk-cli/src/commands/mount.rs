use clap::Args;

#[derive(Args, Debug)]
pub struct MountArgs {
    /// Name of the volume(s) to mount
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,
}

pub async fn execute(args: MountArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let runtime = global.create_runtime()?;

    let mut errors = Vec::new();
    let mut success_count = 0;

    for target in args.targets {
        if let Err(e) = runtime.mount(&target).await {
            eprintln!("Error mounting volume '{}': {}", target, e);
            errors.push(format!("{}: {}", target, e));
        } else {
            println!("{}", runtime.layout().mount_point(target.trim()).display());
            success_count += 1;
        }
    }

    super::bail_on_errors("mount", &errors, success_count)
}
