use clap::Args;

#[derive(Args, Debug)]
pub struct UnmountArgs {
    /// Name of the volume(s) to unmount
    #[arg(required = true, num_args = 1..)]
    pub targets: Vec<String>,
}

pub async fn execute(args: UnmountArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let runtime = global.create_runtime()?;

    let mut errors = Vec::new();
    let mut success_count = 0;

    for target in args.targets {
        if let Err(e) = runtime.unmount(&target).await {
            eprintln!("Error unmounting volume '{}': {}", target, e);
            errors.push(format!("{}: {}", target, e));
        } else {
            println!("{}", target);
            success_count += 1;
        }
    }

    super::bail_on_errors("unmount", &errors, success_count)
}
