use clap::Args;
use obsdisk::{CreateVolumeRequest, Credentials};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Volume name
    #[arg(short, long)]
    pub name: String,

    /// Bucket endpoint URL; the provider is derived from its hostname
    #[arg(short, long)]
    pub bucket: String,

    /// Object storage access key
    #[arg(long, env = "OBSDISK_ACCESS_KEY", hide_env_values = true)]
    pub access_key: String,

    /// Object storage secret key
    #[arg(long, env = "OBSDISK_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,
}

pub async fn execute(args: CreateArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let runtime = global.create_runtime()?;

    let record = runtime
        .create(CreateVolumeRequest {
            name: args.name,
            credentials: Credentials::new(args.access_key, args.secret_key),
            bucket: args.bucket,
        })
        .await?;

    println!("{}", record.name);
    Ok(())
}
