use std::time::Duration;

use chrono::SecondsFormat;
use clap::Args;
use obsdisk::VolumeRecord;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Poll interval in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Print what is registered now and exit
    #[arg(long)]
    pub once: bool,
}

pub async fn execute(args: WatchArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let runtime = global.create_runtime()?;

    if args.once {
        let observer = runtime.observer();
        let records = tokio::task::spawn_blocking(move || observer.refresh()).await??;
        records.iter().for_each(print_record);
        return Ok(());
    }

    let interval = args
        .interval
        .map(Duration::from_millis)
        .unwrap_or_else(|| global.options().poll_interval);

    let (poller, mut rx) = runtime.watch(interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            batch = rx.recv() => match batch {
                Some(Ok(records)) => records.iter().for_each(print_record),
                Some(Err(e)) => eprintln!("Error: {}", e),
                None => break,
            },
        }
    }

    poller.stop().await;
    Ok(())
}

fn print_record(record: &VolumeRecord) {
    println!(
        "{}\t{}\t{}",
        record.name,
        record.provider_type,
        record.created_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
}
