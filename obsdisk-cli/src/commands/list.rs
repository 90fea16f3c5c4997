use chrono::SecondsFormat;
use clap::{Args, ValueEnum};
use comfy_table::{Table, presets};
use obsdisk::VolumeRecord;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

pub async fn execute(args: ListArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let runtime = global.create_runtime()?;
    let records = runtime.list().await?;

    match args.format {
        OutputFormat::Table => println!("{}", render_table(&records)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

pub(crate) fn render_table(records: &[VolumeRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_header(vec!["NAME", "TYPE", "CREATED"]);

    for record in records {
        table.add_row(vec![
            record.name.clone(),
            record.provider_type.clone(),
            record.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ]);
    }
    table
}
