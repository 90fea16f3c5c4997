pub mod create;
pub mod list;
pub mod mount;
pub mod unmount;
pub mod watch;

/// Summarize per-target failures of a multi-target command.
pub(crate) fn bail_on_errors(verb: &str, errors: &[String], success_count: usize) -> anyhow::Result<()> {
    if errors.is_empty() {
        return Ok(());
    }

    let error_summary = if success_count > 0 {
        format!(
            "Failed to {} {} of {} volume(s)",
            verb,
            errors.len(),
            errors.len() + success_count
        )
    } else {
        format!("Failed to {} all {} volume(s)", verb, errors.len())
    };

    anyhow::bail!("{}\nErrors:\n  {}", error_summary, errors.join("\n  "));
}
