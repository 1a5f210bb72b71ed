use std::path::PathBuf;

use tracing::info;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::ledger::Period;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "export",
        "Write the ledger, or one period of it, to another CSV file",
        "export <path> [week|30days|last <n>|month [<m> <yyyy>]|all]",
        cmd_export,
    )]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (path, period) = match args {
        [] => {
            context.require_interactive("`export` without a path")?;
            let name = io::prompt_text(&context.theme, "Export to file", None)?;
            (name.trim().to_string(), Period::AllTime)
        }
        [path] => (path.to_string(), Period::AllTime),
        [path, period @ ..] => (path.to_string(), Period::parse(period, context.today())?),
    };
    if path.is_empty() {
        return Err(CommandError::InvalidArguments(
            "No filename given; nothing exported.".into(),
        ));
    }
    export_ledger(context, PathBuf::from(path), period)
}

pub(crate) fn export_ledger(context: &ShellContext, path: PathBuf, period: Period) -> CommandResult {
    let range = period.range(context.today())?;
    let ledger = context.load_ledger()?;
    let selected = if range.is_all_time() {
        ledger
    } else {
        SummaryService::filter_by_range(&ledger, &range)
    };

    context.store.export_to(&path, &selected)?;
    info!(path = %path.display(), records = selected.len(), %period, "ledger exported");
    io::print_success(format!(
        "Exported {} {} to {}",
        selected.len(),
        if selected.len() == 1 {
            "expense"
        } else {
            "expenses"
        },
        path.display()
    ));
    Ok(())
}
