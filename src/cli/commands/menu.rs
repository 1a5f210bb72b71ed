use std::path::PathBuf;

use crate::cli::commands::{expense, export, summary};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::ledger::Period;

const MENU_ITEMS: [&str; 5] = [
    "Add expense",
    "View all expenses",
    "Summary",
    "Export to CSV",
    "Exit",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "menu",
        "Guided menu: add, view, summarize, export",
        "menu",
        cmd_menu,
    )]
}

/// Loops over the numbered menu until the user picks Exit. Errors from one
/// action are reported and the menu is shown again.
fn cmd_menu(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.require_interactive("`menu`")?;
    loop {
        let choice = io::prompt_select(&context.theme, "What would you like to do?", &MENU_ITEMS)?;
        let outcome = match choice {
            0 => expense::prompt_expense(context)
                .and_then(|input| expense::add_expense(context, &input)),
            1 => expense::list_expenses(context),
            2 => summary::choose_period(context)
                .and_then(|period| summary::show_summary(context, period)),
            3 => export_prompt(context),
            _ => return Ok(()),
        };
        if let Err(err) = outcome {
            context
                .report_error(err)
                .map_err(|err| CommandError::Message(err.to_string()))?;
        }
    }
}

fn export_prompt(context: &mut ShellContext) -> CommandResult {
    let name = io::prompt_text(&context.theme, "Export to file", None)?;
    let name = name.trim();
    if name.is_empty() {
        io::print_warning("No filename given; nothing exported.");
        return Ok(());
    }
    export::export_ledger(context, PathBuf::from(name), Period::AllTime)
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::context;

    use super::*;

    #[test]
    fn menu_refuses_to_run_without_a_terminal() {
        let (mut context, _guard) = context();
        assert!(matches!(
            context.process_line("menu"),
            Err(CommandError::InvalidArguments(_))
        ));
    }
}
