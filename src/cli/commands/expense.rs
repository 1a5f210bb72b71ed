use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::core::services::{ExpenseInput, ExpenseService, SummaryService};
use crate::ledger::{ExpenseRecord, DATE_FORMAT, DEFAULT_CATEGORIES};

const ADD_USAGE: &str = "add [<date|today> <category> <amount> [description...]]";
const CUSTOM_CATEGORY: &str = "Custom...";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a new expense", ADD_USAGE, cmd_add),
        CommandEntry::new("list", "Show every expense, latest first", "list", cmd_list),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let input = match args {
        [] => {
            context.require_interactive("`add` without arguments")?;
            prompt_expense(context)?
        }
        [date, category, amount, description @ ..] => {
            ExpenseInput::new(*date, *category, *amount, description.join(" "))
        }
        _ => {
            return Err(CommandError::InvalidArguments(format!(
                "usage: {ADD_USAGE}"
            )))
        }
    };
    add_expense(context, &input)
}

/// Validates and stores one expense, then confirms it on screen.
pub(crate) fn add_expense(context: &mut ShellContext, input: &ExpenseInput) -> CommandResult {
    let today = context.today();
    let record = ExpenseService::record(context.store.as_mut(), input, today)?;
    io::print_success(format!(
        "Added {} {} on {}{}",
        context.format_amount(record.amount),
        record.category,
        record.date.format(DATE_FORMAT),
        if record.description.is_empty() {
            String::new()
        } else {
            format!(" ({})", record.description)
        }
    ));
    Ok(())
}

/// Asks for each field in turn. Blank date means today.
pub(crate) fn prompt_expense(context: &ShellContext) -> Result<ExpenseInput, CommandError> {
    let today = context.today().format(DATE_FORMAT).to_string();
    let date = io::prompt_text(&context.theme, "Date (YYYY-MM-DD)", Some(&today))?;

    let mut choices: Vec<&str> = DEFAULT_CATEGORIES.to_vec();
    choices.push(CUSTOM_CATEGORY);
    let picked = io::prompt_select(&context.theme, "Category", &choices)?;
    let category = match choices.get(picked) {
        Some(&CUSTOM_CATEGORY) | None => io::prompt_text(&context.theme, "Category name", None)?,
        Some(name) => name.to_string(),
    };

    let amount = io::prompt_text(&context.theme, "Amount", None)?;
    let description = io::prompt_text(&context.theme, "Description (optional)", None)?;
    Ok(ExpenseInput::new(date, category, amount, description))
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: list".into()));
    }
    list_expenses(context)
}

pub(crate) fn list_expenses(context: &mut ShellContext) -> CommandResult {
    let ledger = context.load_ledger()?;
    if ledger.is_empty() {
        io::print_warning("No expenses recorded yet.");
        return Ok(());
    }

    let total = SummaryService::total_amount(&ledger)?;
    output::section(format!("All expenses ({})", ledger.len()));
    let records = SummaryService::sorted_latest_first(&ledger);
    output::block(&records_table(context, &records).render());
    io::print_info(format!("Total spent: {}", context.format_amount(total)));
    Ok(())
}

/// Date, category, amount and description columns for `records`.
pub(crate) fn records_table(context: &ShellContext, records: &[ExpenseRecord]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Description").max_width(40),
    ]);
    for record in records {
        table.push_row(vec![
            record.date.format(DATE_FORMAT).to_string(),
            record.category.clone(),
            context.format_amount(record.amount),
            record.description.clone(),
        ]);
    }
    table
}
