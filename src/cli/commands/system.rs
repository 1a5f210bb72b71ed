use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "help",
            "List commands, or describe one",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new(
            "version",
            "Print the version and build details",
            "version",
            cmd_version,
        ),
        CommandEntry::new("exit", "Leave the expense ledger", "exit", cmd_exit)
            .with_aliases(&["quit"]),
    ]
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first() {
        None => help::print_overview(&context.registry),
        Some(name) => match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        },
    }
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Expense Ledger");
    output::block(&build_table().render());
    Ok(())
}

fn build_table() -> Table {
    let meta = build_info::current();
    let mut table = Table::new(vec![TableColumn::left("Field"), TableColumn::left("Value")]);
    table.show_headers = false;
    let commit = format!("{} ({})", meta.git_hash, meta.git_status);
    for (field, value) in [
        ("version", meta.version),
        ("commit", commit.as_str()),
        ("built", meta.timestamp),
        ("target", meta.target),
        ("profile", meta.profile),
        ("rustc", meta.rustc),
    ] {
        table.push_row(vec![field.to_string(), value.to_string()]);
    }
    table
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_support::context;

    #[test]
    fn build_table_lists_the_package_version() {
        let rendered = build_table().render();
        assert!(rendered.lines().next().unwrap_or("").contains(env!("CARGO_PKG_VERSION")));
        assert_eq!(rendered.lines().count(), 6);
    }

    #[test]
    fn help_accepts_names_aliases_and_typos() {
        let (mut context, _guard) = context();
        for line in ["help", "help summary", "help QUIT", "help sumary"] {
            context
                .process_line(line)
                .unwrap_or_else(|err| panic!("{line}: {err}"));
        }
    }
}
