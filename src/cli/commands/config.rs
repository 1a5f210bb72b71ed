use tracing::info;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::config::CONFIG_KEYS;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change preferences",
        "config [show|set <key> <value>|path]",
        cmd_config,
    )]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first().map(|arg| arg.to_lowercase()) else {
        return show_config(context);
    };

    match action.as_str() {
        "show" => show_config(context),
        "path" => {
            io::print_info(format!(
                "Config file: {}",
                context.config_manager.path().display()
            ));
            io::print_info(format!(
                "Ledger file: {}",
                context.config_manager.ledger_path(&context.config).display()
            ));
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!(
                    "usage: config set <{}> <value>",
                    CONFIG_KEYS.join("|")
                )));
            }
            let key = args[1].to_lowercase();
            let value = args[2..].join(" ");
            set_value(context, &key, &value)
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}` (expected show, set or path)"
        ))),
    }
}

fn show_config(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        io::print_info(format!("  {key:<16} {value}"));
    }
    Ok(())
}

fn set_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set(key, value).map_err(CommandError::from_config)?;
    context.config_manager.save(&updated)?;
    context.config = updated;
    if matches!(key, "ledger_file" | "load_mode") {
        context.reopen_store()?;
    }
    info!(key, value, "config updated");
    io::print_success(format!("Set {key} = {}", value.trim()));
    Ok(())
}
