pub mod config;
pub mod expense;
pub mod export;
pub mod menu;
pub mod summary;
pub mod system;

use crate::cli::registry::CommandEntry;

/// Every shell command, in the order `help` lists them.
pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(expense::definitions());
    commands.extend(summary::definitions());
    commands.extend(export::definitions());
    commands.extend(menu::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}
