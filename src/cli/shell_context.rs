use chrono::NaiveDate;
use dialoguer::theme::ColorfulTheme;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    config::{Config, ConfigManager},
    core::Clock,
    storage::LedgerStore,
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// State shared by every command handler for the lifetime of the shell.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: Box<dyn LedgerStore>,
    pub clock: Box<dyn Clock>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn is_interactive(&self) -> bool {
        self.mode == CliMode::Interactive
    }

    /// Amount with the configured currency symbol, rounded half away from
    /// zero to two decimals.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{}{:.2}", self.config.currency_symbol, rounded)
    }
}
