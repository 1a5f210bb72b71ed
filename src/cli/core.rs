//! Core CLI loop, dispatch, and shell context helpers.

use std::io;

use dialoguer::theme::ColorfulTheme;
use strsim::levenshtein;
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    config::{Config, ConfigManager},
    core::{Clock, SystemClock},
    errors::LedgerError,
    ledger::Ledger,
    storage::LedgerStore,
};

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};
pub use crate::cli::shell_context::{CliMode, ShellContext};

const PROMPT: &str = "expenses> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl CommandError {
    /// Configuration values typed by the user are argument errors, not
    /// storage failures.
    pub(crate) fn from_config(err: LedgerError) -> Self {
        match err {
            LedgerError::Config(message) => CommandError::InvalidArguments(message),
            other => CommandError::Core(other),
        }
    }
}

impl ShellContext {
    /// Opens the configured ledger file and the wall clock.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let store = config_manager.open_store(&config);
        Self::with_parts(
            mode,
            config_manager,
            config,
            Box::new(store),
            Box::new(SystemClock),
        )
    }

    pub fn with_parts(
        mode: CliMode,
        config_manager: ConfigManager,
        config: Config,
        store: Box<dyn LedgerStore>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        output::set_preferences(OutputPreferences {
            plain_mode: mode == CliMode::Script || std::env::var_os("NO_COLOR").is_some(),
        });
        store.ensure_exists()?;

        let registry = CommandRegistry::from_entries(commands::all_definitions());

        debug!(?mode, config = %config_manager.path().display(), "shell context ready");
        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            store,
            clock,
            last_command: None,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        PROMPT.to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn load_ledger(&self) -> Result<Ledger, CommandError> {
        Ok(self.store.load_all()?)
    }

    /// Points the shell at the ledger file the current config selects.
    pub(crate) fn reopen_store(&mut self) -> CommandResult {
        let store = self.config_manager.open_store(&self.config);
        store.ensure_exists()?;
        debug!(path = %store.path().display(), mode = %store.mode(), "ledger store reopened");
        self.store = Box::new(store);
        Ok(())
    }

    /// Fails with a readable message when a command needs a terminal.
    pub(crate) fn require_interactive(&self, what: &str) -> CommandResult {
        if self.is_interactive() {
            Ok(())
        } else {
            Err(CommandError::InvalidArguments(format!(
                "{what} needs an interactive terminal; pass arguments instead"
            )))
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.get(command).map(|entry| entry.handler) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            outcome => outcome.map(|()| LoopControl::Continue),
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance)
            .filter(|(distance, _)| *distance <= 3)
            .map(|(_, name)| name)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit the expense ledger?", true)
            .map_err(|err| CliError::Input(err.to_string()))
    }

    /// Prints a failed command. Bad input never ends the session; other
    /// failures end a scripted run.
    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Core(err) if err.is_validation() => {
                self.print_error(&err.to_string());
                Ok(())
            }
            CommandError::Message(message) => {
                self.print_error(&message);
                Ok(())
            }
            other => {
                error!(error = %other, command = ?self.last_command, "command failed");
                self.print_error(&other.to_string());
                match self.mode {
                    CliMode::Script => Err(CliError::Command(other.to_string())),
                    CliMode::Interactive => Ok(()),
                }
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::core::FixedClock;
    use crate::storage::MemoryStorage;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid date")
    }

    /// Script-mode shell over an in-memory ledger pinned to 2024-01-10.
    pub(crate) fn context() -> (ShellContext, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let manager =
            ConfigManager::with_base_dir(temp.path().to_path_buf()).expect("config manager");
        let context = ShellContext::with_parts(
            CliMode::Script,
            manager,
            Config::default(),
            Box::new(MemoryStorage::new()),
            Box::new(FixedClock::new(today())),
        )
        .expect("context");
        (context, temp)
    }
}
