use std::path::PathBuf;

use thiserror::Error;

/// Error type that captures ledger validation and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid date `{0}`: use YYYY-MM-DD")]
    InvalidDateInput(String),
    #[error("Invalid amount `{0}`: expected a non-negative number")]
    InvalidAmountInput(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Malformed ledger file {}{}: {reason}", path.display(), line_suffix(*line))]
    MalformedStore {
        path: PathBuf,
        line: Option<u64>,
        reason: String,
    },
    #[error("Amounts in the ledger are too large to add up")]
    AmountOverflow,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    /// True for errors caused by user input rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidDateInput(_)
                | LedgerError::InvalidAmountInput(_)
                | LedgerError::InvalidPeriod(_)
        )
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Config(err.to_string())
    }
}

fn line_suffix(line: Option<u64>) -> String {
    line.map(|line| format!(" (line {line})")).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// User-facing CLI error wrapper.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Core(LedgerError::Io(err))
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(err: dialoguer::Error) -> Self {
        CliError::Input(err.to_string())
    }
}
