pub mod csv_backend;
pub mod memory;

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{LedgerError, Result},
    ledger::{ExpenseRecord, Ledger},
};

/// Abstraction over the durable, append-only expense ledger.
///
/// Implementations are single-process: `append` is load, push, write back, and
/// two processes appending to the same store at once will lose one write.
pub trait LedgerStore: Send + Sync {
    /// Creates an empty store with the canonical schema when none exists.
    fn ensure_exists(&self) -> Result<()>;

    /// Reads every persisted record. A missing store reads as an empty ledger.
    fn load_all(&self) -> Result<Ledger>;

    /// Persists one more record at the end of the ledger.
    fn append(&mut self, record: ExpenseRecord) -> Result<()>;

    /// Writes `ledger` to an arbitrary path using the CSV schema.
    fn export_to(&self, path: &Path, ledger: &Ledger) -> Result<()> {
        csv_backend::write_ledger_to_path(ledger, path)
    }
}

/// How rows that do not match the schema are treated on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Any unparsable row aborts the load.
    #[default]
    Strict,
    /// Bad amounts become zero and rows with bad dates are skipped.
    Lenient,
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadMode::Strict => f.write_str("strict"),
            LoadMode::Lenient => f.write_str("lenient"),
        }
    }
}

impl FromStr for LoadMode {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(LoadMode::Strict),
            "lenient" => Ok(LoadMode::Lenient),
            other => Err(LedgerError::Config(format!(
                "unknown load mode `{other}` (expected strict or lenient)"
            ))),
        }
    }
}

pub use csv_backend::{CsvStorage, CSV_HEADER};
pub use memory::MemoryStorage;
