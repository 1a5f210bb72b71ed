use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, tmp_path, PathResolver},
    errors::{LedgerError, Result},
    storage::{CsvStorage, LoadMode},
};

const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DEFAULT_RECENT_LIMIT: usize = 5;

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: [&str; 5] = [
    "ledger_file",
    "load_mode",
    "currency_symbol",
    "recent_limit",
    "show_charts",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    pub load_mode: LoadMode,
    pub currency_symbol: String,
    pub recent_limit: usize,
    pub show_charts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: None,
            load_mode: LoadMode::Strict,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.into(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            show_charts: true,
        }
    }
}

impl Config {
    /// Updates one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "ledger_file" => {
                self.ledger_file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "load_mode" => self.load_mode = value.parse()?,
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "recent_limit" => {
                self.recent_limit = value.parse().map_err(|_| {
                    LedgerError::Config(format!("recent_limit must be a whole number, got `{value}`"))
                })?;
            }
            "show_charts" => {
                self.show_charts = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    _ => {
                        return Err(LedgerError::Config(format!(
                            "show_charts must be true or false, got `{value}`"
                        )))
                    }
                };
            }
            other => {
                return Err(LedgerError::Config(format!(
                    "unknown setting `{other}` (expected one of: {})",
                    CONFIG_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    /// `(key, value)` pairs for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            (
                "ledger_file",
                self.ledger_file
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(default)".into()),
            ),
            ("load_mode", self.load_mode.to_string()),
            ("currency_symbol", self.currency_symbol.clone()),
            ("recent_limit", self.recent_limit.to_string()),
            ("show_charts", self.show_charts.to_string()),
        ]
    }
}

/// Loads and saves [`Config`] as JSON inside the application directory.
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Ledger file to use: `EXPENSE_LEDGER_FILE`, then the config, then the
    /// default inside the application directory.
    pub fn ledger_path(&self, config: &Config) -> PathBuf {
        PathResolver::ledger_file_override()
            .or_else(|| config.ledger_file.clone())
            .unwrap_or_else(|| PathResolver::ledger_file_in(&self.base))
    }

    /// CSV store configured from `config`.
    pub fn open_store(&self, config: &Config) -> CsvStorage {
        CsvStorage::new(self.ledger_path(config), config.load_mode)
    }
}

fn write_file(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
