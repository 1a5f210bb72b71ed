use dirs::home_dir;
use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".expense_ledger";
const LEDGER_FILE: &str = "expenses.csv";
const CONFIG_FILE: &str = "config.json";

/// Overrides the application data directory.
pub const HOME_ENV: &str = "EXPENSE_LEDGER_HOME";
/// Overrides the ledger file location, taking precedence over the config file.
pub const LEDGER_FILE_ENV: &str = "EXPENSE_LEDGER_FILE";

/// Resolves the on-disk locations used by the application.
pub struct PathResolver;

impl PathResolver {
    /// Returns the application data directory, defaulting to `~/.expense_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn ledger_file_in(base: &Path) -> PathBuf {
        base.join(LEDGER_FILE)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    /// Ledger file named by `EXPENSE_LEDGER_FILE`, if set.
    pub fn ledger_file_override() -> Option<PathBuf> {
        env::var_os(LEDGER_FILE_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }
}

/// Creates `path` and its parents when missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path)
}

/// Sibling staging path used for atomic writes (`expenses.csv` -> `expenses.csv.tmp`).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.tmp"),
        None => "tmp".to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
