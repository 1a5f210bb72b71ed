#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use chrono::NaiveDate;
use expense_ledger::ledger::ExpenseRecord;
use rust_decimal::Decimal;
use tempfile::TempDir;

pub fn temp_home() -> TempDir {
    TempDir::new().expect("create temp dir")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn record(day: NaiveDate, category: &str, amount: Decimal, description: &str) -> ExpenseRecord {
    ExpenseRecord::new(day, category, amount, description)
}

/// The shell binary in script mode, isolated inside `home`.
pub fn script_command(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("expense-ledger").expect("binary built");
    cmd.env("EXPENSE_LEDGER_CLI_SCRIPT", "1")
        .env("EXPENSE_LEDGER_HOME", home)
        .env_remove("EXPENSE_LEDGER_FILE")
        .env_remove("RUST_LOG");
    cmd
}
