//! The expense record and the parsing rules applied to user-supplied fields.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Date format used for user input and for the CSV file.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Category assigned when none is given.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Largest amount accepted for a single entry (one trillion). Keeps every
/// realistic ledger far away from the limits of decimal addition.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Conventional categories offered by the interactive prompts.
pub const DEFAULT_CATEGORIES: [&str; 6] =
    ["Food", "Rent", "Travel", "Bills", "Entertainment", "Other"];

/// One logged transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub date: NaiveDate,
    pub category: String,
    pub amount: Decimal,
    pub description: String,
}

impl ExpenseRecord {
    /// Builds a record, title-casing the category and trimming the description.
    pub fn new(
        date: NaiveDate,
        category: impl AsRef<str>,
        amount: Decimal,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            date,
            category: normalize_category(category.as_ref()),
            amount,
            description: description.as_ref().trim().to_string(),
        }
    }
}

/// Title-cases a category label; blank input becomes [`FALLBACK_CATEGORY`].
///
/// Every run of alphabetic characters starts upper case and continues lower
/// case, so `"eating OUT"` becomes `"Eating Out"` and `"b&b"` becomes `"B&B"`.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return FALLBACK_CATEGORY.to_string();
    }
    let mut out = String::with_capacity(trimmed.len());
    let mut at_word_start = true;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Parses a `YYYY-MM-DD` date typed by the user.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| LedgerError::InvalidDateInput(trimmed.to_string()))
}

/// Parses a non-negative amount typed by the user, at most [`MAX_AMOUNT`].
pub fn parse_amount_input(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let amount = parse_decimal(trimmed)
        .ok_or_else(|| LedgerError::InvalidAmountInput(trimmed.to_string()))?;
    if (amount.is_sign_negative() && !amount.is_zero()) || amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmountInput(trimmed.to_string()));
    }
    Ok(amount)
}

/// Accepts plain decimals as well as exponent notation (`1e3`).
pub(crate) fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
        .map(|value| value.normalize())
}
