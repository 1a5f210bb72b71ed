//! Validated entry of new expenses.

use chrono::NaiveDate;
use tracing::info;

use crate::errors::Result;
use crate::ledger::{parse_amount_input, parse_date_input, ExpenseRecord};
use crate::storage::LedgerStore;

/// Raw, unvalidated fields as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseInput {
    /// `YYYY-MM-DD`, or blank for today.
    pub date: String,
    pub category: String,
    pub amount: String,
    pub description: String,
}

impl ExpenseInput {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            description: description.into(),
        }
    }
}

pub struct ExpenseService;

impl ExpenseService {
    /// Turns user input into a record without touching storage.
    pub fn validate(input: &ExpenseInput, today: NaiveDate) -> Result<ExpenseRecord> {
        let date = match input.date.trim() {
            "" => today,
            raw if raw.eq_ignore_ascii_case("today") => today,
            raw => parse_date_input(raw)?,
        };
        let amount = parse_amount_input(&input.amount)?;
        Ok(ExpenseRecord::new(
            date,
            &input.category,
            amount,
            &input.description,
        ))
    }

    /// Validates and appends. Nothing is written when validation fails.
    pub fn record<S>(store: &mut S, input: &ExpenseInput, today: NaiveDate) -> Result<ExpenseRecord>
    where
        S: LedgerStore + ?Sized,
    {
        let record = Self::validate(input, today)?;
        store.append(record.clone())?;
        info!(date = %record.date, category = %record.category, amount = %record.amount, "expense recorded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;
    use crate::storage::MemoryStorage;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn blank_date_and_category_use_defaults() {
        let mut store = MemoryStorage::new();
        let record =
            ExpenseService::record(&mut store, &ExpenseInput::new("", " ", "42", ""), today())
                .expect("record");
        assert_eq!(record.date, today());
        assert_eq!(record.category, "Other");
        assert_eq!(record.amount, dec!(42));
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn invalid_input_writes_nothing() {
        let mut store = MemoryStorage::new();
        let bad_date = ExpenseInput::new("10/01/2024", "food", "5", "");
        let bad_amount = ExpenseInput::new("2024-01-01", "food", "-5", "");
        assert!(matches!(
            ExpenseService::record(&mut store, &bad_date, today()),
            Err(LedgerError::InvalidDateInput(_))
        ));
        assert!(matches!(
            ExpenseService::record(&mut store, &bad_amount, today()),
            Err(LedgerError::InvalidAmountInput(_))
        ));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn category_is_title_cased() {
        let record = ExpenseService::validate(
            &ExpenseInput::new("2024-01-02", "entertainment", "9.99", "cinema"),
            today(),
        )
        .unwrap();
        assert_eq!(record.category, "Entertainment");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
