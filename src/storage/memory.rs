use crate::{
    errors::Result,
    ledger::{ExpenseRecord, Ledger},
};

use super::LedgerStore;

/// Volatile store that keeps the ledger in memory; used by tests and embedders
/// that do not want to touch disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    ledger: Ledger,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self {
            ledger: Ledger::from(records),
        }
    }
}

impl LedgerStore for MemoryStorage {
    fn ensure_exists(&self) -> Result<()> {
        Ok(())
    }

    fn load_all(&self) -> Result<Ledger> {
        Ok(self.ledger.clone())
    }

    fn append(&mut self, record: ExpenseRecord) -> Result<()> {
        self.ledger.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn append_grows_ledger_by_one() {
        let mut store = MemoryStorage::new();
        assert!(store.load_all().unwrap().is_empty());
        let record = ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Food",
            dec!(100),
            "",
        );
        store.append(record.clone()).unwrap();
        store.append(record.clone()).unwrap();
        let ledger = store.load_all().unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last(), Some(&record));
    }

    #[test]
    fn export_writes_csv_schema() {
        let temp = tempfile::tempdir().unwrap();
        let store = MemoryStorage::with_records(vec![ExpenseRecord::new(
            NaiveDate::from_ymd_opt(2024, 2, 3).unwrap(),
            "rent",
            dec!(700),
            "february",
        )]);
        let path = temp.path().join("out").join("export.csv");
        store
            .export_to(&path, &store.load_all().unwrap())
            .expect("export");
        let contents = std::fs::read_to_string(path).unwrap();
        assert_eq!(
            contents,
            "date,category,amount,description\n2024-02-03,Rent,700,february\n"
        );
    }
}
