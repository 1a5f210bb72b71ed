use serde::{Deserialize, Serialize};

use super::ExpenseRecord;

/// The full, ordered collection of persisted expense records.
///
/// Records carry no identity, so a ledger only ever grows by appending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub records: Vec<ExpenseRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExpenseRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExpenseRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&ExpenseRecord> {
        self.records.last()
    }
}

impl From<Vec<ExpenseRecord>> for Ledger {
    fn from(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<ExpenseRecord> for Ledger {
    fn from_iter<I: IntoIterator<Item = ExpenseRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a ExpenseRecord;
    type IntoIter = std::slice::Iter<'a, ExpenseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl IntoIterator for Ledger {
    type Item = ExpenseRecord;
    type IntoIter = std::vec::IntoIter<ExpenseRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
