//! Ledger domain models: expense records, the ledger collection, and periods.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod period;
pub mod record;

pub use ledger::Ledger;
pub use period::{days_in_month, DateRange, Period};
pub use record::{
    normalize_category, parse_amount_input, parse_date_input, ExpenseRecord, DATE_FORMAT,
    DEFAULT_CATEGORIES, FALLBACK_CATEGORY,
};
