pub mod expense_service;
pub mod summary_service;

pub use expense_service::{ExpenseInput, ExpenseService};
pub use summary_service::{CategoryShare, CategoryTotal, PeriodSummary, SummaryService};
