//! Grouped summation over an in-memory ledger.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::{prelude::ToPrimitive, Decimal};

use crate::errors::{LedgerError, Result};
use crate::ledger::{DateRange, ExpenseRecord, Ledger, Period};

/// Sum of amounts for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Category total together with its share of the period total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    pub percent: f64,
}

/// Everything the summary screen shows for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub period: Period,
    pub label: String,
    pub range: DateRange,
    pub entry_count: usize,
    pub total: Decimal,
    pub categories: Vec<CategoryShare>,
    pub daily: BTreeMap<NaiveDate, Decimal>,
    pub recent: Vec<ExpenseRecord>,
}

impl PeriodSummary {
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Keeps records dated within `range`, both ends included, in ledger order.
    pub fn filter_by_range(ledger: &Ledger, range: &DateRange) -> Ledger {
        ledger
            .iter()
            .filter(|record| range.contains(record.date))
            .cloned()
            .collect()
    }

    /// Fails with [`LedgerError::AmountOverflow`] instead of wrapping.
    pub fn total_amount(ledger: &Ledger) -> Result<Decimal> {
        ledger
            .iter()
            .try_fold(Decimal::ZERO, |sum, record| add(sum, record.amount))
    }

    /// Sums per exact category label, largest first. Equal sums keep the order
    /// in which their categories first appear.
    pub fn by_category(ledger: &Ledger) -> Result<Vec<CategoryTotal>> {
        let mut totals: Vec<CategoryTotal> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for record in ledger {
            match index.get(record.category.as_str()) {
                Some(&slot) => {
                    totals[slot].amount = add(totals[slot].amount, record.amount)?;
                }
                None => {
                    index.insert(record.category.as_str(), totals.len());
                    totals.push(CategoryTotal {
                        category: record.category.clone(),
                        amount: record.amount,
                    });
                }
            }
        }
        totals.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(totals)
    }

    pub fn by_day(ledger: &Ledger) -> Result<BTreeMap<NaiveDate, Decimal>> {
        let mut days = BTreeMap::new();
        for record in ledger {
            let day = days.entry(record.date).or_insert(Decimal::ZERO);
            *day = add(*day, record.amount)?;
        }
        Ok(days)
    }

    /// `category_sum` as a percentage of `total`; zero when `total` is zero.
    pub fn percentage_of(category_sum: Decimal, total: Decimal) -> f64 {
        if total.is_zero() {
            return 0.0;
        }
        category_sum
            .checked_div(total)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|percent| percent.to_f64())
            .unwrap_or(0.0)
    }

    /// The `k` latest records, newest first; same-day records keep ledger order.
    pub fn top_recent(ledger: &Ledger, k: usize) -> Vec<ExpenseRecord> {
        let mut sorted = Self::sorted_latest_first(ledger);
        sorted.truncate(k);
        sorted
    }

    /// All records newest first, stable for equal dates.
    pub fn sorted_latest_first(ledger: &Ledger) -> Vec<ExpenseRecord> {
        let mut sorted = ledger.records.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    /// Resolves `period` against `today` and computes every breakdown for it.
    pub fn summarize(
        ledger: &Ledger,
        period: Period,
        today: NaiveDate,
        recent: usize,
    ) -> Result<PeriodSummary> {
        let range = period.range(today)?;
        let filtered = Self::filter_by_range(ledger, &range);
        let total = Self::total_amount(&filtered)?;
        let categories = Self::by_category(&filtered)?
            .into_iter()
            .map(|entry| CategoryShare {
                percent: Self::percentage_of(entry.amount, total),
                category: entry.category,
                amount: entry.amount,
            })
            .collect();
        Ok(PeriodSummary {
            period,
            label: period.label(today),
            range,
            entry_count: filtered.len(),
            total,
            categories,
            daily: Self::by_day(&filtered)?,
            recent: Self::top_recent(&filtered, recent),
        })
    }
}

fn add(sum: Decimal, amount: Decimal) -> Result<Decimal> {
    sum.checked_add(amount).ok_or(LedgerError::AmountOverflow)
}
