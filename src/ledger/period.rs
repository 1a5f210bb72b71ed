use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Inclusive date range: both `start` and `end` belong to the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(LedgerError::InvalidPeriod(format!(
                "range end {end} is before start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The unbounded range; filtering with it keeps every record.
    pub fn all_time() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn is_all_time(&self) -> bool {
        *self == Self::all_time()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// A user-chosen reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    LastNDays(u32),
    CalendarMonth { month: u32, year: i32 },
    AllTime,
}

impl Period {
    pub fn week() -> Self {
        Period::LastNDays(7)
    }

    pub fn last_30_days() -> Self {
        Period::LastNDays(30)
    }

    pub fn current_month(today: NaiveDate) -> Self {
        Period::CalendarMonth {
            month: today.month(),
            year: today.year(),
        }
    }

    /// Resolves the period against `today` into a concrete inclusive range.
    pub fn range(&self, today: NaiveDate) -> Result<DateRange> {
        match *self {
            Period::LastNDays(0) => Err(LedgerError::InvalidPeriod(
                "number of days must be at least 1".into(),
            )),
            Period::LastNDays(days) => {
                let start = today
                    .checked_sub_signed(Duration::days(i64::from(days) - 1))
                    .unwrap_or(NaiveDate::MIN);
                DateRange::new(start, today)
            }
            Period::CalendarMonth { month, year } => {
                let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
                    LedgerError::InvalidPeriod(format!("no such month {month}/{year}"))
                })?;
                let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))
                    .ok_or_else(|| {
                        LedgerError::InvalidPeriod(format!("no such month {month}/{year}"))
                    })?;
                DateRange::new(start, end)
            }
            Period::AllTime => Ok(DateRange::all_time()),
        }
    }

    /// Human-readable heading for summaries, e.g. `February 2024`.
    pub fn label(&self, today: NaiveDate) -> String {
        match (*self, self.range(today)) {
            (Period::LastNDays(days), Ok(range)) => {
                format!("Last {days} days ({} to {})", range.start, range.end)
            }
            (Period::CalendarMonth { .. }, Ok(range)) => range.start.format("%B %Y").to_string(),
            (Period::AllTime, _) => "All time".to_string(),
            (_, Err(_)) => self.to_string(),
        }
    }

    /// Parses shell arguments such as `week`, `last 14`, `month 2 2024` or `all`.
    pub fn parse(args: &[&str], today: NaiveDate) -> Result<Self> {
        let lowered: Vec<String> = args.iter().map(|arg| arg.to_ascii_lowercase()).collect();
        let tokens: Vec<&str> = lowered.iter().map(String::as_str).collect();
        match tokens.as_slice() {
            ["week"] | ["weekly"] | ["7days"] => Ok(Period::week()),
            ["30days"] => Ok(Period::last_30_days()),
            ["last", days] => parse_number::<u32>(days, "number of days").map(Period::LastNDays),
            ["month"] | ["monthly"] => Ok(Period::current_month(today)),
            ["month", month, year] => {
                let month = parse_number::<u32>(month, "month")?;
                let year = parse_number::<i32>(year, "year")?;
                let period = Period::CalendarMonth { month, year };
                period.range(today)?;
                Ok(period)
            }
            ["all"] | ["all-time"] => Ok(Period::AllTime),
            _ => Err(LedgerError::InvalidPeriod(format!(
                "unrecognised period `{}` (try: week, 30days, last <n>, month [<m> <y>], all)",
                args.join(" ")
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::LastNDays(days) => write!(f, "last {days} days"),
            Period::CalendarMonth { month, year } => write!(f, "{year}-{month:02}"),
            Period::AllTime => f.write_str("all time"),
        }
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse::<T>()
        .map_err(|_| LedgerError::InvalidPeriod(format!("invalid {what} `{raw}`")))
}

/// Number of days in `month` of `year`; 0 for an invalid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        year.checked_add(1).map(|next_year| (next_year, 1))
    } else {
        month.checked_add(1).map(|next_month| (year, next_month))
    };
    next.and_then(|(next_year, next_month)| NaiveDate::from_ymd_opt(next_year, next_month, 1))
        .and_then(|first_next| first_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}
