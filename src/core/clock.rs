use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current date so period resolution stays
/// deterministic in tests.
pub trait Clock: Send + Sync {
    /// The calendar date periods are resolved against.
    fn today(&self) -> NaiveDate;
}

/// Wall clock. `today` follows the local time zone, matching what the user
/// sees on their calendar.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }
}
