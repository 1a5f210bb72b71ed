use chrono::{Duration, NaiveDate};
use expense_ledger::{
    core::services::SummaryService,
    ledger::{DateRange, ExpenseRecord, Ledger, Period},
};
use proptest::prelude::*;
use rust_decimal::Decimal;

const CATEGORIES: [&str; 4] = ["Food", "Rent", "Travel", "Bills"];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn arb_record() -> impl Strategy<Value = ExpenseRecord> {
    (0i64..120, 0usize..CATEGORIES.len(), 0i64..1_000_000).prop_map(|(offset, cat, cents)| {
        ExpenseRecord::new(
            base_date() + Duration::days(offset),
            CATEGORIES[cat],
            Decimal::new(cents, 2),
            "",
        )
    })
}

fn arb_ledger() -> impl Strategy<Value = Ledger> {
    prop::collection::vec(arb_record(), 0..60).prop_map(Ledger::from)
}

proptest! {
    #[test]
    fn category_totals_add_up_to_the_ledger_total(ledger in arb_ledger()) {
        let total = SummaryService::total_amount(&ledger).unwrap();
        let by_category: Decimal = SummaryService::by_category(&ledger)
            .unwrap()
            .iter()
            .map(|entry| entry.amount)
            .sum();
        let by_day: Decimal = SummaryService::by_day(&ledger).unwrap().values().copied().sum();
        prop_assert_eq!(total, by_category);
        prop_assert_eq!(total, by_day);
    }

    #[test]
    fn category_totals_are_sorted_descending(ledger in arb_ledger()) {
        let totals = SummaryService::by_category(&ledger).unwrap();
        prop_assert!(totals.windows(2).all(|pair| pair[0].amount >= pair[1].amount));
    }

    #[test]
    fn percentages_sum_to_one_hundred(ledger in arb_ledger()) {
        let summary = SummaryService::summarize(&ledger, Period::AllTime, base_date(), 5).unwrap();
        let percent: f64 = summary.categories.iter().map(|share| share.percent).sum();
        if summary.total.is_zero() {
            prop_assert_eq!(percent, 0.0);
        } else {
            prop_assert!((percent - 100.0).abs() < 1e-6, "sum was {}", percent);
        }
    }

    #[test]
    fn daily_totals_ignore_record_order(ledger in arb_ledger()) {
        let mut reversed = ledger.records.clone();
        reversed.reverse();
        prop_assert_eq!(
            SummaryService::by_day(&ledger).unwrap(),
            SummaryService::by_day(&Ledger::from(reversed)).unwrap()
        );
    }

    #[test]
    fn all_time_filter_is_identity(ledger in arb_ledger()) {
        prop_assert_eq!(
            SummaryService::filter_by_range(&ledger, &DateRange::all_time()),
            ledger
        );
    }

    #[test]
    fn last_n_days_covers_exactly_n_days(days in 1u32..400, offset in 0i64..120) {
        let today = base_date() + Duration::days(offset);
        let range = Period::LastNDays(days).range(today).unwrap();
        prop_assert_eq!(range.end, today);
        prop_assert_eq!((range.end - range.start).num_days() + 1, i64::from(days));
    }

    #[test]
    fn top_recent_is_bounded_and_latest_first(ledger in arb_ledger(), k in 0usize..10) {
        let recent = SummaryService::top_recent(&ledger, k);
        prop_assert_eq!(recent.len(), k.min(ledger.len()));
        prop_assert!(recent.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }
}
