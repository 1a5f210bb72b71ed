use rust_decimal::prelude::ToPrimitive;

use crate::cli::commands::expense::records_table;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::ui::chart::BarChart;
use crate::cli::ui::table_renderer::{Table, TableColumn};
use crate::core::services::{PeriodSummary, SummaryService};
use crate::ledger::{Period, DATE_FORMAT};

const PERIOD_CHOICES: [&str; 5] = [
    "Last 7 days",
    "Last 30 days",
    "Current month",
    "Specific month",
    "All time",
];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Totals by category and by day for a period",
        "summary [week|30days|last <n>|month [<m> <yyyy>]|all]",
        cmd_summary,
    )]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let period = if args.is_empty() {
        if context.is_interactive() {
            choose_period(context)?
        } else {
            Period::week()
        }
    } else {
        Period::parse(args, context.today())?
    };
    show_summary(context, period)
}

/// Interactive period chooser shared with the menu.
pub(crate) fn choose_period(context: &ShellContext) -> Result<Period, CommandError> {
    let today = context.today();
    let period = match io::prompt_select(&context.theme, "Summary period", &PERIOD_CHOICES)? {
        0 => Period::week(),
        1 => Period::last_30_days(),
        2 => Period::current_month(today),
        3 => {
            let month = io::prompt_text(&context.theme, "Month (1-12)", None)?;
            let year = io::prompt_text(&context.theme, "Year (YYYY)", None)?;
            Period::parse(&["month", month.trim(), year.trim()], today)?
        }
        _ => Period::AllTime,
    };
    Ok(period)
}

pub(crate) fn show_summary(context: &mut ShellContext, period: Period) -> CommandResult {
    let today = context.today();
    period.range(today)?;

    let ledger = context.load_ledger()?;
    if ledger.is_empty() {
        io::print_warning("No expenses recorded yet.");
        return Ok(());
    }

    let summary = SummaryService::summarize(&ledger, period, today, context.config.recent_limit)?;
    if summary.is_empty() {
        io::print_warning(format!("No expenses in {}.", summary.label));
        return Ok(());
    }

    render_summary(context, &summary);
    Ok(())
}

fn render_summary(context: &ShellContext, summary: &PeriodSummary) {
    output::section(format!("Summary: {}", summary.label));
    io::print_info(format!(
        "Total spent: {} across {} {}",
        context.format_amount(summary.total),
        summary.entry_count,
        if summary.entry_count == 1 {
            "entry"
        } else {
            "entries"
        }
    ));

    output::section("By category");
    let mut categories = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    for share in &summary.categories {
        categories.push_row(vec![
            share.category.clone(),
            context.format_amount(share.amount),
            format!("{:.1}%", share.percent),
        ]);
    }
    output::block(&categories.render());

    if context.config.show_charts {
        let chart = summary
            .categories
            .iter()
            .fold(BarChart::new("Spending by category"), |chart, share| {
                chart.bar(
                    &share.category,
                    share.amount.to_f64().unwrap_or(0.0),
                    format!("{:.1}%", share.percent),
                )
            });
        output::section("Charts");
        output::block(&chart.render());
    }

    output::section("Daily totals");
    if context.config.show_charts {
        let chart = summary
            .daily
            .iter()
            .fold(BarChart::new("Spending by day"), |chart, (day, amount)| {
                chart.bar(
                    day.format(DATE_FORMAT).to_string(),
                    amount.to_f64().unwrap_or(0.0),
                    context.format_amount(*amount),
                )
            });
        output::block(&chart.render());
    } else {
        let mut daily = Table::new(vec![TableColumn::left("Date"), TableColumn::right("Amount")]);
        for (day, amount) in &summary.daily {
            daily.push_row(vec![
                day.format(DATE_FORMAT).to_string(),
                context.format_amount(*amount),
            ]);
        }
        output::block(&daily.render());
    }

    output::section(format!("Top {} recent entries", summary.recent.len()));
    output::block(&records_table(context, &summary.recent).render());
}

#[cfg(test)]
mod tests {
    use crate::cli::core::test_support::context;
    use crate::errors::LedgerError;

    use super::*;

    #[test]
    fn summary_without_records_is_not_an_error() {
        let (mut context, _guard) = context();
        context.process_line("summary all").unwrap();
    }

    #[test]
    fn summary_accepts_every_period_form() {
        let (mut context, _guard) = context();
        context.process_line("add 2024-01-09 food 10").unwrap();
        context.process_line("add 2023-12-01 bills 40").unwrap();
        for line in [
            "summary",
            "summary week",
            "summary 30days",
            "summary last 3",
            "summary month",
            "summary month 12 2023",
            "summary all",
        ] {
            context
                .process_line(line)
                .unwrap_or_else(|err| panic!("{line}: {err}"));
        }
    }

    #[test]
    fn bad_periods_are_validation_errors() {
        let (mut context, _guard) = context();
        context.process_line("add today food 10").unwrap();
        for line in ["summary month 13 2024", "summary last 0", "summary fortnight"] {
            assert!(matches!(
                context.process_line(line),
                Err(CommandError::Core(LedgerError::InvalidPeriod(_)))
            ));
        }
    }
}
