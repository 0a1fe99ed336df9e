//! Monthly category breakdown

use serde::Serialize;

use crate::expenses::{Expense, MonthPeriod, latest_period};
use crate::reports::{CategoryTotal, DetailRow, NoData, Outcome, round1, totals_by_category};

/// A category's total and its share of the month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Percent of the month's total, one decimal place
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReport {
    pub period: MonthPeriod,
    pub month_name: &'static str,
    /// Categories in first-seen order
    pub categories: Vec<CategoryShare>,
    pub total: f64,
    pub details: Vec<DetailRow>,
}

/// Build the report for the selected month.
///
/// A missing month or year falls back to that of the most recent record.
pub fn monthly_report(
    expenses: &[Expense],
    month: Option<u32>,
    year: Option<i32>,
) -> Outcome<MonthlyReport> {
    let Some(latest) = latest_period(expenses) else {
        return Outcome::NoData(NoData::Store);
    };

    let period = MonthPeriod {
        year: year.unwrap_or(latest.year),
        month: month.unwrap_or(latest.month),
    };
    report_for_month(expenses, period)
}

/// Build the report for an explicit month
pub fn report_for_month(expenses: &[Expense], period: MonthPeriod) -> Outcome<MonthlyReport> {
    let in_month: Vec<&Expense> = expenses.iter().filter(|e| e.in_month(period)).collect();
    if in_month.is_empty() {
        return Outcome::NoData(NoData::Month(period));
    }

    let totals = totals_by_category(in_month.iter().copied());
    let total: f64 = totals.iter().map(|t| t.total).sum();

    Outcome::Report(MonthlyReport {
        period,
        month_name: period.month_name(),
        categories: shares(totals, total),
        total,
        details: in_month.into_iter().map(DetailRow::from).collect(),
    })
}

/// Attach percentage shares. A zero or overflowed grand total gives every
/// category 0%.
fn shares(totals: Vec<CategoryTotal>, grand_total: f64) -> Vec<CategoryShare> {
    totals
        .into_iter()
        .map(|t| {
            let share = round1(t.total / grand_total * 100.0);
            let share = if grand_total == 0.0 || !share.is_finite() {
                0.0
            } else {
                share
            };
            CategoryShare {
                category: t.category,
                total: t.total,
                share,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::tests::expense;

    fn report(outcome: Outcome<MonthlyReport>) -> MonthlyReport {
        match outcome {
            Outcome::Report(report) => report,
            Outcome::NoData(reason) => panic!("expected a report, got: {reason}"),
        }
    }

    #[test]
    fn test_january_food_and_transport() {
        let expenses = vec![
            expense("2024-01-03", "Food", 100.0),
            expense("2024-01-10", "Food", 50.0),
            expense("2024-01-12", "Transport", 25.0),
            expense("2024-02-01", "Food", 999.0),
        ];

        let report = report(monthly_report(&expenses, Some(1), Some(2024)));

        assert_eq!(
            report.categories,
            vec![
                CategoryShare {
                    category: "Food".to_string(),
                    total: 150.0,
                    share: 85.7,
                },
                CategoryShare {
                    category: "Transport".to_string(),
                    total: 25.0,
                    share: 14.3,
                },
            ]
        );
        assert_eq!(report.total, 175.0);
        assert_eq!(report.month_name, "January");
        assert_eq!(report.details.len(), 3);
    }

    #[test]
    fn test_defaults_to_latest_month() {
        let expenses = vec![
            expense("2024-03-05", "Rent", 500.0),
            expense("2023-12-24", "Gifts", 80.0),
            expense("2024-03-01", "Food", 20.0),
        ];

        let report = report(monthly_report(&expenses, None, None));

        assert_eq!(
            report.period,
            MonthPeriod {
                year: 2024,
                month: 3
            }
        );
        assert_eq!(report.categories.len(), 2);
    }

    #[test]
    fn test_missing_selector_defaults_individually() {
        let expenses = vec![
            expense("2023-03-05", "Rent", 500.0),
            expense("2024-03-11", "Books", 30.0),
            expense("2024-07-01", "Food", 20.0),
        ];

        // Year given, month taken from the latest record (July)
        let outcome = monthly_report(&expenses, None, Some(2023));
        assert_eq!(
            outcome,
            Outcome::NoData(NoData::Month(MonthPeriod {
                year: 2023,
                month: 7
            }))
        );

        // Month given, year taken from the latest record (2024)
        let report = report(monthly_report(&expenses, Some(3), None));
        assert_eq!(
            report.period,
            MonthPeriod {
                year: 2024,
                month: 3
            }
        );
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].category, "Books");
    }

    #[test]
    fn test_missing_year_does_not_fall_back_to_other_years() {
        let expenses = vec![
            expense("2023-03-05", "Rent", 500.0),
            expense("2024-07-01", "Food", 20.0),
        ];

        assert_eq!(
            monthly_report(&expenses, Some(3), None),
            Outcome::NoData(NoData::Month(MonthPeriod {
                year: 2024,
                month: 3
            }))
        );
    }

    #[test]
    fn test_overflowed_total_gives_finite_shares() {
        let expenses = vec![
            expense("2024-01-03", "Food", 1e308),
            expense("2024-01-04", "Food", 1e308),
            expense("2024-01-05", "Fun", 5.0),
        ];

        let report = report(monthly_report(&expenses, Some(1), Some(2024)));

        assert!(report.total.is_infinite());
        assert!(report.categories.iter().all(|c| c.share.is_finite()));
    }

    #[test]
    fn test_empty_store() {
        assert_eq!(
            monthly_report(&[], Some(1), Some(2024)),
            Outcome::NoData(NoData::Store)
        );
    }

    #[test]
    fn test_empty_period_is_informational() {
        let expenses = vec![expense("2024-01-03", "Food", 100.0)];

        let outcome = monthly_report(&expenses, Some(5), Some(2024));

        let Outcome::NoData(reason) = outcome else {
            panic!("expected no data");
        };
        assert_eq!(reason.to_string(), "No expenses found for May 2024.");
    }

    #[test]
    fn test_zero_total_gives_zero_shares() {
        // Unparsable amounts were coerced to 0 on load
        let expenses = vec![
            expense("2024-01-03", "Food", 0.0),
            expense("2024-01-04", "Fun", 0.0),
        ];

        let report = report(monthly_report(&expenses, Some(1), Some(2024)));

        assert!(report.categories.iter().all(|c| c.share == 0.0));
        assert_eq!(report.total, 0.0);
    }

    #[test]
    fn test_category_totals_sum_to_month_total() {
        let expenses = vec![
            expense("2024-06-01", "A", 10.25),
            expense("2024-06-02", "B", 0.0),
            expense("2024-06-03", "A", 4.75),
            expense("2024-06-04", "C", 33.0),
            expense("2024-07-04", "C", 1000.0),
        ];

        let report = report(monthly_report(&expenses, Some(6), Some(2024)));

        let category_sum: f64 = report.categories.iter().map(|c| c.total).sum();
        let detail_sum: f64 = report.details.iter().map(|d| d.amount).sum();
        assert_eq!(category_sum, 48.0);
        assert_eq!(detail_sum, 48.0);
    }

    #[test]
    fn test_details_keep_order_and_format_dates() {
        let expenses = vec![
            expense("2024-01-20", "Food", 1.0),
            expense("2024-01-02", "Fun", 2.0),
        ];

        let report = report(monthly_report(&expenses, Some(1), Some(2024)));

        let dates: Vec<&str> = report.details.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-20", "2024-01-02"]);
    }
}
