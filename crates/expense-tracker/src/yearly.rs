//! Yearly month-by-month totals with highest/lowest month analysis

use serde::Serialize;

use crate::constants;
use crate::expenses::{Expense, latest_year, years_present};
use crate::reports::{CategoryTotal, DetailRow, NoData, Outcome, top_categories, totals_by_category};

/// Highest or lowest month of a year and what drove it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthHighlight {
    /// 1-12
    pub month: u32,
    pub name: &'static str,
    pub total: f64,
    /// Up to three biggest categories that month, highest first
    pub reasons: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyReport {
    pub year: i32,
    /// Every year with records, newest first
    pub years: Vec<i32>,
    /// January through December, months without records are 0
    pub monthly_totals: [f64; 12],
    pub total: f64,
    pub highest: MonthHighlight,
    pub lowest: MonthHighlight,
    pub details: Vec<DetailRow>,
}

/// Build the report for the selected year (default: most recent year)
pub fn yearly_report(expenses: &[Expense], year: Option<i32>) -> Outcome<YearlyReport> {
    let Some(latest) = latest_year(expenses) else {
        return Outcome::NoData(NoData::Store);
    };
    let year = year.unwrap_or(latest);

    let in_year: Vec<&Expense> = expenses.iter().filter(|e| e.year() == year).collect();
    if in_year.is_empty() {
        return Outcome::NoData(NoData::Year(year));
    }

    let monthly_totals = totals_by_month(&in_year);
    let (max_idx, min_idx) = extremes(&monthly_totals);

    Outcome::Report(YearlyReport {
        year,
        years: years_present(expenses),
        monthly_totals,
        total: monthly_totals.iter().sum(),
        highest: highlight(&in_year, max_idx as u32 + 1, monthly_totals[max_idx]),
        lowest: highlight(&in_year, min_idx as u32 + 1, monthly_totals[min_idx]),
        details: in_year.into_iter().map(DetailRow::from).collect(),
    })
}

fn totals_by_month(expenses: &[&Expense]) -> [f64; 12] {
    let mut totals = [0.0; 12];
    for expense in expenses {
        totals[expense.month() as usize - 1] += expense.amount;
    }
    totals
}

/// Indices of the largest and smallest totals. Ties go to the earliest month.
fn extremes(totals: &[f64; 12]) -> (usize, usize) {
    let mut max_idx = 0;
    let mut min_idx = 0;
    for (i, &total) in totals.iter().enumerate().skip(1) {
        if total > totals[max_idx] {
            max_idx = i;
        }
        if total < totals[min_idx] {
            min_idx = i;
        }
    }
    (max_idx, min_idx)
}

fn highlight(in_year: &[&Expense], month: u32, total: f64) -> MonthHighlight {
    let in_month = in_year.iter().copied().filter(|e| e.month() == month);
    MonthHighlight {
        month,
        name: constants::month_name(month),
        total,
        reasons: top_categories(totals_by_category(in_month), constants::TOP_REASONS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expenses::tests::expense;

    fn report(outcome: Outcome<YearlyReport>) -> YearlyReport {
        match outcome {
            Outcome::Report(report) => report,
            Outcome::NoData(reason) => panic!("expected a report, got: {reason}"),
        }
    }

    #[test]
    fn test_march_and_july_only() {
        let expenses = vec![
            expense("2024-03-02", "Rent", 250.0),
            expense("2024-03-09", "Food", 50.0),
            expense("2024-07-14", "Travel", 100.0),
        ];

        let report = report(yearly_report(&expenses, Some(2024)));

        assert_eq!(report.highest.month, 3);
        assert_eq!(report.highest.name, "March");
        assert_eq!(report.highest.total, 300.0);
        assert_eq!(report.lowest.month, 1);
        assert_eq!(report.lowest.name, "January");
        assert_eq!(report.lowest.total, 0.0);
        assert!(report.lowest.reasons.is_empty());

        let reasons: Vec<&str> = report
            .highest
            .reasons
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(reasons, vec!["Rent", "Food"]);
    }

    #[test]
    fn test_twelve_zero_filled_months() {
        let expenses = vec![
            expense("2024-02-10", "Food", 10.0),
            expense("2024-02-11", "Food", 5.0),
            expense("2024-12-31", "Gifts", 40.0),
            expense("2023-05-05", "Food", 1000.0),
        ];

        let report = report(yearly_report(&expenses, Some(2024)));

        assert_eq!(report.monthly_totals.len(), 12);
        assert_eq!(
            report.monthly_totals,
            [0.0, 15.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 40.0]
        );
        assert_eq!(report.total, 55.0);
        assert_eq!(report.monthly_totals.iter().sum::<f64>(), report.total);
        assert_eq!(report.details.len(), 3);
    }

    #[test]
    fn test_all_equal_months_pick_january() {
        let expenses: Vec<Expense> = (1..=12)
            .map(|m| expense(&format!("2024-{:02}-01", m), "Rent", 100.0))
            .collect();

        let report = report(yearly_report(&expenses, Some(2024)));

        assert_eq!(report.highest.month, 1);
        assert_eq!(report.lowest.month, 1);
    }

    #[test]
    fn test_reasons_top_three_descending() {
        let expenses = vec![
            expense("2024-05-01", "A", 10.0),
            expense("2024-05-02", "B", 40.0),
            expense("2024-05-03", "C", 30.0),
            expense("2024-05-04", "D", 20.0),
            expense("2024-05-05", "A", 15.0),
        ];

        let report = report(yearly_report(&expenses, None));

        let reasons = &report.highest.reasons;
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0].category, "B");
        assert_eq!(reasons[1].category, "C");
        assert_eq!(reasons[2].category, "A");
        assert_eq!(reasons[2].total, 25.0);
        assert!(reasons.windows(2).all(|w| w[0].total >= w[1].total));
    }

    #[test]
    fn test_defaults_to_latest_year_and_lists_years() {
        let expenses = vec![
            expense("2022-01-01", "Food", 1.0),
            expense("2024-06-01", "Food", 2.0),
            expense("2023-01-01", "Food", 3.0),
        ];

        let report = report(yearly_report(&expenses, None));

        assert_eq!(report.year, 2024);
        assert_eq!(report.years, vec![2024, 2023, 2022]);
    }

    #[test]
    fn test_no_data() {
        assert_eq!(yearly_report(&[], None), Outcome::NoData(NoData::Store));

        let expenses = vec![expense("2024-01-01", "Food", 1.0)];
        let outcome = yearly_report(&expenses, Some(2020));
        assert_eq!(outcome, Outcome::NoData(NoData::Year(2020)));
    }

    #[test]
    fn test_extremes_ties_take_first_month() {
        let mut totals = [5.0; 12];
        totals[4] = 9.0;
        totals[8] = 9.0;
        totals[2] = 1.0;
        totals[10] = 1.0;
        assert_eq!(extremes(&totals), (4, 2));
    }
}
