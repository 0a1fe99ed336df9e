//! Shared report building blocks and console rendering
//!
//! The monthly and yearly aggregators both group a filtered slice of records
//! by category and list the records they looked at; those pieces live here.

use serde::Serialize;
use std::collections::HashMap;

use crate::constants;
use crate::expenses::{Expense, MonthPeriod};
use crate::monthly::MonthlyReport;
use crate::yearly::YearlyReport;

/// Result of a report request: either the report or a reason there is nothing to show
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    NoData(NoData),
    Report(T),
}

/// Why a report came back empty. Informational, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoData {
    /// The store has no records at all
    Store,
    /// No records in the requested month
    Month(MonthPeriod),
    /// No records in the requested year
    Year(i32),
}

impl std::fmt::Display for NoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoData::Store => write!(f, "No expense data to show."),
            NoData::Month(period) => write!(f, "No expenses found for {}.", period),
            NoData::Year(year) => write!(f, "No expenses found for {}.", year),
        }
    }
}

/// Summed amount for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// One row of a detail listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    /// `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub amount: f64,
    pub note: String,
}

impl From<&Expense> for DetailRow {
    fn from(expense: &Expense) -> Self {
        Self {
            date: expense.date_string(),
            category: expense.category.clone(),
            amount: expense.amount,
            note: expense.note.clone(),
        }
    }
}

/// Sum amounts per category, keeping categories in the order they first appear
pub fn totals_by_category<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> Vec<CategoryTotal> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        match index.get(expense.category.as_str()) {
            Some(&i) => totals[i].total += expense.amount,
            None => {
                index.insert(expense.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: expense.category.clone(),
                    total: expense.amount,
                });
            }
        }
    }

    totals
}

/// Largest `n` categories, highest first. Equal totals keep first-seen order.
pub fn top_categories(mut totals: Vec<CategoryTotal>, n: usize) -> Vec<CategoryTotal> {
    // sort_by is stable
    totals.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    totals.truncate(n);
    totals
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// =============================================================================
// Console rendering
// =============================================================================

/// Truncate a string for fixed-width columns
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Fixed-width table of expense rows
pub fn print_details(details: &[DetailRow], currency: &str) {
    println!("{:<12} {:<16} {:>12}  Note", "Date", "Category", "Amount");
    println!("{}", "-".repeat(64));
    for row in details {
        println!(
            "{:<12} {:<16} {}{:>11.2}  {}",
            row.date,
            truncate(&row.category, 16),
            currency,
            row.amount,
            truncate(&row.note, 30),
        );
    }
}

/// Print a monthly report to stdout
pub fn print_monthly(report: &MonthlyReport, currency: &str) {
    println!("Expenses for {}", report.period);
    println!("=============================================\n");

    println!("{:<20} {:>12} {:>8}", "Category", "Total", "Share");
    println!("{}", "-".repeat(42));
    for category in &report.categories {
        println!(
            "{:<20} {}{:>11.2} {:>7.1}%",
            truncate(&category.category, 20),
            currency,
            category.total,
            category.share
        );
    }
    println!("{}", "-".repeat(42));
    println!("{:<20} {}{:>11.2}\n", "Total", currency, report.total);

    print_details(&report.details, currency);
    println!("\n{} expense(s)", report.details.len());
}

/// Print a yearly report to stdout
pub fn print_yearly(report: &YearlyReport, currency: &str) {
    println!("Expenses for {}", report.year);
    println!("=============================================\n");

    for (i, total) in report.monthly_totals.iter().enumerate() {
        println!(
            "  {:<4} {}{:>11.2}",
            constants::month_abbreviation(i as u32 + 1),
            currency,
            total
        );
    }
    println!("  {}", "-".repeat(18));
    println!("  {:<4} {}{:>11.2}\n", "Year", currency, report.total);

    for (label, highlight) in [("Highest", &report.highest), ("Lowest", &report.lowest)] {
        println!(
            "{} month: {} ({}{:.2})",
            label, highlight.name, currency, highlight.total
        );
        for reason in &highlight.reasons {
            println!("    {:<20} {}{:.2}", reason.category, currency, reason.total);
        }
    }
    println!();

    print_details(&report.details, currency);
    println!("\n{} expense(s)", report.details.len());
}
