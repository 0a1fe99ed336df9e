//! Expense records and the period selectors used to scope reports

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::constants;

/// Expense entry as submitted, before it reaches the store.
///
/// `amount` is kept as the raw text the user typed; it is only interpreted
/// when the log is read back.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub amount: String,
    pub note: String,
}

/// Expense entry loaded from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub category: String,
    /// Numeric amount (unparsable input reads as 0)
    pub amount: f64,
    pub note: String,
}

impl Expense {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn in_month(&self, period: MonthPeriod) -> bool {
        self.date.year() == period.year && self.date.month() == period.month
    }

    /// Date as it appears in detail listings
    pub fn date_string(&self) -> String {
        self.date.format(constants::DATE_FORMAT).to_string()
    }
}

impl From<NewExpense> for Expense {
    fn from(new: NewExpense) -> Self {
        Self {
            date: new.date,
            category: new.category,
            amount: parse_amount(&new.amount),
            note: new.note,
        }
    }
}

/// Interpret a stored amount. Anything that is not a finite number counts as 0.
pub fn parse_amount(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), constants::DATE_FORMAT).ok()
}

/// Sum of all amounts
pub fn total_amount(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|e| e.amount).sum()
}

// =============================================================================
// Periods
// =============================================================================

/// A (year, month) selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    pub fn month_name(&self) -> &'static str {
        constants::month_name(self.month)
    }
}

impl std::fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

/// Month and year of the most recent record, if any
pub fn latest_period(expenses: &[Expense]) -> Option<MonthPeriod> {
    expenses.iter().map(|e| e.date).max().map(|date| MonthPeriod {
        year: date.year(),
        month: date.month(),
    })
}

/// Most recent year present in the records
pub fn latest_year(expenses: &[Expense]) -> Option<i32> {
    latest_period(expenses).map(|p| p.year)
}

/// Every distinct year in the records, newest first
pub fn years_present(expenses: &[Expense]) -> Vec<i32> {
    let mut years: Vec<i32> = expenses.iter().map(Expense::year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Rejected month/year selector
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(i64),

    #[error("year must be a positive number, got {0}")]
    YearOutOfRange(i64),
}

/// Parse an optional month selector. Blank counts as absent.
pub fn parse_month(raw: Option<&str>) -> Result<Option<u32>, SelectorError> {
    let Some(value) = parse_integer("month", raw)? else {
        return Ok(None);
    };
    if !(1..=12).contains(&value) {
        return Err(SelectorError::MonthOutOfRange(value));
    }
    Ok(Some(value as u32))
}

/// Parse an optional year selector. Blank counts as absent.
pub fn parse_year(raw: Option<&str>) -> Result<Option<i32>, SelectorError> {
    let Some(value) = parse_integer("year", raw)? else {
        return Ok(None);
    };
    // chrono's NaiveDate tops out well below i32::MAX
    if !(1..=262_143).contains(&value) {
        return Err(SelectorError::YearOutOfRange(value));
    }
    Ok(Some(value as i32))
}

fn parse_integer(field: &'static str, raw: Option<&str>) -> Result<Option<i64>, SelectorError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    raw.parse::<i64>()
        .map(Some)
        .map_err(|_| SelectorError::NotANumber {
            field,
            value: raw.to_string(),
        })
}
