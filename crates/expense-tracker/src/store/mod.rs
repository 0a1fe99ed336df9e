//! Persistent expense log
//!
//! Reports only ever need two things from storage: add a record at the end,
//! and read everything back in insertion order. Backends implement
//! [`ExpenseStore`] so the aggregation code never knows where records live.

mod csv_log;
#[cfg(test)]
pub mod memory;
mod sqlite;

use anyhow::Result;
use std::future::Future;

use crate::expenses::{Expense, NewExpense};

pub use csv_log::{CsvStore, export_to_csv, read_csv};
pub use sqlite::SqliteStore;

/// Ordered, append-only expense storage
pub trait ExpenseStore: Send + Sync + 'static {
    /// Add one record as the new last entry. The amount is stored verbatim.
    fn append(&self, expense: &NewExpense) -> impl Future<Output = Result<()>> + Send;

    /// Every record in insertion order, amounts coerced to numbers
    fn load_all(&self) -> impl Future<Output = Result<Vec<Expense>>> + Send;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}
