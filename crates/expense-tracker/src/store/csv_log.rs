//! Flat-file CSV log (`Date,Category,Amount,Note`)

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ExpenseStore;
use crate::constants;
use crate::expenses::{self, Expense, NewExpense};

/// Expense log stored as a CSV file
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open the log, creating it with a header row if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { path: path.into() };
        store.ensure_log()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_log(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let mut wtr = WriterBuilder::new()
            .from_path(&self.path)
            .with_context(|| format!("Failed to create expense log {}", self.path.display()))?;
        wtr.write_record(constants::CSV_HEADER)?;
        wtr.flush()?;

        info!(path = %self.path.display(), "created expense log");
        Ok(())
    }
}

impl ExpenseStore for CsvStore {
    async fn append(&self, expense: &NewExpense) -> Result<()> {
        self.ensure_log()?;

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open expense log {}", self.path.display()))?;

        let mut wtr = WriterBuilder::new().has_headers(false).from_writer(file);
        wtr.write_record([
            expense.date.format(constants::DATE_FORMAT).to_string().as_str(),
            expense.category.as_str(),
            expense.amount.as_str(),
            expense.note.as_str(),
        ])?;
        wtr.flush()
            .with_context(|| format!("Failed to write expense log {}", self.path.display()))?;

        debug!(date = %expense.date, category = %expense.category, "appended expense");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Expense>> {
        self.ensure_log()?;
        Ok(read_csv(&self.path)?.into_iter().map(Expense::from).collect())
    }

    fn location(&self) -> String {
        self.path().display().to_string()
    }
}

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    category: usize,
    amount: usize,
    note: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord, path: &Path) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let (date, category, amount) = match (find("Date"), find("Category"), find("Amount")) {
            (Some(d), Some(c), Some(a)) => (d, c, a),
            (d, c, a) => {
                let missing: Vec<&str> = [("Date", d), ("Category", c), ("Amount", a)]
                    .into_iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name)
                    .collect();
                bail!(
                    "Expense log {} is missing required column(s): {}",
                    path.display(),
                    missing.join(", ")
                );
            }
        };

        Ok(Self {
            date,
            category,
            amount,
            note: find("Note"),
        })
    }
}

/// Read every row of a CSV log, keeping amounts as the raw text.
///
/// A zero-byte file is an empty log. A missing `Note` column or a short row
/// reads as an empty note.
pub fn read_csv(path: &Path) -> Result<Vec<NewExpense>> {
    let len = std::fs::metadata(path)
        .with_context(|| format!("Failed to read expense log {}", path.display()))?
        .len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open expense log {}", path.display()))?;

    let columns = Columns::from_headers(rdr.headers()?, path)?;
    let field = |record: &StringRecord, idx: usize| record.get(idx).unwrap_or("").to_string();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.with_context(|| format!("Malformed row in {}", path.display()))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_date = record.get(columns.date).unwrap_or("");
        let Some(date) = expenses::parse_date(raw_date) else {
            bail!(
                "Invalid date '{}' on line {} of {} (expected YYYY-MM-DD)",
                raw_date,
                line,
                path.display()
            );
        };

        rows.push(NewExpense {
            date,
            category: field(&record, columns.category),
            amount: field(&record, columns.amount),
            note: columns.note.map(|idx| field(&record, idx)).unwrap_or_default(),
        });
    }

    Ok(rows)
}

/// Write loaded expenses to a new CSV file (for backup)
pub fn export_to_csv(expenses: &[Expense], path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(constants::CSV_HEADER)?;
    for expense in expenses {
        wtr.write_record([
            expense.date_string().as_str(),
            expense.category.as_str(),
            expense.amount.to_string().as_str(),
            expense.note.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
