//! SQLite-backed expense log
//!
//! Same contract as the CSV log: rows are only ever inserted, amounts are kept
//! as the submitted text, and reads come back in insertion order.

use anyhow::{Context, Result, anyhow};
use sqlx::{FromRow, SqlitePool};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::ExpenseStore;
use crate::constants;
use crate::expenses::{self, Expense, NewExpense};

/// Expense log stored in an SQLite database
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

/// Row type for expenses query
#[derive(FromRow)]
struct ExpenseRow {
    id: i64,
    date: String,
    category: String,
    amount: String,
    note: String,
}

impl SqliteStore {
    /// Open or create the database
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // SQLx requires the file to exist for SQLite
        if !path.exists() {
            std::fs::File::create(path)?;
            info!(path = %path.display(), "created expense database");
        }

        let url = format!("sqlite:{}", path.display());
        let pool = SqlitePool::connect(&url)
            .await
            .context("Failed to open expense database")?;

        sqlx::query("PRAGMA busy_timeout=5000")
            .execute(&pool)
            .await?;

        let store = Self {
            pool,
            path: path.to_path_buf(),
        };
        store.init_schema().await?;

        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                amount TEXT NOT NULL,
                note TEXT NOT NULL DEFAULT ''
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of stored expenses
    pub async fn count(&self) -> Result<u64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 as u64)
    }
}

impl ExpenseStore for SqliteStore {
    async fn append(&self, expense: &NewExpense) -> Result<()> {
        let result = sqlx::query(
            "INSERT INTO expenses (date, category, amount, note)
             VALUES (?, ?, ?, ?)",
        )
        .bind(expense.date.format(constants::DATE_FORMAT).to_string())
        .bind(&expense.category)
        .bind(&expense.amount)
        .bind(&expense.note)
        .execute(&self.pool)
        .await
        .context("Failed to insert expense")?;

        debug!(id = result.last_insert_rowid(), category = %expense.category, "appended expense");
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Expense>> {
        let rows: Vec<ExpenseRow> = sqlx::query_as(
            "SELECT id, date, category, amount, note
             FROM expenses
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|r| -> Result<Expense> {
                let date = expenses::parse_date(&r.date)
                    .ok_or_else(|| anyhow!("Invalid date '{}' in expense #{}", r.date, r.id))?;
                Ok(Expense {
                    date,
                    category: r.category,
                    amount: expenses::parse_amount(&r.amount),
                    note: r.note,
                })
            })
            .collect()
    }

    fn location(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn new_expense(date: &str, category: &str, amount: &str) -> NewExpense {
        NewExpense {
            date: expenses::parse_date(date).unwrap(),
            category: category.to_string(),
            amount: amount.to_string(),
            note: "note".to_string(),
        }
    }

    #[tokio::test]
    async fn test_append_then_reload_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("expenses.sqlite"))
            .await
            .unwrap();

        store.append(&new_expense("2024-05-01", "Rent", "900")).await.unwrap();
        store.append(&new_expense("2024-01-01", "Food", "bad")).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 2);
        assert_eq!(loaded[0].category, "Rent");
        assert_eq!(loaded[0].amount, 900.0);
        assert_eq!(loaded[0].note, "note");
        // Insertion order, not date order
        assert_eq!(loaded[1].date_string(), "2024-01-01");
        assert_eq!(loaded[1].amount, 0.0);
    }

    #[tokio::test]
    async fn test_reopen_keeps_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("expenses.sqlite");

        {
            let store = SqliteStore::open(&path).await.unwrap();
            store.append(&new_expense("2024-05-01", "Rent", "900")).await.unwrap();
        }

        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_schema_has_only_record_columns() {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("expenses.sqlite"))
            .await
            .unwrap();

        let columns: Vec<(String,)> =
            sqlx::query_as("SELECT name FROM pragma_table_info('expenses') ORDER BY cid")
                .fetch_all(&store.pool)
                .await
                .unwrap();

        let names: Vec<&str> = columns.iter().map(|c| c.0.as_str()).collect();
        assert_eq!(names, vec!["id", "date", "category", "amount", "note"]);
    }
}
