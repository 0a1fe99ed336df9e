//! In-process store for tests

use anyhow::{Result, anyhow};
use std::sync::Mutex;

use super::ExpenseStore;
use crate::expenses::{Expense, NewExpense};

#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<NewExpense>>,
}

impl MemoryStore {
    pub fn with_rows(rows: Vec<NewExpense>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }
}

impl ExpenseStore for MemoryStore {
    async fn append(&self, expense: &NewExpense) -> Result<()> {
        self.rows
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?
            .push(expense.clone());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Expense>> {
        let rows = self
            .rows
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(rows.iter().cloned().map(Expense::from).collect())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
