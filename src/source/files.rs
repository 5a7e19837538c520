use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{checked_expenses, checked_income, EntrySource};
use crate::aggregate::Totals;
use crate::error::{LedgerError, Result};
use crate::models::{Collaboration, ExpenseEntry, IncomeEntry, ReportPeriod};

const INCOME_FILE: &str = "income.json";
const EXPENSES_FILE: &str = "expenses.json";
const COLLABORATIONS_FILE: &str = "collaborations.json";
const OVERVIEW_FILE: &str = "overview.json";

const INCOME_PREFIX: &str = "income-";
const EXPENSE_PREFIX: &str = "expense-";

/// One past the largest `<prefix>N` id. Ids in other shapes are ignored.
fn next_number<'a>(ids: impl Iterator<Item = &'a str>, prefix: &str) -> u64 {
    ids.filter_map(|id| id.strip_prefix(prefix)?.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        + 1
}

/// Reads the same JSON shapes the backend returns from a local directory.
/// A missing file means no entries.
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| LedgerError::DataParse { path, source: e })
    }

    fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| LedgerError::Export(e.to_string()))?;
        fs::write(self.dir.join(name), content)?;
        Ok(())
    }

    pub fn all_income(&self) -> Result<Vec<IncomeEntry>> {
        self.read(INCOME_FILE)
    }

    pub fn all_expenses(&self) -> Result<Vec<ExpenseEntry>> {
        self.read(EXPENSES_FILE)
    }

    /// Append entries, numbering them after the highest existing `income-N`
    pub fn append_income(&self, entries: Vec<IncomeEntry>) -> Result<usize> {
        let mut all = self.all_income()?;
        let mut next = next_number(all.iter().map(|e| e.id.as_str()), INCOME_PREFIX);
        let added = entries.len();
        for mut entry in entries {
            entry.validate()?;
            entry.id = format!("{INCOME_PREFIX}{next}");
            next += 1;
            all.push(entry);
        }
        self.write(INCOME_FILE, &all)?;
        Ok(added)
    }

    pub fn append_expenses(&self, entries: Vec<ExpenseEntry>) -> Result<usize> {
        let mut all = self.all_expenses()?;
        let mut next = next_number(all.iter().map(|e| e.id.as_str()), EXPENSE_PREFIX);
        let added = entries.len();
        for mut entry in entries {
            entry.validate()?;
            entry.id = format!("{EXPENSE_PREFIX}{next}");
            next += 1;
            all.push(entry);
        }
        self.write(EXPENSES_FILE, &all)?;
        Ok(added)
    }

    pub fn save_collaborations(&self, collaborations: &[Collaboration]) -> Result<()> {
        self.write(COLLABORATIONS_FILE, &collaborations)
    }
}

impl EntrySource for JsonDirSource {
    fn income(&self, period: &ReportPeriod) -> Result<Vec<IncomeEntry>> {
        checked_income(self.all_income()?, period)
    }

    fn expenses(&self, period: &ReportPeriod) -> Result<Vec<ExpenseEntry>> {
        checked_expenses(self.all_expenses()?, period)
    }

    fn collaborations(&self) -> Result<Vec<Collaboration>> {
        self.read(COLLABORATIONS_FILE)
    }

    fn overview(&self, _period: &ReportPeriod) -> Result<Option<Totals>> {
        self.read(OVERVIEW_FILE)
    }
}
