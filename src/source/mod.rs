//! Where entries come from. The REST backend in production, a directory of
//! JSON files locally. Entries are validated here, before aggregation sees them.

mod files;
mod http;

pub use files::JsonDirSource;
pub use http::HttpSource;

use crate::aggregate::Totals;
use crate::error::Result;
use crate::models::{Collaboration, ExpenseEntry, IncomeEntry, ReportPeriod};

pub trait EntrySource {
    fn income(&self, period: &ReportPeriod) -> Result<Vec<IncomeEntry>>;

    fn expenses(&self, period: &ReportPeriod) -> Result<Vec<ExpenseEntry>>;

    fn collaborations(&self) -> Result<Vec<Collaboration>>;

    /// Totals computed by the source itself, if it offers them
    fn overview(&self, _period: &ReportPeriod) -> Result<Option<Totals>> {
        Ok(None)
    }
}

/// Everything a report needs for one period
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub income: Vec<IncomeEntry>,
    pub expenses: Vec<ExpenseEntry>,
    pub collaborations: Vec<Collaboration>,
}

pub fn load_inputs(source: &dyn EntrySource, period: &ReportPeriod) -> Result<ReportInputs> {
    Ok(ReportInputs {
        income: source.income(period)?,
        expenses: source.expenses(period)?,
        collaborations: source.collaborations()?,
    })
}

fn checked_income(entries: Vec<IncomeEntry>, period: &ReportPeriod) -> Result<Vec<IncomeEntry>> {
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        entry.validate()?;
        if period.contains(entry.date) {
            kept.push(entry);
        }
    }
    Ok(kept)
}

fn checked_expenses(
    entries: Vec<ExpenseEntry>,
    period: &ReportPeriod,
) -> Result<Vec<ExpenseEntry>> {
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        entry.validate()?;
        if period.contains(entry.date) {
            kept.push(entry);
        }
    }
    Ok(kept)
}
