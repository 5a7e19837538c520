//! Flat CSV export: income rows first, then expenses with negated amounts.

use crate::error::{LedgerError, Result};
use crate::models::{ExpenseEntry, IncomeEntry, PaymentStatus};
use crate::report::format::format_amount;

pub const CSV_HEADER: [&str; 6] = ["Date", "Type", "Category", "Description", "Amount", "Status"];

pub fn write_csv(income: &[IncomeEntry], expenses: &[ExpenseEntry]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER)?;

    for entry in income {
        wtr.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            "Income".to_string(),
            entry.category.clone(),
            entry.job_title.clone(),
            format_amount(entry.amount),
            entry.payment_status.to_string(),
        ])?;
    }

    for entry in expenses {
        wtr.write_record([
            entry.date.format("%Y-%m-%d").to_string(),
            "Expense".to_string(),
            entry.category.clone(),
            entry.title.clone(),
            format_amount(-entry.amount),
            entry.status.unwrap_or(PaymentStatus::Paid).to_string(),
        ])?;
    }

    wtr.into_inner()
        .map_err(|e| LedgerError::Export(e.to_string()))
}
