//! CSV upload templates for income and expenses.

use csv::StringRecord;
use std::io::Read;

use crate::error::{Result, ValidationError};
use crate::models::{parse_amount, parse_date, ExpenseEntry, IncomeEntry};

pub const INCOME_TEMPLATE: &str = r#"Work Date,Date,Job Title,Client Name,Bill Amount
"Apr 1, 2025","Apr 8, 2025","Website Development","Lay Leng",22.5
"Apr 2, 2025","Apr 9, 2025","HTML and Tailwind CSS wizard","Immowi International",180
"#;

pub const EXPENSE_TEMPLATE: &str = r#"Work Date,Date,Title,Vendor,Amount
"Apr 1, 2025","Apr 8, 2025","Software Subscription","Adobe",29.99
"Apr 2, 2025","Apr 9, 2025","Office Supplies","Staples",45.50
"#;

fn field(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).unwrap_or("")
}

fn optional_date(raw: &str) -> std::result::Result<Option<chrono::NaiveDate>, ValidationError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

fn row_error(row: usize) -> impl Fn(ValidationError) -> ValidationError {
    move |e| ValidationError::Row {
        row,
        source: Box::new(e),
    }
}

fn records<R: Read>(reader: R) -> csv::StringRecordsIntoIter<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader)
        .into_records()
}

/// Parse rows shaped like [`INCOME_TEMPLATE`]. Rows are numbered from 1,
/// not counting the header.
pub fn import_income<R: Read>(reader: R) -> Result<Vec<IncomeEntry>> {
    let mut entries = Vec::new();

    for (idx, record) in records(reader).enumerate() {
        let record = record?;
        let row = idx + 1;
        let err = row_error(row);

        let work_date = optional_date(field(&record, 0)).map_err(&err)?;
        let date = parse_date(field(&record, 1)).map_err(&err)?;
        let amount = parse_amount(field(&record, 4)).map_err(&err)?;

        let mut entry = IncomeEntry::new(
            format!("import-{row}"),
            date,
            field(&record, 2),
            field(&record, 3),
            amount,
        );
        entry.work_date = work_date;
        entries.push(entry);
    }

    Ok(entries)
}

/// Parse rows shaped like [`EXPENSE_TEMPLATE`]
pub fn import_expenses<R: Read>(reader: R) -> Result<Vec<ExpenseEntry>> {
    let mut entries = Vec::new();

    for (idx, record) in records(reader).enumerate() {
        let record = record?;
        let row = idx + 1;
        let err = row_error(row);

        let work_date = optional_date(field(&record, 0)).map_err(&err)?;
        let date = parse_date(field(&record, 1)).map_err(&err)?;
        let amount = parse_amount(field(&record, 4)).map_err(&err)?;

        let mut entry = ExpenseEntry::new(format!("import-{row}"), date, field(&record, 2), amount);
        entry.work_date = work_date;
        let vendor = field(&record, 3);
        if !vendor.is_empty() {
            entry.vendor = Some(vendor.to_string());
        }
        entries.push(entry);
    }

    Ok(entries)
}
