//! Report rendering: the paginated document and the flat CSV export.

mod csv_export;
mod document;
mod format;
mod layout;

pub use csv_export::{write_csv, CSV_HEADER};
pub use document::{build_document, DocumentInput, EMPTY_PLACEHOLDER, NO_PROFIT_NOTICE};
pub use format::{format_amount, format_currency, format_percentage, truncate};
pub use layout::{
    Block, Cell, Document, Line, Page, PageGeometry, Paginator, TextStyle, Tone,
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate;
use crate::error::Result;
use crate::models::{Collaboration, ExpenseEntry, IncomeEntry, ReportPeriod};
use crate::pdf::render_pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Text,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Text => "txt",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub currency_symbol: String,
    pub geometry: PageGeometry,
    pub format: ReportFormat,
    pub generated_on: NaiveDate,
}

impl ReportOptions {
    pub fn new(generated_on: NaiveDate) -> Self {
        Self {
            title: "Income & Expense Report".to_string(),
            currency_symbol: "$".to_string(),
            geometry: PageGeometry::default(),
            format: ReportFormat::default(),
            generated_on,
        }
    }
}

/// Bytes ready for download plus the name to save them under
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// `Income_Expense_Report_April_2025.pdf`
pub fn report_file_name(period: &ReportPeriod, format: ReportFormat) -> String {
    format!(
        "Income_Expense_Report_{}.{}",
        period.file_label(),
        format.extension()
    )
}

/// `income_report_2025-04-30.csv`
pub fn csv_file_name(generated_on: NaiveDate) -> String {
    format!("income_report_{}.csv", generated_on.format("%Y-%m-%d"))
}

/// Aggregate and lay out the report without serializing it
pub fn render_document(
    period: &ReportPeriod,
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
    collaborations: &[Collaboration],
    options: &ReportOptions,
) -> Document {
    let aggregation = aggregate(income, expenses, collaborations);
    let input = DocumentInput {
        title: &options.title,
        currency_symbol: &options.currency_symbol,
        period,
        income,
        expenses,
        collaborations,
        aggregation: &aggregation,
        generated_on: options.generated_on,
    };
    build_document(&input, options.geometry)
}

pub fn generate_report(
    period: &ReportPeriod,
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
    collaborations: &[Collaboration],
    options: &ReportOptions,
) -> Result<Artifact> {
    let document = render_document(period, income, expenses, collaborations, options);

    let bytes = match options.format {
        ReportFormat::Text => document.to_text().into_bytes(),
        ReportFormat::Pdf => render_pdf(&document)?,
    };

    Ok(Artifact {
        file_name: report_file_name(period, options.format),
        bytes,
    })
}

pub fn generate_csv(
    income: &[IncomeEntry],
    expenses: &[ExpenseEntry],
    generated_on: NaiveDate,
) -> Result<Artifact> {
    Ok(Artifact {
        file_name: csv_file_name(generated_on),
        bytes: write_csv(income, expenses)?,
    })
}
