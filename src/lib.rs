pub mod aggregate;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod pdf;
pub mod report;
pub mod source;

pub use aggregate::{
    aggregate, compute_member_shares, compute_totals, validate_shares, AggregationResult,
    ProfitShares, ShareCheck, Totals,
};
pub use config::{Config, PeriodStore, TomlPeriodStore};
pub use error::{LedgerError, Result, ValidationError};
pub use models::{
    Collaboration, ExpenseEntry, IncomeEntry, Member, PaymentStatus, PeriodSelection,
    ReportPeriod, Role,
};
pub use report::{generate_csv, generate_report, render_document, Artifact, ReportFormat, ReportOptions};
pub use source::{EntrySource, HttpSource, JsonDirSource};
