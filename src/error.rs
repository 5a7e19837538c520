use std::path::PathBuf;
use thiserror::Error;

/// A declined input. Callers decide how to surface these; nothing here aborts a render.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Total share percentage cannot exceed 100% (would be {total}%)")]
    ShareLimitExceeded { total: f64 },

    #[error("Share percentage {0} must be between 0 and 100")]
    ShareOutOfRange(f64),

    #[error("Please enter a user email or ID")]
    BlankMember,

    #[error("Invalid member '{0}'. Use format 'user:percentage'")]
    InvalidMember(String),

    #[error("Amount '{0}' is not a number")]
    NonNumericAmount(String),

    #[error("Amount {0:.2} cannot be negative")]
    NegativeAmount(f64),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD or e.g. 'Apr 1, 2025'")]
    InvalidDate(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ValidationError>,
    },
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Config directory not found at {0}. Run 'payshare init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Failed to parse data file {path}: {source}")]
    DataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Collaboration '{0}' not found")]
    CollaborationNotFound(String),

    #[error("No backend configured. Set [backend] base_url in config.toml")]
    NoBackend,

    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("Backend rejected request: {0}")]
    Backend(String),

    #[error("Failed to export: {0}")]
    Export(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
