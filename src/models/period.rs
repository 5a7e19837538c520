//! Report periods
//!
//! A selection (month, quarter, year or custom range) resolves to a half-open
//! date range used to filter entries.

use chrono::{Datelike, Days, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// What the user picked. This is the value that gets persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PeriodSelection {
    Monthly { year: i32, month: u32 },
    Quarterly { year: i32, quarter: u32 },
    Yearly { year: i32 },
    /// Inclusive on both ends, as typed by the user
    Custom { from: NaiveDate, to: NaiveDate },
}

impl PeriodSelection {
    pub fn current_month(today: NaiveDate) -> Self {
        Self::Monthly {
            year: today.year(),
            month: today.month(),
        }
    }

    /// Parse "2025-04"
    pub fn parse_month(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidPeriod(format!("'{input}' is not a YYYY-MM month"));
        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        let selection = Self::Monthly {
            year: year.parse().map_err(|_| invalid())?,
            month: month.parse().map_err(|_| invalid())?,
        };
        selection.period()?;
        Ok(selection)
    }

    /// Parse "2025-Q2" (or "2025-2")
    pub fn parse_quarter(input: &str) -> Result<Self, ValidationError> {
        let invalid =
            || ValidationError::InvalidPeriod(format!("'{input}' is not a YYYY-Qn quarter"));
        let (year, quarter) = input.trim().split_once('-').ok_or_else(invalid)?;
        let quarter = quarter.trim_start_matches(['Q', 'q']);
        let selection = Self::Quarterly {
            year: year.parse().map_err(|_| invalid())?,
            quarter: quarter.parse().map_err(|_| invalid())?,
        };
        selection.period()?;
        Ok(selection)
    }

    pub fn custom(from: NaiveDate, to: NaiveDate) -> Result<Self, ValidationError> {
        let selection = Self::Custom { from, to };
        selection.period()?;
        Ok(selection)
    }

    /// Resolve into a concrete date range
    pub fn period(&self) -> Result<ReportPeriod, ValidationError> {
        let (start, end) = match *self {
            Self::Monthly { year, month } => {
                if !(1..=12).contains(&month) {
                    return Err(ValidationError::InvalidPeriod(format!(
                        "month {month} is out of range"
                    )));
                }
                let start = first_of_month(year, month)?;
                let end = first_of_month(year + (month / 12) as i32, month % 12 + 1)?;
                (start, end)
            }
            Self::Quarterly { year, quarter } => {
                if !(1..=4).contains(&quarter) {
                    return Err(ValidationError::InvalidPeriod(format!(
                        "quarter {quarter} is out of range"
                    )));
                }
                let first_month = (quarter - 1) * 3 + 1;
                let start = first_of_month(year, first_month)?;
                let end = if quarter == 4 {
                    first_of_month(year + 1, 1)?
                } else {
                    first_of_month(year, first_month + 3)?
                };
                (start, end)
            }
            Self::Yearly { year } => (first_of_month(year, 1)?, first_of_month(year + 1, 1)?),
            Self::Custom { from, to } => {
                if from > to {
                    return Err(ValidationError::InvalidPeriod(format!(
                        "start {from} is after end {to}"
                    )));
                }
                let end = to.checked_add_days(Days::new(1)).ok_or_else(|| {
                    ValidationError::InvalidPeriod(format!("end date {to} is out of range"))
                })?;
                (from, end)
            }
        };

        Ok(ReportPeriod {
            selection: *self,
            start,
            end,
        })
    }
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate, ValidationError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ValidationError::InvalidPeriod(format!("{year}-{month:02} is out of range")))
}

pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}

/// Half-open range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPeriod {
    selection: PeriodSelection,
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    pub fn selection(&self) -> PeriodSelection {
        self.selection
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// First day after the period
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Last day inside the period. The backend filters on an inclusive range.
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn label(&self) -> String {
        match self.selection {
            PeriodSelection::Monthly { year, month } => format!("{} {}", month_name(month), year),
            PeriodSelection::Quarterly { year, quarter } => format!("Q{quarter} {year}"),
            PeriodSelection::Yearly { year } => year.to_string(),
            PeriodSelection::Custom { from, to } => format!("{from} to {to}"),
        }
    }

    /// Fragment used in export file names, e.g. "April_2025"
    pub fn file_label(&self) -> String {
        match self.selection {
            PeriodSelection::Monthly { year, month } => format!("{}_{}", month_name(month), year),
            PeriodSelection::Quarterly { year, quarter } => format!("Q{quarter}_{year}"),
            PeriodSelection::Yearly { year } => year.to_string(),
            PeriodSelection::Custom { from, to } => format!("{from}_{to}"),
        }
    }

    /// (year, month) pairs touched by the period, in order
    pub fn months(&self) -> Vec<(i32, u32)> {
        let mut months = Vec::new();
        let mut year = self.start.year();
        let mut month = self.start.month();
        let last = self.last_day();

        while (year, month) <= (last.year(), last.month()) {
            months.push((year, month));
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        months
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
