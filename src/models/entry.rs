use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
    Overdue,
}

impl PaymentStatus {
    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Paid,
        PaymentStatus::Pending,
        PaymentStatus::Overdue,
    ];
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

fn default_category() -> String {
    "Other".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Money received for a job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(
        default,
        with = "wire_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_date: Option<NaiveDate>,
    pub job_title: String,
    #[serde(default)]
    pub client_name: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Stored as given; amounts are never converted between currencies
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,
}

impl IncomeEntry {
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        job_title: impl Into<String>,
        client_name: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            work_date: None,
            job_title: job_title.into(),
            client_name: client_name.into(),
            amount,
            category: default_category(),
            payment_status: PaymentStatus::default(),
            currency: default_currency(),
            description: None,
            hours: None,
            hourly_rate: None,
            tax_amount: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount(self.amount)
    }
}

/// Money spent on the business
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseEntry {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(
        default,
        with = "wire_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_date: Option<NaiveDate>,
    pub title: String,
    pub amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_tax_deductible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExpenseEntry {
    pub fn new(id: impl Into<String>, date: NaiveDate, title: impl Into<String>, amount: f64) -> Self {
        Self {
            id: id.into(),
            date,
            work_date: None,
            title: title.into(),
            amount,
            category: default_category(),
            vendor: None,
            is_tax_deductible: None,
            status: None,
            currency: default_currency(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount(self.amount)
    }
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::NonNumericAmount(amount.to_string()));
    }
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount(amount));
    }
    Ok(())
}

/// Parse a user-typed amount such as "22.5" or "$1,250.00"
pub fn parse_amount(input: &str) -> Result<f64, ValidationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let amount: f64 = cleaned
        .parse()
        .map_err(|_| ValidationError::NonNumericAmount(input.trim().to_string()))?;

    check_amount(amount)?;
    Ok(amount)
}

/// Parse "2025-04-01" or "Apr 1, 2025"
pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%b %d, %Y"))
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%B %d, %Y"))
        .map_err(|_| ValidationError::InvalidDate(trimmed.to_string()))
}

/// Dates arrive either as plain dates or as ISO date-times; only the date part is kept.
pub(crate) mod wire_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let date_part = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{raw}'"))),
                None => Ok(None),
            }
        }
    }
}
