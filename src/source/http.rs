use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use ureq::Agent;

use super::{checked_expenses, checked_income, EntrySource};
use crate::aggregate::Totals;
use crate::config::BackendSettings;
use crate::error::{LedgerError, Result};
use crate::models::{Collaboration, ExpenseEntry, IncomeEntry, ReportPeriod};

const INCOME_PATH: &str = "/api/income";
const EXPENSES_PATH: &str = "/api/expenses";
const COLLABORATIONS_PATH: &str = "/api/collaborations";
const DASHBOARD_PATH: &str = "/api/reports/dashboard";

/// Page sizes the dashboard asks for; a period holds at most a few hundred entries
const ENTRY_LIMIT: &str = "1000";
const COLLABORATION_LIMIT: &str = "100";

/// Envelope every backend response is wrapped in
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn into_data(self) -> Result<T> {
        if !self.success {
            return Err(LedgerError::Backend(
                self.message
                    .unwrap_or_else(|| "request was not successful".to_string()),
            ));
        }
        self.data
            .ok_or_else(|| LedgerError::Backend("response contained no data".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct Dashboard {
    overview: Totals,
}

/// REST backend client
pub struct HttpSource {
    base_url: String,
    token: Option<String>,
    agent: Agent,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self> {
        let base_url = settings.base_url.as_deref().ok_or(LedgerError::NoBackend)?;
        Ok(Self::new(
            base_url,
            settings.token.clone(),
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let failed = |reason: String| LedgerError::Http {
            url: url.clone(),
            reason,
        };

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, value);
        }
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let body: String = request
            .call()
            .map_err(|e| failed(e.to_string()))?
            .body_mut()
            .read_to_string()
            .map_err(|e| failed(e.to_string()))?;

        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|e| failed(e.to_string()))?;
        envelope.into_data()
    }

    fn period_query(period: &ReportPeriod) -> Vec<(&'static str, String)> {
        vec![
            ("startDate", period.start().format("%Y-%m-%d").to_string()),
            ("endDate", period.last_day().format("%Y-%m-%d").to_string()),
        ]
    }
}

impl EntrySource for HttpSource {
    fn income(&self, period: &ReportPeriod) -> Result<Vec<IncomeEntry>> {
        let mut query = Self::period_query(period);
        query.push(("limit", ENTRY_LIMIT.to_string()));
        checked_income(self.get(INCOME_PATH, &query)?, period)
    }

    fn expenses(&self, period: &ReportPeriod) -> Result<Vec<ExpenseEntry>> {
        let mut query = Self::period_query(period);
        query.push(("limit", ENTRY_LIMIT.to_string()));
        checked_expenses(self.get(EXPENSES_PATH, &query)?, period)
    }

    fn collaborations(&self) -> Result<Vec<Collaboration>> {
        self.get(
            COLLABORATIONS_PATH,
            &[("limit", COLLABORATION_LIMIT.to_string())],
        )
    }

    fn overview(&self, period: &ReportPeriod) -> Result<Option<Totals>> {
        let dashboard: Dashboard = self.get(DASHBOARD_PATH, &Self::period_query(period))?;
        Ok(Some(dashboard.overview))
    }
}
