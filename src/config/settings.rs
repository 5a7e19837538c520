use serde::{Deserialize, Serialize};

use crate::report::{PageGeometry, ReportFormat, ReportOptions};

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub report: ReportSettings,
    #[serde(default)]
    pub page: PageSettings,
    pub export: ExportSettings,
    #[serde(default)]
    pub backend: BackendSettings,
}

impl Config {
    pub fn report_options(&self, generated_on: chrono::NaiveDate) -> ReportOptions {
        ReportOptions {
            title: self.report.title.clone(),
            currency_symbol: self.report.currency_symbol.clone(),
            geometry: self.page.geometry(),
            format: self.export.format,
            generated_on,
        }
    }
}

fn default_title() -> String {
    "Income & Expense Report".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_title")]
    pub title: String,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PageSettings {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl Default for PageSettings {
    fn default() -> Self {
        let a4 = PageGeometry::default();
        Self {
            width_mm: a4.width,
            height_mm: a4.height,
            margin_mm: a4.margin,
        }
    }
}

impl PageSettings {
    pub fn geometry(&self) -> PageGeometry {
        PageGeometry {
            width: self.width_mm,
            height: self.height_mm,
            margin: self.margin_mm,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ExportSettings {
    pub output_dir: String,
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BackendSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: default_timeout(),
        }
    }
}
