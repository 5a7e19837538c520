mod settings;
mod state;

pub use settings::{BackendSettings, Config, ExportSettings, PageSettings, ReportSettings};
pub use state::{PeriodStore, State, TomlPeriodStore};

use crate::error::{LedgerError, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (~/.payshare/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "payshare") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.payshare/
    let home = dirs_home().ok_or_else(|| {
        LedgerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".payshare"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Relative output directories are taken relative to the config directory
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let expanded = expand_path(output_dir);
    if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    }
}

/// Where the local JSON entry files live
pub fn data_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("data")
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(LedgerError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| LedgerError::ConfigParse { path, source: e })
}

/// Load state.toml (creates default if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| LedgerError::ConfigParse { path, source: e })
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| {
        LedgerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[report]
title = "Income & Expense Report"
currency_symbol = "$"

[page]
# A4 in millimetres
width_mm = 210.0
height_mm = 297.0
margin_mm = 20.0

[export]
output_dir = "output"   # relative to this directory, or an absolute/~ path
format = "pdf"          # "pdf" (needs the typst CLI) or "text"

[backend]
# base_url = "http://localhost:5000"   # used by --remote
# token = "..."                        # sent as a Bearer token
timeout_secs = 10
"#;

/// Initial content for each JSON data file
pub const EMPTY_DATA: &str = "[]\n";
