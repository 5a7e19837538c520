use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::models::PeriodSelection;

use super::{load_state, save_state};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_period: Option<PeriodSelection>,
}

/// Remembers the period the user last picked. Owned by the front end; the
/// aggregation and rendering code never touches it.
pub trait PeriodStore {
    fn load_period(&self) -> Result<Option<PeriodSelection>>;
    fn save_period(&self, selection: PeriodSelection) -> Result<()>;
}

/// Keeps the selection in `state.toml` inside the config directory
pub struct TomlPeriodStore {
    config_dir: PathBuf,
}

impl TomlPeriodStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }
}

impl PeriodStore for TomlPeriodStore {
    fn load_period(&self) -> Result<Option<PeriodSelection>> {
        Ok(load_state(&self.config_dir)?.selected_period)
    }

    fn save_period(&self, selection: PeriodSelection) -> Result<()> {
        let mut state = load_state(&self.config_dir)?;
        state.selected_period = Some(selection);
        save_state(&self.config_dir, &state)
    }
}
