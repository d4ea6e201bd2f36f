use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Cost and time-savings model used by every ROI figure.
///
/// Owned by the caller: metrics functions borrow it and never keep it.
/// Ranges are only enforced by whatever front end edits the values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Licence cost per enabled user per month, in dollars.
    pub license_cost: f64,
    /// Fully-loaded hourly cost of an employee.
    pub professional_rate: f64,
    /// Minutes saved by one Copilot action (UI range 1-15).
    pub minutes_per_action: f64,
    /// Number of weeks covered by the export. Informational only.
    pub analysis_weeks: u32,
    /// Intelligent Recap actions per month, valued separately.
    pub intelligent_recap_actions: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            license_cost: 32.0,
            professional_rate: 78.0,
            minutes_per_action: 6.0,
            analysis_weeks: 26,
            intelligent_recap_actions: 0,
        }
    }
}

/// Field-level update; `None` leaves the current value alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigPatch {
    pub license_cost: Option<f64>,
    pub professional_rate: Option<f64>,
    pub minutes_per_action: Option<f64>,
    pub analysis_weeks: Option<u32>,
    pub intelligent_recap_actions: Option<u64>,
}

impl Config {
    /// Read a JSON config file. Missing keys take their default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Return a copy with every `Some` field of `patch` applied.
    pub fn patched(self, patch: &ConfigPatch) -> Self {
        Self {
            license_cost: patch.license_cost.unwrap_or(self.license_cost),
            professional_rate: patch.professional_rate.unwrap_or(self.professional_rate),
            minutes_per_action: patch.minutes_per_action.unwrap_or(self.minutes_per_action),
            analysis_weeks: patch.analysis_weeks.unwrap_or(self.analysis_weeks),
            intelligent_recap_actions: patch
                .intelligent_recap_actions
                .unwrap_or(self.intelligent_recap_actions),
        }
    }
}
