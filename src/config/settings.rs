//! User settings for Envelope Triage
//!
//! Persists the budget configuration, where the CSV inputs live, and display
//! preferences in `config.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::budget::BudgetConfig;
use super::paths::TriagePaths;
use crate::error::TriageError;

/// File names of the four CSV inputs inside the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFiles {
    #[serde(default = "default_transactions_file")]
    pub transactions: String,

    #[serde(default = "default_allocations_file")]
    pub allocations: String,

    #[serde(default = "default_transfers_file")]
    pub transfers: String,

    #[serde(default = "default_balances_file")]
    pub balances: String,
}

fn default_transactions_file() -> String {
    "ALL_TRX.csv".to_string()
}

fn default_allocations_file() -> String {
    "budgets.csv".to_string()
}

fn default_transfers_file() -> String {
    "transfers.csv".to_string()
}

fn default_balances_file() -> String {
    "balances.csv".to_string()
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            transactions: default_transactions_file(),
            allocations: default_allocations_file(),
            transfers: default_transfers_file(),
            balances: default_balances_file(),
        }
    }
}

/// User settings for Envelope Triage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Budget rules fed to every computation
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Directory holding the CSV inputs; defaults to `<base>/data`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// CSV file names inside the data directory
    #[serde(default)]
    pub files: InputFiles,

    /// Default currency symbol
    #[serde(default = "default_currency")]
    pub currency_symbol: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            budget: BudgetConfig::default(),
            data_dir: None,
            files: InputFiles::default(),
            currency_symbol: default_currency(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &TriagePaths) -> Result<Self, TriageError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TriageError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TriageError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TriagePaths) -> Result<(), TriageError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TriageError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            TriageError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Resolve the data directory, falling back to the one under `paths`
    pub fn resolve_data_dir(&self, paths: &TriagePaths) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| paths.data_dir())
    }
}
