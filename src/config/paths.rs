//! Path management for Envelope Triage
//!
//! Provides XDG-compliant path resolution for the settings file and the
//! default CSV data directory.
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_TRIAGE_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/envelope-triage` or `~/.config/envelope-triage`
//! 3. Windows: `%APPDATA%\envelope-triage`

use std::path::{Path, PathBuf};

use crate::error::TriageError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "ENVELOPE_TRIAGE_DIR";

/// Manages all paths used by Envelope Triage
#[derive(Debug, Clone)]
pub struct TriagePaths {
    /// Base directory for settings and default data
    base_dir: PathBuf,
}

impl TriagePaths {
    /// Create a new TriagePaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, TriageError> {
        let base_dir = match std::env::var(BASE_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create TriagePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/envelope-triage/ or equivalent)
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the default data directory holding the CSV inputs
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), TriageError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| TriageError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| TriageError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, TriageError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                TriageError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("envelope-triage"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, TriageError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| TriageError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("envelope-triage"))
}
