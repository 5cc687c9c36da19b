//! CLI command handlers
//!
//! Bridges the clap argument parsing with the ledger engine. Every command
//! starts from a [`Session`]: settings resolved, CSV inputs loaded, and the
//! ledger built up to the as-of month.

pub mod export;
pub mod ledger;
pub mod metrics;
pub mod rebalance;

pub use export::{handle_export_command, ExportFormat};
pub use ledger::handle_ledger_command;
pub use metrics::handle_metrics_command;
pub use rebalance::{handle_rebalance_command, handle_whatif_command};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::config::{Settings, TriagePaths};
use crate::error::{TriageError, TriageResult};
use crate::import::CsvSources;
use crate::ledger::{Ledger, LedgerInputs};
use crate::models::Month;

/// Loaded inputs and the built ledger for one invocation
#[derive(Debug)]
pub struct Session {
    pub paths: TriagePaths,
    pub settings: Settings,
    pub data_dir: PathBuf,
    pub as_of: NaiveDate,
    pub inputs: LedgerInputs,
    pub ledger: Ledger,
}

impl Session {
    /// Resolve settings, read the CSV inputs, and fold the ledger
    pub fn open(paths: TriagePaths, data_dir: Option<PathBuf>, as_of: NaiveDate) -> TriageResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let data_dir = data_dir.unwrap_or_else(|| settings.resolve_data_dir(&paths));
        debug!(data_dir = %data_dir.display(), as_of = %as_of, "opening session");

        let inputs = CsvSources::in_dir(&data_dir, &settings.files).load()?;
        let ledger = Ledger::build(&inputs, &settings.budget, Some(Month::from_date(as_of)))?;

        Ok(Self {
            paths,
            settings,
            data_dir,
            as_of,
            inputs,
            ledger,
        })
    }

    pub fn current_month(&self) -> Month {
        Month::from_date(self.as_of)
    }

    /// The requested month, or the as-of month
    pub fn month_or_current(&self, month: Option<&str>) -> TriageResult<Month> {
        match month {
            Some(s) => parse_month(s),
            None => Ok(self.current_month()),
        }
    }

    pub fn currency(&self) -> &str {
        &self.settings.currency_symbol
    }
}

/// Parse a `YYYY-MM` month argument
pub fn parse_month(s: &str) -> TriageResult<Month> {
    Month::parse(s).map_err(|e| {
        TriageError::Validation(format!(
            "Invalid month format: {}. Use YYYY-MM (e.g., 2025-01)",
            e
        ))
    })
}

/// Parse a `YYYY-MM-DD` date argument, defaulting to today
pub fn parse_as_of(s: Option<&str>) -> TriageResult<NaiveDate> {
    match s {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            TriageError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Open `path` for writing, buffered
pub(crate) fn create_output(path: &Path) -> TriageResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        TriageError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

pub(crate) fn finish_output<W: Write>(mut writer: W, path: &Path) -> TriageResult<()> {
    writer.flush().map_err(|e| {
        TriageError::Export(format!("Failed to write file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_month("2025-03").unwrap().to_string(), "2025-03");
        assert!(parse_month("March").unwrap_err().is_validation());

        let as_of = parse_as_of(Some("2025-03-14")).unwrap();
        assert_eq!(as_of, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert!(parse_as_of(Some("14/03/2025")).is_err());
    }

    #[test]
    fn test_open_empty_session() {
        let temp = TempDir::new().unwrap();
        let paths = TriagePaths::with_base_dir(temp.path().to_path_buf());
        let as_of = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();

        let session = Session::open(paths, None, as_of).unwrap();
        assert_eq!(session.data_dir, temp.path().join("data"));
        assert_eq!(session.ledger.months(), vec![session.current_month()]);
        assert_eq!(session.month_or_current(None).unwrap().to_string(), "2025-03");
    }
}
