//! JSON Export functionality
//!
//! Exports the dashboard bundle to JSON with schema versioning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::dashboard::Dashboard;
use crate::error::{TriageError, TriageResult};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Dashboard bundle with export metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Application version that created the export
    pub app_version: String,

    /// The as-of date the bundle was computed for
    pub generated_for: NaiveDate,

    pub dashboard: Dashboard,
}

impl DashboardExport {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_for: dashboard.as_of,
            dashboard,
        }
    }

    /// Validate the export structure
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        for month in &self.dashboard.months {
            if !self.dashboard.data_by_month.contains_key(month) {
                return Err(format!("Month {} listed but has no data", month));
            }
        }

        Ok(())
    }
}

/// Export the dashboard bundle to JSON
pub fn export_dashboard_json<W: Write>(
    dashboard: &Dashboard,
    writer: &mut W,
    pretty: bool,
) -> TriageResult<()> {
    let export = DashboardExport::new(dashboard.clone());

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| TriageError::Export(e.to_string()))?;

    Ok(())
}

/// Read a JSON export back, checking its schema version
pub fn import_dashboard_json(json_str: &str) -> TriageResult<DashboardExport> {
    let export: DashboardExport =
        serde_json::from_str(json_str).map_err(|e| TriageError::Import(e.to_string()))?;

    export.validate().map_err(TriageError::Import)?;

    Ok(export)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::BudgetConfig;
    use crate::ledger::{Ledger, LedgerInputs};
    use crate::models::{Allocation, Money, Month, Transaction};

    pub(crate) fn sample_dashboard() -> Dashboard {
        let d = |mo, day| NaiveDate::from_ymd_opt(2025, mo, day).unwrap();
        let month = |mo| Month::new(2025, mo).unwrap();
        let config = BudgetConfig::empty(d(1, 1), Money::from_cents(250000))
            .with_income_categories(["Wages"]);
        let inputs = LedgerInputs {
            transactions: vec![
                Transaction::posted(d(1, 12), Money::from_cents(-6400), "MARKET", "Groceries", "Food and drink"),
                Transaction::posted(d(1, 15), Money::from_cents(250000), "PAYROLL", "Wages", "Income"),
            ],
            allocations: vec![
                Allocation::new(month(1), "Groceries", Money::from_cents(30000)),
                Allocation::new(month(2), "Groceries", Money::from_cents(30000)),
            ],
            ..Default::default()
        };
        let ledger = Ledger::build(&inputs, &config, Some(month(1))).unwrap();
        Dashboard::build(&ledger, &inputs, &config, d(1, 20)).unwrap()
    }

    #[test]
    fn test_json_export() {
        let mut buffer = Vec::new();
        export_dashboard_json(&sample_dashboard(), &mut buffer, true).unwrap();

        let json = String::from_utf8(buffer).unwrap();
        assert!(json.contains("\"schema_version\": \"1.0.0\""));
        assert!(json.contains("\"generated_for\": \"2025-01-20\""));
        assert!(json.contains("\"Groceries\""));
    }

    #[test]
    fn test_import_validates_schema() {
        let mut buffer = Vec::new();
        export_dashboard_json(&sample_dashboard(), &mut buffer, false).unwrap();
        let json = String::from_utf8(buffer).unwrap();

        let imported = import_dashboard_json(&json).unwrap();
        assert_eq!(imported.dashboard.months.len(), 2);

        let stale = json.replace("\"1.0.0\"", "\"0.9.0\"");
        let err = import_dashboard_json(&stale).unwrap_err();
        assert!(err.to_string().contains("Schema version mismatch"));
    }
}
