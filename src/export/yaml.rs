//! YAML Export functionality
//!
//! Exports the dashboard bundle to YAML for reading by hand.

use std::io::Write;

use crate::dashboard::Dashboard;
use crate::error::{TriageError, TriageResult};
use crate::export::json::DashboardExport;

/// Export the dashboard bundle to YAML
pub fn export_dashboard_yaml<W: Write>(dashboard: &Dashboard, writer: &mut W) -> TriageResult<()> {
    let export = DashboardExport::new(dashboard.clone());
    let io_err = |e: std::io::Error| TriageError::Export(e.to_string());

    writeln!(writer, "# Envelope Triage Dashboard Export").map_err(io_err)?;
    writeln!(writer, "# As of: {}", export.generated_for).map_err(io_err)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(io_err)?;
    writeln!(
        writer,
        "# Months: {}",
        export
            .dashboard
            .months
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    )
    .map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &export).map_err(|e| TriageError::Export(e.to_string()))?;

    Ok(())
}
