//! `triage export`

use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{create_output, finish_output, Session};
use crate::dashboard::Dashboard;
use crate::error::{TriageError, TriageResult};
use crate::export::{export_dashboard_json, export_dashboard_yaml, export_ledger_csv};

/// Output format for `triage export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Dashboard bundle as JSON
    Json,
    /// Dashboard bundle as YAML
    Yaml,
    /// Every ledger row as CSV
    Csv,
}

/// Write the export to `output`, or stdout
pub fn handle_export_command(
    session: &Session,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> TriageResult<()> {
    match output {
        Some(path) => {
            let mut writer = create_output(&path)?;
            write_export(session, format, &mut writer)?;
            finish_output(writer, &path)?;
            println!("Exported {:?} to: {}", format, path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            write_export(session, format, &mut stdout)?;
            writeln!(stdout).map_err(|e| TriageError::Export(e.to_string()))?;
        }
    }
    Ok(())
}

fn write_export<W: Write>(session: &Session, format: ExportFormat, writer: &mut W) -> TriageResult<()> {
    match format {
        ExportFormat::Csv => export_ledger_csv(&session.ledger, writer),
        ExportFormat::Json | ExportFormat::Yaml => {
            let dashboard = Dashboard::build(
                &session.ledger,
                &session.inputs,
                &session.settings.budget,
                session.as_of,
            )?;
            if format == ExportFormat::Json {
                export_dashboard_json(&dashboard, writer, true)
            } else {
                export_dashboard_yaml(&dashboard, writer)
            }
        }
    }
}
