//! `triage ledger`

use std::path::PathBuf;

use crate::cli::{create_output, finish_output, Session};
use crate::error::TriageResult;
use crate::export::export_ledger_csv;
use crate::reports::LedgerOverviewReport;

/// Print one month of the ledger, or write it to CSV
///
/// With `all`, the CSV holds every envelope-month row instead of one month.
pub fn handle_ledger_command(
    session: &Session,
    month: Option<String>,
    output: Option<PathBuf>,
    all: bool,
) -> TriageResult<()> {
    let month = session.month_or_current(month.as_deref())?;

    match output {
        Some(path) if all => {
            let mut writer = create_output(&path)?;
            export_ledger_csv(&session.ledger, &mut writer)?;
            finish_output(writer, &path)?;
            println!("Ledger exported to: {}", path.display());
        }
        Some(path) => {
            let report = LedgerOverviewReport::generate(&session.ledger, month)?;
            let mut writer = create_output(&path)?;
            report.export_csv(&mut writer)?;
            finish_output(writer, &path)?;
            println!("Ledger for {} exported to: {}", month, path.display());
        }
        None => {
            let report = LedgerOverviewReport::generate(&session.ledger, month)?
                .with_currency(session.currency());
            println!("{}", report.format_terminal());
        }
    }

    Ok(())
}
