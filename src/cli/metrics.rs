//! `triage metrics`

use crate::cli::Session;
use crate::error::{TriageError, TriageResult};
use crate::metrics::MonthMetrics;
use crate::reports::MetricsReport;

pub fn handle_metrics_command(session: &Session, month: Option<String>, json: bool) -> TriageResult<()> {
    let month = session.month_or_current(month.as_deref())?;
    let metrics = MonthMetrics::compute(
        &session.ledger,
        &session.inputs,
        &session.settings.budget,
        month,
        session.as_of,
    )?;

    if json {
        let out = serde_json::to_string_pretty(&metrics)
            .map_err(|e| TriageError::Export(e.to_string()))?;
        println!("{}", out);
    } else {
        let report = MetricsReport::new(metrics).with_currency(session.currency());
        println!("{}", report.format_terminal());
    }

    Ok(())
}
