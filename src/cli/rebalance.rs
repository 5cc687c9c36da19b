//! `triage rebalance` and `triage whatif`

use std::fs::File;
use std::io;
use std::path::PathBuf;

use tracing::info;

use crate::cli::Session;
use crate::error::{TriageError, TriageResult};
use crate::export::export_transfers_csv;
use crate::import::read_transfers;
use crate::rebalance::RebalanceProposal;
use crate::reports::{RebalanceReport, WhatIfReport};
use crate::whatif::{apply_overlay, queue_with_rebalance};

/// Print the Smart Rebalance proposal as a table and as `transfers.csv` lines
pub fn handle_rebalance_command(session: &Session, month: Option<String>) -> TriageResult<()> {
    let month = session.month_or_current(month.as_deref())?;
    let slice = session.ledger.require_slice(month)?;
    let proposal = RebalanceProposal::propose(slice, &session.settings.budget);

    let report = RebalanceReport::new(proposal.clone()).with_currency(session.currency());
    println!("{}", report.format_terminal());

    if !proposal.is_empty() {
        println!("Append to {} to apply:", session.settings.files.transfers);
        export_transfers_csv(&proposal.transfers, &mut io::stdout().lock())?;
    }

    Ok(())
}

/// Show a month before and after a queue of hypothetical transfers
pub fn handle_whatif_command(
    session: &Session,
    month: Option<String>,
    queue: Option<PathBuf>,
    rebalance: bool,
) -> TriageResult<()> {
    let month = session.month_or_current(month.as_deref())?;
    let slice = session.ledger.require_slice(month)?;

    let queued = match &queue {
        Some(path) => {
            let file = File::open(path).map_err(|e| {
                TriageError::Io(format!("Failed to open {}: {}", path.display(), e))
            })?;
            read_transfers(file, &path.display().to_string())?
        }
        None => Vec::new(),
    };
    let transfers = if rebalance {
        queue_with_rebalance(slice, &queued, &session.settings.budget)?
    } else {
        queued
    };
    info!(month = %month, queued = transfers.len(), "running what-if");

    let overlay = apply_overlay(slice, &transfers)?;
    let report = WhatIfReport::new(slice, &overlay).with_currency(session.currency());
    println!("{}", report.format_terminal());

    Ok(())
}
