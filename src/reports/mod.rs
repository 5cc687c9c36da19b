//! Reports module
//!
//! Terminal and CSV renderings of the ledger, the month metrics, and
//! rebalance / what-if results.

pub mod ledger_overview;
pub mod metrics_summary;
pub mod rebalance;

pub use ledger_overview::{EnvelopeReportRow, GroupReportRow, LedgerOverviewReport};
pub use metrics_summary::MetricsReport;
pub use rebalance::{RebalanceReport, WhatIfReport};
