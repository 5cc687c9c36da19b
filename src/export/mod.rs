//! Export module
//!
//! Writes the assembled dashboard and the ledger in several formats:
//! - JSON: machine-readable dashboard bundle with schema versioning
//! - YAML: the same bundle, human-readable with a comment header
//! - CSV: every ledger row, and transfer queues in `transfers.csv` layout

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_ledger_csv, export_transfers_csv};
pub use json::{export_dashboard_json, import_dashboard_json, DashboardExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_dashboard_yaml;
