//! Envelope Triage - month-indexed envelope budgeting ledger
//!
//! This library folds a bank transaction export, monthly allocations,
//! inter-envelope transfers, and bank balance snapshots into a per-envelope,
//! per-month ledger with rollover, then derives budget health metrics, a
//! Smart Rebalance proposal, and what-if overlays on top of it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Budget configuration, settings, and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, months, transactions, envelope rows)
//! - `import`: CSV ingestion of the four input files
//! - `ledger`: The rollover fold
//! - `metrics`: Income, health, cash, and variable-pace metrics
//! - `rebalance`: Smart Rebalance proposals
//! - `whatif`: Hypothetical transfer overlays
//! - `dashboard`: Serializable bundle of everything above
//! - `reports`, `display`, `export`: Terminal, CSV, JSON, and YAML output
//! - `cli`: Command handlers for the `triage` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use envelope_triage::config::{Settings, TriagePaths};
//! use envelope_triage::import::CsvSources;
//! use envelope_triage::ledger::Ledger;
//!
//! let paths = TriagePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let inputs = CsvSources::in_dir(&settings.resolve_data_dir(&paths), &settings.files).load()?;
//! let ledger = Ledger::build(&inputs, &settings.budget, None)?;
//! ```

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod export;
pub mod import;
pub mod ledger;
pub mod metrics;
pub mod models;
pub mod rebalance;
pub mod reports;
pub mod whatif;

pub use error::{TriageError, TriageResult};
