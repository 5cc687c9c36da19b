//! Core data models for Envelope Triage
//!
//! This module contains the input records (transactions, allocations,
//! transfers, balance snapshots) and the derived envelope state rows.

pub mod budget;
pub mod envelope;
pub mod money;
pub mod month;
pub mod transaction;

pub use budget::{Allocation, BalanceSnapshot, Transfer, TransferValidationError, SMART_REBALANCE_NOTE};
pub use envelope::{EnvelopeMonthState, DEFAULT_PRIMARY_CATEGORY};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
pub use transaction::{Transaction, TransactionStatus};
