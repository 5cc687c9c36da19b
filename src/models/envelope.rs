//! Envelope month state
//!
//! The derived row of the ledger: one envelope's funding, spending, transfers,
//! and running balance for one month.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// Primary category assigned to envelopes never seen on a transaction
pub const DEFAULT_PRIMARY_CATEGORY: &str = "General";

/// The state of one envelope in one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMonthState {
    /// The month
    pub month: Month,

    /// Envelope name
    pub category: String,

    /// Grouping used for display
    pub primary_category: String,

    /// New funding this month (explicit or recurring forward-fill)
    pub allocated_new: Money,

    /// Balance carried in from the previous month
    pub rollover_in: Money,

    /// Outflow magnitude this month
    pub spent: Money,

    /// Funds received from other envelopes
    pub transfers_in: Money,

    /// Funds given to other envelopes
    pub transfers_out: Money,

    /// rollover_in + allocated_new + transfers_in - transfers_out - spent
    pub available_balance: Money,

    /// Whether the envelope's allocation recurs month to month
    #[serde(default)]
    pub is_recurring: bool,

    /// Whether the envelope gets spend-pace projection
    #[serde(default)]
    pub is_variable: bool,
}

impl EnvelopeMonthState {
    /// Create a state row, deriving the available balance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        month: Month,
        category: impl Into<String>,
        primary_category: impl Into<String>,
        allocated_new: Money,
        rollover_in: Money,
        spent: Money,
        transfers_in: Money,
        transfers_out: Money,
    ) -> Self {
        let mut state = Self {
            month,
            category: category.into(),
            primary_category: primary_category.into(),
            allocated_new,
            rollover_in,
            spent,
            transfers_in,
            transfers_out,
            available_balance: Money::zero(),
            is_recurring: false,
            is_variable: false,
        };
        state.recompute_available();
        state
    }

    /// Recompute `available_balance` from the other fields
    pub fn recompute_available(&mut self) {
        self.available_balance = self.rollover_in + self.allocated_new + self.transfers_in
            - self.transfers_out
            - self.spent;
    }

    /// Check the balance invariant
    pub fn is_consistent(&self) -> bool {
        self.available_balance
            == self.rollover_in + self.allocated_new + self.transfers_in
                - self.transfers_out
                - self.spent
    }

    /// Total funds the envelope had to work with this month
    pub fn total_budgeted(&self) -> Money {
        self.rollover_in + self.allocated_new + self.transfers_in - self.transfers_out
    }

    /// Net transfers (in minus out)
    pub fn net_transfers(&self) -> Money {
        self.transfers_in - self.transfers_out
    }

    /// Check if this envelope is overspent (available is negative)
    pub fn is_overspent(&self) -> bool {
        self.available_balance.is_negative()
    }

    /// Check if this envelope holds surplus (available is positive)
    pub fn has_surplus(&self) -> bool {
        self.available_balance.is_positive()
    }
}

impl fmt::Display for EnvelopeMonthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} | Allocated: {} | Spent: {} | Available: {}",
            self.month, self.category, self.allocated_new, self.spent, self.available_balance
        )
    }
}
