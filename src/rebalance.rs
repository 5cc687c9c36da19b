//! Smart Rebalance
//!
//! Proposes transfers that close one month's non-recurring deficits from
//! non-recurring surpluses. Greedy first-fit: deficits and surpluses are both
//! walked in category-name order, and each deficit drains the head surplus
//! before moving on. The proposal is never applied to the ledger.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BudgetConfig;
use crate::ledger::LedgerSlice;
use crate::models::{Money, Month, Transfer, SMART_REBALANCE_NOTE};

/// A deficit left after every surplus was drained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncoveredDeficit {
    pub category: String,
    /// Shortfall magnitude still open
    pub remaining: Money,
}

/// Proposed transfers for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceProposal {
    pub month: Month,
    /// Transfers in generation order
    pub transfers: Vec<Transfer>,
    pub uncovered: Vec<UncoveredDeficit>,
    /// Surplus left undrawn across all eligible envelopes
    pub surplus_remaining: Money,
}

impl RebalanceProposal {
    /// Build a proposal for the slice's month
    pub fn propose(slice: &LedgerSlice, config: &BudgetConfig) -> Self {
        // Slice envelopes are already ordered by category name
        let eligible = slice
            .envelopes
            .iter()
            .filter(|e| !config.is_recurring(&e.category));

        let mut deficits: Vec<(&str, Money)> = Vec::new();
        let mut surpluses: Vec<(&str, Money)> = Vec::new();
        for envelope in eligible {
            if envelope.is_overspent() {
                deficits.push((envelope.category.as_str(), envelope.available_balance.negative_part()));
            } else if envelope.has_surplus() {
                surpluses.push((envelope.category.as_str(), envelope.available_balance));
            }
        }

        let mut transfers = Vec::new();
        let mut uncovered = Vec::new();
        let mut head = 0;

        for (deficit, need) in deficits {
            let mut remaining = need;
            while remaining.is_positive() && head < surpluses.len() {
                let (source, available) = &mut surpluses[head];
                let amount = remaining.min(*available);

                transfers.push(Transfer::new(
                    slice.month,
                    *source,
                    deficit,
                    amount,
                    SMART_REBALANCE_NOTE,
                ));
                *available -= amount;
                remaining -= amount;

                if available.is_zero() {
                    head += 1;
                }
            }

            if remaining.is_positive() {
                uncovered.push(UncoveredDeficit {
                    category: deficit.to_string(),
                    remaining,
                });
            }
        }

        let surplus_remaining = surpluses[head.min(surpluses.len())..]
            .iter()
            .map(|(_, available)| *available)
            .sum();

        debug!(
            month = %slice.month,
            transfers = transfers.len(),
            uncovered = uncovered.len(),
            "proposed smart rebalance"
        );

        Self {
            month: slice.month,
            transfers,
            uncovered,
            surplus_remaining,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Whether every eligible deficit was closed
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    /// Total amount moved by the proposal
    pub fn total_moved(&self) -> Money {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}
