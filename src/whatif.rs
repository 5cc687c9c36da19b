//! What-if overlay
//!
//! Applies hypothetical transfers to a copy of one month's ledger slice. The
//! input slice is never touched, so the overlay can be recomputed from scratch
//! each time the candidate queue changes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BudgetConfig;
use crate::error::{TriageError, TriageResult};
use crate::ledger::LedgerSlice;
use crate::models::{Money, Transfer};
use crate::rebalance::RebalanceProposal;

/// A slice with hypothetical transfers applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatIfSlice {
    pub slice: LedgerSlice,
    /// Net change in available balance per touched envelope
    pub deltas: BTreeMap<String, Money>,
    /// Transfers applied to this month
    pub applied: usize,
    /// Transfers skipped because they belong to another month
    pub ignored: usize,
}

impl WhatIfSlice {
    pub fn delta(&self, category: &str) -> Money {
        self.deltas.get(category).copied().unwrap_or_default()
    }
}

/// Apply `transfers` dated for the slice's month on top of `slice`
///
/// # Errors
///
/// A transfer for this month that names an envelope missing from the slice,
/// moves a non-positive amount, or moves funds into its own source.
pub fn apply_overlay(slice: &LedgerSlice, transfers: &[Transfer]) -> TriageResult<WhatIfSlice> {
    let mut overlay = slice.clone();
    let mut deltas: BTreeMap<String, Money> = BTreeMap::new();
    let mut applied = 0;
    let mut ignored = 0;

    for transfer in transfers {
        if transfer.month != slice.month {
            ignored += 1;
            continue;
        }

        transfer
            .validate()
            .map_err(|e| TriageError::Validation(format!("{} ({})", e, transfer)))?;

        for name in [&transfer.from_category, &transfer.to_category] {
            if !overlay.contains(name) {
                return Err(TriageError::envelope_not_found(name.clone()));
            }
        }

        for envelope in overlay.envelopes.iter_mut() {
            if envelope.category == transfer.from_category {
                envelope.transfers_out += transfer.amount;
            } else if envelope.category == transfer.to_category {
                envelope.transfers_in += transfer.amount;
            }
        }

        *deltas.entry(transfer.from_category.clone()).or_default() -= transfer.amount;
        *deltas.entry(transfer.to_category.clone()).or_default() += transfer.amount;
        applied += 1;
    }

    for envelope in overlay.envelopes.iter_mut() {
        envelope.recompute_available();
    }

    debug!(month = %slice.month, applied, ignored, "applied what-if overlay");

    Ok(WhatIfSlice {
        slice: overlay,
        deltas,
        applied,
        ignored,
    })
}

/// Extend `queued` with a Smart Rebalance proposal for the slice as it looks
/// once the queue is applied, so deficits the queue already covers are not
/// funded twice.
pub fn queue_with_rebalance(
    slice: &LedgerSlice,
    queued: &[Transfer],
    config: &BudgetConfig,
) -> TriageResult<Vec<Transfer>> {
    let after_queue = apply_overlay(slice, queued)?;
    let proposal = RebalanceProposal::propose(&after_queue.slice, config);

    let mut transfers = queued.to_vec();
    transfers.extend(proposal.transfers);
    Ok(transfers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnvelopeMonthState, Month};
    use chrono::NaiveDate;

    fn m(y: i32, mo: u32) -> Month {
        Month::new(y, mo).unwrap()
    }

    fn slice() -> LedgerSlice {
        let row = |category: &str, allocated: i64, spent: i64| {
            EnvelopeMonthState::new(
                m(2025, 2),
                category,
                "General",
                Money::from_cents(allocated),
                Money::zero(),
                Money::from_cents(spent),
                Money::zero(),
                Money::zero(),
            )
        };
        LedgerSlice::new(
            m(2025, 2),
            vec![row("Dining", 10000, 13000), row("Groceries", 32000, 4520), row("Rent", 165000, 165000)],
        )
    }

    #[test]
    fn test_overlay_updates_balances() {
        let base = slice();
        let transfers = vec![Transfer::new(m(2025, 2), "Groceries", "Dining", Money::from_cents(3000), "")];

        let result = apply_overlay(&base, &transfers).unwrap();

        let dining = result.slice.get("Dining").unwrap();
        assert_eq!(dining.transfers_in.cents(), 3000);
        assert_eq!(dining.available_balance, Money::zero());
        assert!(dining.is_consistent());
        assert_eq!(result.slice.get("Groceries").unwrap().available_balance.cents(), 24480);
        assert_eq!(result.delta("Dining").cents(), 3000);
        assert_eq!(result.delta("Groceries").cents(), -3000);
        assert_eq!(result.delta("Rent"), Money::zero());
        assert_eq!(result.applied, 1);

        // Input slice untouched
        assert_eq!(base, slice());
    }

    #[test]
    fn test_overlay_is_repeatable() {
        let base = slice();
        let transfers = vec![Transfer::new(m(2025, 2), "Groceries", "Dining", Money::from_cents(3000), "")];
        let first = apply_overlay(&base, &transfers).unwrap();
        let second = apply_overlay(&base, &transfers).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_other_months_are_ignored() {
        let transfers = vec![Transfer::new(m(2025, 3), "Groceries", "Dining", Money::from_cents(3000), "")];
        let result = apply_overlay(&slice(), &transfers).unwrap();

        assert_eq!(result.slice, slice());
        assert_eq!(result.ignored, 1);
        assert!(result.deltas.is_empty());
    }

    #[test]
    fn test_unknown_envelope_is_an_error() {
        let transfers = vec![Transfer::new(m(2025, 2), "Groceries", "Vacation", Money::from_cents(100), "")];
        let err = apply_overlay(&slice(), &transfers).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_transfer_is_an_error() {
        let transfers = vec![Transfer::new(m(2025, 2), "Dining", "Dining", Money::from_cents(100), "")];
        let err = apply_overlay(&slice(), &transfers).unwrap_err();
        assert!(err.is_validation());
    }

    fn config() -> BudgetConfig {
        BudgetConfig::empty(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), Money::zero())
    }

    #[test]
    fn test_rebalance_skips_deficits_the_queue_covers() {
        let queued = vec![Transfer::new(m(2025, 2), "Groceries", "Dining", Money::from_cents(3000), "")];
        let transfers = queue_with_rebalance(&slice(), &queued, &config()).unwrap();

        assert_eq!(transfers, queued);
        let result = apply_overlay(&slice(), &transfers).unwrap();
        assert_eq!(result.slice.get("Dining").unwrap().available_balance, Money::zero());
        assert_eq!(result.slice.get("Groceries").unwrap().available_balance.cents(), 24480);
    }

    #[test]
    fn test_rebalance_covers_what_the_queue_leaves() {
        let queued = vec![Transfer::new(m(2025, 2), "Groceries", "Dining", Money::from_cents(1000), "")];
        let transfers = queue_with_rebalance(&slice(), &queued, &config()).unwrap();

        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[1].to_category, "Dining");
        assert_eq!(transfers[1].amount.cents(), 2000);
        let result = apply_overlay(&slice(), &transfers).unwrap();
        assert_eq!(result.slice.get("Dining").unwrap().available_balance, Money::zero());
    }
}
