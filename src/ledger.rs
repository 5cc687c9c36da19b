//! Envelope ledger engine
//!
//! Builds the per-(month, envelope) state table from the four input record
//! sets. Balances chain month to month as a left-to-right fold:
//!
//! ```text
//! available = rollover_in + allocated_new + transfers_in - transfers_out - spent
//! rollover_in(M) = available(previous materialized month)
//! ```
//!
//! Only months with activity, plus the anchor month, are materialized.
//! Recurring envelopes forward-fill their most recent explicit allocation.
//! The table is rebuilt wholesale on every run and never mutated afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BudgetConfig;
use crate::error::{TriageError, TriageResult};
use crate::models::{
    Allocation, BalanceSnapshot, EnvelopeMonthState, Money, Month, Transaction, Transfer,
    DEFAULT_PRIMARY_CATEGORY,
};

/// The four record sets produced by ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerInputs {
    pub transactions: Vec<Transaction>,
    pub allocations: Vec<Allocation>,
    pub transfers: Vec<Transfer>,
    pub snapshots: Vec<BalanceSnapshot>,
}

impl LedgerInputs {
    pub fn new(
        transactions: Vec<Transaction>,
        allocations: Vec<Allocation>,
        transfers: Vec<Transfer>,
        snapshots: Vec<BalanceSnapshot>,
    ) -> Self {
        Self {
            transactions,
            allocations,
            transfers,
            snapshots,
        }
    }

    /// Most recent balance snapshot at or before `month`
    pub fn latest_snapshot(&self, month: Month) -> Option<&BalanceSnapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.month <= month)
            .max_by_key(|s| s.month)
    }
}

/// All envelope rows for one month, ordered by category name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSlice {
    pub month: Month,
    pub envelopes: Vec<EnvelopeMonthState>,
}

impl LedgerSlice {
    pub fn new(month: Month, mut envelopes: Vec<EnvelopeMonthState>) -> Self {
        envelopes.sort_by(|a, b| a.category.cmp(&b.category));
        Self { month, envelopes }
    }

    /// Look up one envelope by exact name
    pub fn get(&self, category: &str) -> Option<&EnvelopeMonthState> {
        self.envelopes
            .binary_search_by(|e| e.category.as_str().cmp(category))
            .ok()
            .map(|idx| &self.envelopes[idx])
    }

    pub fn contains(&self, category: &str) -> bool {
        self.get(category).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn total_allocated(&self) -> Money {
        self.envelopes.iter().map(|e| e.allocated_new).sum()
    }

    pub fn total_rollover(&self) -> Money {
        self.envelopes.iter().map(|e| e.rollover_in).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.envelopes.iter().map(|e| e.spent).sum()
    }

    pub fn total_available(&self) -> Money {
        self.envelopes.iter().map(|e| e.available_balance).sum()
    }

    pub fn total_transfers_in(&self) -> Money {
        self.envelopes.iter().map(|e| e.transfers_in).sum()
    }

    pub fn total_transfers_out(&self) -> Money {
        self.envelopes.iter().map(|e| e.transfers_out).sum()
    }

    /// Envelopes grouped by primary category, both levels sorted by name
    pub fn grouped(&self) -> BTreeMap<&str, Vec<&EnvelopeMonthState>> {
        let mut groups: BTreeMap<&str, Vec<&EnvelopeMonthState>> = BTreeMap::new();
        for envelope in &self.envelopes {
            groups
                .entry(envelope.primary_category.as_str())
                .or_default()
                .push(envelope);
        }
        groups
    }
}

/// The complete envelope ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    /// Envelope universe
    categories: BTreeSet<String>,

    /// Detailed -> primary category mapping (last seen wins)
    primary_categories: BTreeMap<String, String>,

    /// One slice per materialized month, chronological
    slices: Vec<LedgerSlice>,
}

impl Ledger {
    /// Build the ledger from the input record sets
    ///
    /// Only months with an allocation, an in-window posted transaction, or a
    /// transfer are materialized, plus the `anchor` month. Rollover carries
    /// across skipped months unchanged.
    ///
    /// # Errors
    ///
    /// Fails on the first transfer with a non-positive amount, identical source
    /// and destination, or a category outside the envelope universe.
    pub fn build(
        inputs: &LedgerInputs,
        config: &BudgetConfig,
        anchor: Option<Month>,
    ) -> TriageResult<Self> {
        let in_window: Vec<&Transaction> = inputs
            .transactions
            .iter()
            .filter(|t| t.is_posted() && config.in_budget_window(t))
            .collect();

        let categories = envelope_universe(inputs, &in_window, config);
        validate_transfers(&inputs.transfers, &categories)?;

        let mut primary_categories = BTreeMap::new();
        for txn in &inputs.transactions {
            if !txn.detailed_category.is_empty() && !txn.primary_category.is_empty() {
                primary_categories.insert(txn.detailed_category.clone(), txn.primary_category.clone());
            }
        }

        // Explicit allocations per category; later rows overwrite earlier ones
        let mut explicit: BTreeMap<&str, BTreeMap<Month, Money>> = BTreeMap::new();
        let mut first_seen: BTreeMap<&str, Month> = BTreeMap::new();
        let mut active_months: BTreeSet<Month> = BTreeSet::new();

        for allocation in &inputs.allocations {
            explicit
                .entry(allocation.category.as_str())
                .or_default()
                .insert(allocation.month, allocation.amount);
            mark_seen(&mut first_seen, &allocation.category, allocation.month);
            active_months.insert(allocation.month);
        }

        let mut spent: BTreeMap<(Month, &str), Money> = BTreeMap::new();
        for txn in &in_window {
            let month = txn.month();
            active_months.insert(month);
            if let Some(category) = categories.get(txn.detailed_category.as_str()) {
                mark_seen(&mut first_seen, category, month);
                *spent.entry((month, category.as_str())).or_default() += txn.outflow();
            }
        }

        let mut moved_in: BTreeMap<(Month, &str), Money> = BTreeMap::new();
        let mut moved_out: BTreeMap<(Month, &str), Money> = BTreeMap::new();
        for transfer in &inputs.transfers {
            active_months.insert(transfer.month);
            mark_seen(&mut first_seen, &transfer.from_category, transfer.month);
            mark_seen(&mut first_seen, &transfer.to_category, transfer.month);
            *moved_out
                .entry((transfer.month, transfer.from_category.as_str()))
                .or_default() += transfer.amount;
            *moved_in
                .entry((transfer.month, transfer.to_category.as_str()))
                .or_default() += transfer.amount;
        }

        if let Some(anchor) = anchor {
            active_months.insert(anchor);
        }

        let mut carried: BTreeMap<&str, Money> = BTreeMap::new();
        let mut slices = Vec::with_capacity(active_months.len());

        for month in active_months {
            let mut envelopes = Vec::new();
            for category in &categories {
                let name = category.as_str();
                match first_seen.get(name) {
                    Some(first) if *first <= month => {}
                    _ => continue,
                }

                let allocations = explicit.get(name);
                let allocated_new = match allocations.and_then(|a| a.get(&month)) {
                    Some(amount) => *amount,
                    None if config.is_recurring(name) => allocations
                        .and_then(|a| a.range(..=month).next_back())
                        .map(|(_, amount)| *amount)
                        .unwrap_or_default(),
                    None => Money::zero(),
                };

                let primary = primary_categories
                    .get(name)
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_PRIMARY_CATEGORY);

                let mut state = EnvelopeMonthState::new(
                    month,
                    name,
                    primary,
                    allocated_new,
                    carried.get(name).copied().unwrap_or_default(),
                    spent.get(&(month, name)).copied().unwrap_or_default(),
                    moved_in.get(&(month, name)).copied().unwrap_or_default(),
                    moved_out.get(&(month, name)).copied().unwrap_or_default(),
                );
                state.is_recurring = config.is_recurring(name);
                state.is_variable = config.is_variable(name);

                carried.insert(name, state.available_balance);
                envelopes.push(state);
            }

            debug!(
                month = %month,
                envelopes = envelopes.len(),
                "folded ledger month"
            );
            slices.push(LedgerSlice::new(month, envelopes));
        }

        info!(
            months = slices.len(),
            envelopes = categories.len(),
            transactions = in_window.len(),
            "built envelope ledger"
        );

        Ok(Self {
            categories,
            primary_categories,
            slices,
        })
    }

    /// Materialized months, chronological
    pub fn months(&self) -> Vec<Month> {
        self.slices.iter().map(|s| s.month).collect()
    }

    /// The envelope universe
    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    pub fn slices(&self) -> &[LedgerSlice] {
        &self.slices
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// The slice for one month
    pub fn slice(&self, month: Month) -> Option<&LedgerSlice> {
        self.slices
            .binary_search_by(|s| s.month.cmp(&month))
            .ok()
            .map(|idx| &self.slices[idx])
    }

    /// The slice for one month, as an error when missing
    pub fn require_slice(&self, month: Month) -> TriageResult<&LedgerSlice> {
        self.slice(month)
            .ok_or_else(|| TriageError::month_not_found(month.to_string()))
    }

    /// One envelope's state in one month
    pub fn state(&self, month: Month, category: &str) -> Option<&EnvelopeMonthState> {
        self.slice(month).and_then(|s| s.get(category))
    }

    /// Available balance per month for one envelope, from its first month on
    pub fn history(&self, category: &str) -> Vec<(Month, Money)> {
        self.slices
            .iter()
            .filter_map(|s| s.get(category).map(|e| (s.month, e.available_balance)))
            .collect()
    }

    /// Available balance of the envelope in the materialized month before `month`
    pub fn previous_available(&self, month: Month, category: &str) -> Option<Money> {
        let idx = self.slices.partition_point(|s| s.month < month);
        idx.checked_sub(1)
            .and_then(|prev| self.slices[prev].get(category))
            .map(|e| e.available_balance)
    }

    /// Primary category for an envelope or transaction category
    pub fn primary_category<'a>(&'a self, category: &str) -> &'a str {
        self.primary_categories
            .get(category)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PRIMARY_CATEGORY)
    }

    /// Every state row, month-major then category
    pub fn rows(&self) -> impl Iterator<Item = &EnvelopeMonthState> {
        self.slices.iter().flat_map(|s| s.envelopes.iter())
    }
}

fn mark_seen<'a>(first_seen: &mut BTreeMap<&'a str, Month>, category: &'a str, month: Month) {
    first_seen
        .entry(category)
        .and_modify(|m| {
            if month < *m {
                *m = month;
            }
        })
        .or_insert(month);
}

/// Allocation categories, plus unbudgeted spending categories when enabled
fn envelope_universe(
    inputs: &LedgerInputs,
    in_window: &[&Transaction],
    config: &BudgetConfig,
) -> BTreeSet<String> {
    let mut categories: BTreeSet<String> = inputs
        .allocations
        .iter()
        .map(|a| a.category.clone())
        .collect();

    if config.track_unbudgeted {
        categories.extend(
            in_window
                .iter()
                .filter(|t| {
                    t.is_outflow() && !t.detailed_category.is_empty() && !config.is_untracked(t)
                })
                .map(|t| t.detailed_category.clone()),
        );
    }

    categories
}

fn validate_transfers(transfers: &[Transfer], categories: &BTreeSet<String>) -> TriageResult<()> {
    for transfer in transfers {
        transfer
            .validate()
            .map_err(|e| TriageError::Ledger(format!("{} ({})", e, transfer)))?;

        for name in [&transfer.from_category, &transfer.to_category] {
            if !categories.contains(name) {
                return Err(TriageError::Ledger(format!(
                    "Transfer references unknown envelope '{}' ({})",
                    name, transfer
                )));
            }
        }
    }
    Ok(())
}
