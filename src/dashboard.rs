//! Dashboard bundle
//!
//! Everything a renderer needs in one serializable value: each month's
//! envelope rows (with the previous month's balance for deltas) and metrics,
//! the current month's rebalance proposal, balance and income histories, and
//! an echo of the budget configuration.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::BudgetConfig;
use crate::error::TriageResult;
use crate::ledger::{Ledger, LedgerInputs};
use crate::metrics::{MonthKind, MonthMetrics};
use crate::models::{EnvelopeMonthState, Money, Month};
use crate::rebalance::RebalanceProposal;

/// One envelope row as rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeView {
    #[serde(flatten)]
    pub state: EnvelopeMonthState,
    /// Available balance in the previous month, if the envelope existed then
    pub prev_available: Option<Money>,
}

impl EnvelopeView {
    /// Month-over-month change in available balance
    pub fn delta(&self) -> Option<Money> {
        self.prev_available
            .map(|prev| self.state.available_balance - prev)
    }
}

/// Rows and metrics for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthView {
    pub kind: MonthKind,
    pub envelopes: Vec<EnvelopeView>,
    pub metrics: MonthMetrics,
}

/// Available balance at one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancePoint {
    pub month: Month,
    pub available: Money,
}

/// Wage and other income at one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomePoint {
    pub month: Month,
    pub wages: Money,
    pub other_income: Money,
}

/// The full rendering-facing model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub as_of: NaiveDate,
    pub current_month: Month,
    pub months: Vec<Month>,
    pub data_by_month: BTreeMap<Month, MonthView>,
    /// Smart Rebalance proposal for the current month
    pub proposal: Option<RebalanceProposal>,
    pub envelope_history: BTreeMap<String, Vec<BalancePoint>>,
    pub income_history: Vec<IncomePoint>,
    pub config: BudgetConfig,
}

impl Dashboard {
    /// Assemble the bundle from a built ledger
    pub fn build(
        ledger: &Ledger,
        inputs: &LedgerInputs,
        config: &BudgetConfig,
        as_of: NaiveDate,
    ) -> TriageResult<Self> {
        let current_month = Month::from_date(as_of);
        let mut data_by_month = BTreeMap::new();
        let mut income_history = Vec::new();

        for slice in ledger.slices() {
            let metrics = MonthMetrics::compute(ledger, inputs, config, slice.month, as_of)?;
            income_history.push(IncomePoint {
                month: slice.month,
                wages: metrics.income.wages,
                other_income: metrics.income.other_income,
            });

            let envelopes = slice
                .envelopes
                .iter()
                .map(|state| EnvelopeView {
                    prev_available: ledger.previous_available(slice.month, &state.category),
                    state: state.clone(),
                })
                .collect();

            data_by_month.insert(
                slice.month,
                MonthView {
                    kind: metrics.kind,
                    envelopes,
                    metrics,
                },
            );
        }

        let envelope_history = ledger
            .categories()
            .iter()
            .map(|category| {
                let points = ledger
                    .history(category)
                    .into_iter()
                    .map(|(month, available)| BalancePoint { month, available })
                    .collect();
                (category.clone(), points)
            })
            .collect();

        let proposal = ledger
            .slice(current_month)
            .map(|slice| RebalanceProposal::propose(slice, config));

        info!(
            months = data_by_month.len(),
            current = %current_month,
            "assembled dashboard"
        );

        Ok(Self {
            as_of,
            current_month,
            months: ledger.months(),
            data_by_month,
            proposal,
            envelope_history,
            income_history,
            config: config.clone(),
        })
    }

    pub fn month(&self, month: Month) -> Option<&MonthView> {
        self.data_by_month.get(&month)
    }

    pub fn current(&self) -> Option<&MonthView> {
        self.month(self.current_month)
    }
}
