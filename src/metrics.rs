//! Metrics engine
//!
//! Per-month figures computed from a ledger slice plus the raw transactions
//! and balance snapshots: income tracking, health aggregates, unassigned
//! cash, uncategorized spend, and variable-envelope pace projections.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::BudgetConfig;
use crate::error::TriageResult;
use crate::ledger::{Ledger, LedgerInputs, LedgerSlice};
use crate::models::{EnvelopeMonthState, Money, Month, Transaction};

/// Points by which spend may lead the calendar before a variable envelope is over pace
pub const PACE_ALERT_MARGIN: i64 = 15;

/// Where a month sits relative to the as-of date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthKind {
    Past,
    Current,
    Planning,
}

impl MonthKind {
    pub fn classify(month: Month, as_of: NaiveDate) -> Self {
        let current = Month::from_date(as_of);
        match month.cmp(&current) {
            std::cmp::Ordering::Less => Self::Past,
            std::cmp::Ordering::Equal => Self::Current,
            std::cmp::Ordering::Greater => Self::Planning,
        }
    }

    pub fn is_planning(&self) -> bool {
        matches!(self, Self::Planning)
    }
}

/// How far along wage receipts are for the month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStatus {
    /// More than the tolerance band still outstanding
    Pending,
    /// Within the tolerance band of expected; treated as received
    WithinBuffer,
    /// At or above expected
    FullyReceived,
}

/// Wage and other-income totals for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSummary {
    pub wages: Money,
    pub other_income: Money,
    pub expected: Money,
    /// Outstanding wages; zero once within the tolerance band
    pub remaining: Money,
    /// Wages as a percentage of expected, capped at 100
    pub percent_received: Option<i64>,
    pub status: IncomeStatus,
}

impl IncomeSummary {
    /// Partition the month's posted inflows into wages and other income
    pub fn compute(transactions: &[Transaction], config: &BudgetConfig, month: Month) -> Self {
        let mut wages = Money::zero();
        let mut other_income = Money::zero();

        for txn in transactions
            .iter()
            .filter(|t| t.is_posted() && t.is_inflow() && month.contains(t.date))
        {
            if config.is_wage(txn) {
                wages += txn.amount;
            } else if !config.income_categories.is_empty() && !config.is_untracked(txn) {
                other_income += txn.amount;
            }
        }

        Self::from_totals(wages, other_income, config)
    }

    pub fn from_totals(wages: Money, other_income: Money, config: &BudgetConfig) -> Self {
        let expected = config.expected_monthly_income;
        let outstanding = expected - wages;

        let (status, remaining) = if wages.is_within(expected, config.income_tolerance) {
            (IncomeStatus::WithinBuffer, Money::zero())
        } else if !outstanding.is_positive() {
            (IncomeStatus::FullyReceived, Money::zero())
        } else {
            (IncomeStatus::Pending, outstanding)
        };

        Self {
            wages,
            other_income,
            expected,
            remaining,
            percent_received: percent(wages, expected).map(|p| p.min(100)),
            status,
        }
    }
}

/// Aggregate envelope health for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    /// Σ (allocated_new - spent) over envelopes outside the health exclusions
    pub operating_margin: Money,
    /// Σ max(available, 0)
    pub deployed_capital: Money,
    /// Σ max(-available, 0)
    pub needs_attention: Money,
    /// Σ available
    pub total_enveloped: Money,
    /// Σ allocated_new
    pub new_funding: Money,
    /// Σ rollover_in
    pub rollover_into_month: Money,
    /// Σ spent
    pub total_spent: Money,
}

impl HealthSummary {
    pub fn compute(slice: &LedgerSlice, config: &BudgetConfig) -> Self {
        let operating_margin = slice
            .envelopes
            .iter()
            .filter(|e| !config.is_health_excluded(&e.category))
            .map(|e| e.allocated_new - e.spent)
            .sum();

        Self {
            operating_margin,
            deployed_capital: slice.envelopes.iter().map(|e| e.available_balance.positive_part()).sum(),
            needs_attention: slice.envelopes.iter().map(|e| e.available_balance.negative_part()).sum(),
            total_enveloped: slice.total_available(),
            new_funding: slice.total_allocated(),
            rollover_into_month: slice.total_rollover(),
            total_spent: slice.total_spent(),
        }
    }
}

/// Real cash not claimed by any envelope (past and current months)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UnassignedCash {
    Actual {
        amount: Money,
        snapshot_month: Month,
        /// Snapshot balance plus posted activity through month end
        bank_balance: Money,
        total_enveloped: Money,
    },
    /// No balance snapshot at or before the month
    Unavailable,
}

impl UnassignedCash {
    pub fn compute(inputs: &LedgerInputs, slice: &LedgerSlice) -> Self {
        let Some(snapshot) = inputs.latest_snapshot(slice.month) else {
            return Self::Unavailable;
        };

        let activity = net_activity(
            &inputs.transactions,
            snapshot.month.start_date(),
            slice.month.end_date(),
        );
        let bank_balance = snapshot.balance + activity;
        let total_enveloped = slice.total_available();

        Self::Actual {
            amount: bank_balance - total_enveloped,
            snapshot_month: snapshot.month,
            bank_balance,
            total_enveloped,
        }
    }

    pub fn amount(&self) -> Option<Money> {
        match self {
            Self::Actual { amount, .. } => Some(*amount),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Actual { .. })
    }
}

/// Projected unclaimed cash for a planning month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectedCash {
    pub amount: Money,
    pub snapshot_month: Option<Month>,
    pub snapshot_balance: Money,
    pub transactions_since_snapshot: Money,
    pub expected_income: Money,
    pub rollover_into_month: Money,
    pub new_funding: Money,
    /// True when no snapshot existed and a zero opening balance was assumed
    pub estimated: bool,
}

impl ProjectedCash {
    /// Project unassigned cash entering `slice.month`
    ///
    /// The snapshot is the latest one at or before the as-of month, and
    /// posted activity is counted from the snapshot month through the as-of
    /// month. Without a snapshot, activity is counted from the budget start
    /// date over a zero balance.
    pub fn compute(
        inputs: &LedgerInputs,
        slice: &LedgerSlice,
        config: &BudgetConfig,
        as_of: NaiveDate,
    ) -> Self {
        let as_of_month = Month::from_date(as_of);
        let snapshot = inputs.latest_snapshot(as_of_month);

        let (snapshot_month, snapshot_balance, since) = match snapshot {
            Some(s) => (Some(s.month), s.balance, s.month.start_date()),
            None => (None, Money::zero(), config.budget_start_date),
        };

        let transactions_since_snapshot =
            net_activity(&inputs.transactions, since, as_of_month.end_date());
        let rollover_into_month = slice.total_rollover();
        let new_funding = slice.total_allocated();
        let expected_income = config.expected_monthly_income;

        Self {
            amount: snapshot_balance + transactions_since_snapshot + expected_income
                - rollover_into_month
                - new_funding,
            snapshot_month,
            snapshot_balance,
            transactions_since_snapshot,
            expected_income,
            rollover_into_month,
            new_funding,
            estimated: snapshot.is_none(),
        }
    }
}

/// Total outflow for one category that matched no envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Money,
}

/// Spending that no envelope claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncategorizedSpend {
    pub transactions: Vec<Transaction>,
    /// Sorted by amount descending, then name
    pub by_category: Vec<CategoryTotal>,
    pub total: Money,
}

impl UncategorizedSpend {
    pub fn compute(
        transactions: &[Transaction],
        ledger: &Ledger,
        config: &BudgetConfig,
        month: Month,
    ) -> Self {
        let matched: Vec<Transaction> = transactions
            .iter()
            .filter(|t| {
                t.is_posted()
                    && t.is_outflow()
                    && month.contains(t.date)
                    && config.in_budget_window(t)
                    && !ledger.categories().contains(&t.detailed_category)
                    && !config.is_untracked(t)
            })
            .cloned()
            .collect();

        let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
        for txn in &matched {
            *totals.entry(txn.detailed_category.as_str()).or_default() += txn.outflow();
        }

        let mut by_category: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category: category.to_string(),
                amount,
            })
            .collect();
        by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

        let total = matched.iter().map(Transaction::outflow).sum();

        Self {
            transactions: matched,
            by_category,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Spent-to-allocated ratio of a variable envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Coverage {
    Ratio(f64),
    /// Nothing allocated this month
    Undefined,
}

impl Coverage {
    pub fn of(spent: Money, allocated: Money) -> Self {
        match spent.ratio_to(allocated) {
            Some(ratio) => Self::Ratio(ratio),
            None => Self::Undefined,
        }
    }

    pub fn ratio(&self) -> Option<f64> {
        match self {
            Self::Ratio(r) => Some(*r),
            Self::Undefined => None,
        }
    }
}

/// Spend pace against the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceStatus {
    OnTrack,
    AheadOfPace,
    OverPace,
    /// No allocation to measure against
    Unfunded,
}

/// End-of-month projection for one variable envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableProjection {
    pub category: String,
    pub allocated: Money,
    pub spent: Money,
    pub coverage: Coverage,
    pub projected_spend: Money,
    /// allocated - projected_spend
    pub projected_variance: Money,
    pub elapsed_days: u32,
    pub days_in_month: u32,
    pub month_progress_pct: i64,
    pub spent_pct: Option<i64>,
    pub pace: PaceStatus,
}

impl VariableProjection {
    /// Project month-end spend; `elapsed_days` is clamped to `[1, days_in_month]`
    pub fn project(state: &EnvelopeMonthState, elapsed_days: u32, days_in_month: u32) -> Self {
        let days_in_month = days_in_month.max(1);
        let elapsed_days = elapsed_days.clamp(1, days_in_month);

        let allocated = state.allocated_new;
        let spent = state.spent;
        let projected_spend = spent
            .scale(i64::from(days_in_month), i64::from(elapsed_days))
            .unwrap_or(spent);

        let month_progress_pct =
            ((f64::from(elapsed_days) / f64::from(days_in_month)) * 100.0).round() as i64;
        let spent_pct = percent(spent, allocated);
        let pace = match spent_pct {
            None => PaceStatus::Unfunded,
            Some(p) if p > month_progress_pct + PACE_ALERT_MARGIN => PaceStatus::OverPace,
            Some(p) if p > month_progress_pct => PaceStatus::AheadOfPace,
            Some(_) => PaceStatus::OnTrack,
        };

        Self {
            category: state.category.clone(),
            allocated,
            spent,
            coverage: Coverage::of(spent, allocated),
            projected_spend,
            projected_variance: allocated - projected_spend,
            elapsed_days,
            days_in_month,
            month_progress_pct,
            spent_pct,
            pace,
        }
    }

    /// Projections for every variable envelope in the slice as of `as_of`
    pub fn for_slice(slice: &LedgerSlice, as_of: NaiveDate) -> Vec<Self> {
        slice
            .envelopes
            .iter()
            .filter(|e| e.is_variable)
            .map(|e| Self::project(e, as_of.day(), slice.month.days_in_month()))
            .collect()
    }
}

/// Every metric for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthMetrics {
    pub month: Month,
    pub kind: MonthKind,
    pub income: IncomeSummary,
    pub health: HealthSummary,
    /// Past and current months only
    pub unassigned_cash: Option<UnassignedCash>,
    /// Planning months only
    pub projected_cash: Option<ProjectedCash>,
    /// Planning months only: expected income minus new funding
    pub unallocated_surplus: Option<Money>,
    pub uncategorized: UncategorizedSpend,
    /// Current month only
    pub variable: Vec<VariableProjection>,
}

impl MonthMetrics {
    pub fn compute(
        ledger: &Ledger,
        inputs: &LedgerInputs,
        config: &BudgetConfig,
        month: Month,
        as_of: NaiveDate,
    ) -> TriageResult<Self> {
        let slice = ledger.require_slice(month)?;
        let kind = MonthKind::classify(month, as_of);

        let (unassigned_cash, projected_cash, unallocated_surplus) = if kind.is_planning() {
            let projected = ProjectedCash::compute(inputs, slice, config, as_of);
            if projected.estimated {
                warn!(month = %month, "no balance snapshot; projected cash is estimated");
            }
            let surplus = config.expected_monthly_income - slice.total_allocated();
            (None, Some(projected), Some(surplus))
        } else {
            let unassigned = UnassignedCash::compute(inputs, slice);
            if !unassigned.is_available() {
                warn!(month = %month, "no balance snapshot; unassigned cash unavailable");
            }
            (Some(unassigned), None, None)
        };

        let variable = if kind == MonthKind::Current {
            VariableProjection::for_slice(slice, as_of)
        } else {
            Vec::new()
        };

        let metrics = Self {
            month,
            kind,
            income: IncomeSummary::compute(&inputs.transactions, config, month),
            health: HealthSummary::compute(slice, config),
            unassigned_cash,
            projected_cash,
            unallocated_surplus,
            uncategorized: UncategorizedSpend::compute(&inputs.transactions, ledger, config, month),
            variable,
        };

        debug!(
            month = %month,
            operating_margin = %metrics.health.operating_margin,
            needs_attention = %metrics.health.needs_attention,
            "computed month metrics"
        );

        Ok(metrics)
    }
}

/// Σ posted amounts dated within `[from, through]`
fn net_activity(transactions: &[Transaction], from: NaiveDate, through: NaiveDate) -> Money {
    transactions
        .iter()
        .filter(|t| t.is_posted() && t.date >= from && t.date <= through)
        .map(|t| t.amount)
        .sum()
}

/// `part / whole` as a rounded percentage, `None` when `whole` is zero
fn percent(part: Money, whole: Money) -> Option<i64> {
    part.ratio_to(whole).map(|r| (r * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Allocation, BalanceSnapshot, TransactionStatus};

    fn m(y: i32, mo: u32) -> Month {
        Month::new(y, mo).unwrap()
    }

    fn d(y: i32, mo: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, day).unwrap()
    }

    fn txn(date: NaiveDate, cents: i64, detailed: &str, primary: &str) -> Transaction {
        Transaction::posted(date, Money::from_cents(cents), "test", detailed, primary)
    }

    fn config() -> BudgetConfig {
        BudgetConfig::empty(d(2025, 1, 1), Money::from_cents(524500))
            .with_income_categories(["Wages"])
            .with_untracked(["Credit card payments", "Transfers"])
            .with_variable(["Groceries"])
            .with_health_exclusions(["Travel"])
    }

    fn state(category: &str, allocated: i64, spent: i64, rollover: i64) -> EnvelopeMonthState {
        EnvelopeMonthState::new(
            m(2025, 2),
            category,
            "General",
            Money::from_cents(allocated),
            Money::from_cents(rollover),
            Money::from_cents(spent),
            Money::zero(),
            Money::zero(),
        )
    }

    #[test]
    fn test_month_kind() {
        let as_of = d(2025, 2, 14);
        assert_eq!(MonthKind::classify(m(2025, 1), as_of), MonthKind::Past);
        assert_eq!(MonthKind::classify(m(2025, 2), as_of), MonthKind::Current);
        assert_eq!(MonthKind::classify(m(2025, 3), as_of), MonthKind::Planning);
    }

    #[test]
    fn test_income_partition() {
        let mut pending = txn(d(2025, 2, 27), 100000, "Wages", "Income");
        pending.status = TransactionStatus::Pending;
        let transactions = vec![
            txn(d(2025, 2, 10), 240000, "Wages", "Income"),
            txn(d(2025, 2, 24), 5000, "Refund", "Shopping"),
            txn(d(2025, 2, 25), 90000, "Transfers", "Transfers"),
            txn(d(2025, 2, 26), -9000, "Groceries", "Food and drink"),
            txn(d(2025, 3, 10), 240000, "Wages", "Income"),
            pending,
        ];

        let income = IncomeSummary::compute(&transactions, &config(), m(2025, 2));
        assert_eq!(income.wages.cents(), 240000);
        assert_eq!(income.other_income.cents(), 5000);
        assert_eq!(income.remaining.cents(), 284500);
        assert_eq!(income.status, IncomeStatus::Pending);
        assert_eq!(income.percent_received, Some(46));
    }

    #[test]
    fn test_income_ignores_budget_start_date() {
        let transactions = vec![txn(d(2024, 6, 10), 240000, "Wages", "Income")];
        let income = IncomeSummary::compute(&transactions, &config(), m(2024, 6));
        assert_eq!(income.wages.cents(), 240000);
    }

    #[test]
    fn test_income_tolerance_band() {
        let config = config();
        let near = IncomeSummary::from_totals(Money::from_cents(524496), Money::zero(), &config);
        assert_eq!(near.status, IncomeStatus::WithinBuffer);
        assert_eq!(near.remaining, Money::zero());

        let over = IncomeSummary::from_totals(Money::from_cents(530000), Money::zero(), &config);
        assert_eq!(over.status, IncomeStatus::FullyReceived);
        assert_eq!(over.percent_received, Some(100));

        let short = IncomeSummary::from_totals(Money::from_cents(524490), Money::zero(), &config);
        assert_eq!(short.status, IncomeStatus::Pending);
        assert_eq!(short.remaining.cents(), 10);
    }

    #[test]
    fn test_income_without_categories_counts_all_inflows() {
        let mut config = config();
        config.income_categories.clear();
        let transactions = vec![
            txn(d(2025, 2, 10), 240000, "Wages", "Income"),
            txn(d(2025, 2, 24), 5000, "Refund", "Shopping"),
        ];
        let income = IncomeSummary::compute(&transactions, &config, m(2025, 2));
        assert_eq!(income.wages.cents(), 245000);
        assert_eq!(income.other_income, Money::zero());
    }

    #[test]
    fn test_income_with_zero_expected() {
        let mut config = config();
        config.expected_monthly_income = Money::zero();
        let income = IncomeSummary::from_totals(Money::from_cents(1000), Money::zero(), &config);
        assert_eq!(income.percent_received, None);
        assert_eq!(income.status, IncomeStatus::FullyReceived);
    }

    #[test]
    fn test_default_health_exclusions_match_envelope_names() {
        let row = |category: &str, allocated: i64, spent: i64| {
            EnvelopeMonthState::new(
                m(2025, 2),
                category,
                "Travel",
                Money::from_cents(allocated),
                Money::zero(),
                Money::from_cents(spent),
                Money::zero(),
                Money::zero(),
            )
        };
        let slice = LedgerSlice::new(m(2025, 2), vec![row("Travel", 0, 50000), row("Flights", 20000, 5000)]);
        let health = HealthSummary::compute(&slice, &BudgetConfig::default());

        assert_eq!(health.operating_margin.cents(), 15000);
    }

    #[test]
    fn test_health_decomposition() {
        let slice = LedgerSlice::new(
            m(2025, 2),
            vec![
                state("Dining", 10000, 13000, 0),
                state("Groceries", 32000, 4520, 1000),
                state("Travel", 0, 50000, 20000),
            ],
        );
        let health = HealthSummary::compute(&slice, &config());

        // Travel excluded: (100 - 130) + (320 - 45.20)
        assert_eq!(health.operating_margin.cents(), 24480);
        assert_eq!(health.deployed_capital.cents(), 28480);
        assert_eq!(health.needs_attention.cents(), 33000);
        assert_eq!(
            health.deployed_capital - health.needs_attention,
            health.total_enveloped
        );
        assert_eq!(health.new_funding.cents(), 42000);
        assert_eq!(health.rollover_into_month.cents(), 21000);
    }

    fn ledger_fixture(snapshots: Vec<BalanceSnapshot>) -> (Ledger, LedgerInputs) {
        let inputs = LedgerInputs {
            transactions: vec![
                txn(d(2025, 1, 15), 240000, "Wages", "Income"),
                txn(d(2025, 2, 5), -4520, "Groceries", "Food and drink"),
                txn(d(2025, 2, 7), -1800, "Coffee shops", "Food and drink"),
                txn(d(2025, 2, 8), -2200, "Coffee shops", "Food and drink"),
                txn(d(2025, 2, 9), -9900, "Parking", "Transportation"),
                txn(d(2025, 2, 10), 240000, "Wages", "Income"),
                txn(d(2025, 2, 12), -50000, "Credit card payments", "Loan payments"),
            ],
            allocations: vec![
                Allocation::new(m(2025, 2), "Rent", Money::from_cents(165000)),
                Allocation::new(m(2025, 2), "Groceries", Money::from_cents(32000)),
                Allocation::new(m(2025, 3), "Groceries", Money::from_cents(30000)),
            ],
            transfers: vec![],
            snapshots,
        };
        let ledger = Ledger::build(&inputs, &config(), Some(m(2025, 2))).unwrap();
        (ledger, inputs)
    }

    #[test]
    fn test_unassigned_cash_with_snapshot() {
        let (ledger, inputs) =
            ledger_fixture(vec![BalanceSnapshot::new(m(2025, 2), Money::from_cents(300000))]);
        let slice = ledger.slice(m(2025, 2)).unwrap();

        let cash = UnassignedCash::compute(&inputs, slice);
        // 3000 + 2400 - 45.20 - 18 - 22 - 99 - 500 = 4715.80; enveloped 1650 + 274.80
        match cash {
            UnassignedCash::Actual {
                amount,
                bank_balance,
                total_enveloped,
                snapshot_month,
            } => {
                assert_eq!(snapshot_month, m(2025, 2));
                assert_eq!(bank_balance.cents(), 471580);
                assert_eq!(total_enveloped.cents(), 192480);
                assert_eq!(amount.cents(), 279100);
            }
            UnassignedCash::Unavailable => panic!("expected a snapshot-backed figure"),
        }
    }

    #[test]
    fn test_unassigned_cash_without_snapshot_is_flagged() {
        let (ledger, inputs) = ledger_fixture(vec![]);
        let metrics = MonthMetrics::compute(&ledger, &inputs, &config(), m(2025, 2), d(2025, 2, 14)).unwrap();

        assert_eq!(metrics.unassigned_cash, Some(UnassignedCash::Unavailable));
        assert!(metrics.projected_cash.is_none());
        assert!(metrics.unallocated_surplus.is_none());
    }

    #[test]
    fn test_projected_cash_for_planning_month() {
        let (ledger, inputs) =
            ledger_fixture(vec![BalanceSnapshot::new(m(2025, 2), Money::from_cents(300000))]);
        let metrics = MonthMetrics::compute(&ledger, &inputs, &config(), m(2025, 3), d(2025, 2, 14)).unwrap();

        let projected = metrics.projected_cash.unwrap();
        assert!(!projected.estimated);
        assert_eq!(projected.transactions_since_snapshot.cents(), 171580);
        // Rent 1650 + Groceries 274.80 roll into March; 300 new funding
        assert_eq!(projected.rollover_into_month.cents(), 192480);
        assert_eq!(projected.new_funding.cents(), 30000);
        assert_eq!(projected.amount.cents(), 300000 + 171580 + 524500 - 192480 - 30000);
        assert_eq!(metrics.unallocated_surplus, Some(Money::from_cents(494500)));
        assert!(metrics.unassigned_cash.is_none());
        assert!(metrics.variable.is_empty());
    }

    #[test]
    fn test_projected_cash_without_snapshot_is_estimated() {
        let (ledger, inputs) = ledger_fixture(vec![]);
        let slice = ledger.slice(m(2025, 3)).unwrap();
        let projected = ProjectedCash::compute(&inputs, slice, &config(), d(2025, 2, 14));

        assert!(projected.estimated);
        assert_eq!(projected.snapshot_month, None);
        // Counted from the budget start: January wages included
        assert_eq!(projected.transactions_since_snapshot.cents(), 240000 + 171580);
    }

    #[test]
    fn test_uncategorized_spend() {
        let (ledger, inputs) = ledger_fixture(vec![]);
        let spend = UncategorizedSpend::compute(&inputs.transactions, &ledger, &config(), m(2025, 2));

        assert_eq!(spend.transactions.len(), 3);
        assert_eq!(spend.total.cents(), 13900);
        assert_eq!(
            spend.by_category,
            vec![
                CategoryTotal { category: "Parking".into(), amount: Money::from_cents(9900) },
                CategoryTotal { category: "Coffee shops".into(), amount: Money::from_cents(4000) },
            ]
        );
    }

    #[test]
    fn test_coverage_undefined_when_unallocated() {
        assert_eq!(Coverage::of(Money::from_cents(500), Money::zero()), Coverage::Undefined);
        assert_eq!(
            Coverage::of(Money::from_cents(500), Money::from_cents(1000)).ratio(),
            Some(0.5)
        );
    }

    #[test]
    fn test_variable_projection() {
        let groceries = state("Groceries", 32000, 12000, 0);
        let projection = VariableProjection::project(&groceries, 14, 28);

        assert_eq!(projection.projected_spend.cents(), 24000);
        assert_eq!(projection.projected_variance.cents(), 8000);
        assert_eq!(projection.month_progress_pct, 50);
        assert_eq!(projection.spent_pct, Some(38));
        assert_eq!(projection.pace, PaceStatus::OnTrack);
    }

    #[test]
    fn test_variable_projection_pace_bands() {
        let ahead = VariableProjection::project(&state("Groceries", 10000, 6000, 0), 14, 28);
        assert_eq!(ahead.pace, PaceStatus::AheadOfPace);

        let over = VariableProjection::project(&state("Groceries", 10000, 7000, 0), 14, 28);
        assert_eq!(over.pace, PaceStatus::OverPace);

        let unfunded = VariableProjection::project(&state("Groceries", 0, 7000, 0), 14, 28);
        assert_eq!(unfunded.pace, PaceStatus::Unfunded);
        assert_eq!(unfunded.coverage, Coverage::Undefined);
    }

    #[test]
    fn test_elapsed_days_are_clamped() {
        let groceries = state("Groceries", 32000, 3000, 0);
        let early = VariableProjection::project(&groceries, 0, 28);
        assert_eq!(early.elapsed_days, 1);
        assert_eq!(early.projected_spend.cents(), 84000);

        let late = VariableProjection::project(&groceries, 40, 28);
        assert_eq!(late.elapsed_days, 28);
        assert_eq!(late.projected_spend.cents(), 3000);
    }

    #[test]
    fn test_current_month_metrics() {
        let (ledger, inputs) =
            ledger_fixture(vec![BalanceSnapshot::new(m(2025, 2), Money::from_cents(300000))]);
        let metrics = MonthMetrics::compute(&ledger, &inputs, &config(), m(2025, 2), d(2025, 2, 14)).unwrap();

        assert_eq!(metrics.kind, MonthKind::Current);
        assert_eq!(metrics.variable.len(), 1);
        assert_eq!(metrics.variable[0].category, "Groceries");
        assert_eq!(metrics.variable[0].elapsed_days, 14);
        assert_eq!(metrics.income.wages.cents(), 240000);
        assert!(metrics.unassigned_cash.unwrap().is_available());
    }

    #[test]
    fn test_metrics_for_unknown_month() {
        let (ledger, inputs) = ledger_fixture(vec![]);
        let err = MonthMetrics::compute(&ledger, &inputs, &config(), m(2030, 1), d(2025, 2, 14)).unwrap_err();
        assert!(err.is_not_found());
    }
}
