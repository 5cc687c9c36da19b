//! Budget configuration consumed by the ledger, metrics, and rebalance engines
//!
//! A `BudgetConfig` is an immutable value passed explicitly into every
//! computation entry point. Category sets match envelope names exactly
//! (case-sensitive, no normalization).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Money, Transaction};

/// Fixed inputs for one ledger run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetConfig {
    /// Transactions dated before this are ignored by the ledger
    #[serde(default = "default_budget_start_date")]
    pub budget_start_date: NaiveDate,

    /// Expected take-home income per month
    #[serde(default = "default_expected_monthly_income")]
    pub expected_monthly_income: Money,

    /// Band within which posted wages count as fully received
    #[serde(default = "default_income_tolerance")]
    pub income_tolerance: Money,

    /// Categories that identify wage deposits
    #[serde(default = "default_income_categories")]
    pub income_categories: BTreeSet<String>,

    /// Envelopes left out of Operating Margin, matched on the exact envelope
    /// name. An envelope whose primary category is "Travel" but whose own name
    /// is "Flights" still counts.
    #[serde(default = "default_health_exclusions")]
    pub health_exclusions: BTreeSet<String>,

    /// Categories never treated as spending or income (card payments, transfers)
    #[serde(default = "default_untracked_exclusions")]
    pub untracked_exclusions: BTreeSet<String>,

    /// Envelopes whose allocation carries forward until changed
    #[serde(default = "default_recurring_envelopes")]
    pub recurring_envelopes: BTreeSet<String>,

    /// Envelopes tracked with spend-pace projection
    #[serde(default = "default_variable_envelopes")]
    pub variable_envelopes: BTreeSet<String>,

    /// Also open envelopes for spending categories that were never budgeted
    #[serde(default)]
    pub track_unbudgeted: bool,
}

fn set_of(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn default_budget_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 1).unwrap_or(NaiveDate::MIN)
}

fn default_expected_monthly_income() -> Money {
    Money::from_cents(524500)
}

fn default_income_tolerance() -> Money {
    Money::from_cents(5)
}

fn default_income_categories() -> BTreeSet<String> {
    set_of(&["Wages"])
}

fn default_health_exclusions() -> BTreeSet<String> {
    set_of(&["Travel", "Other", "General", "Car services"])
}

fn default_untracked_exclusions() -> BTreeSet<String> {
    set_of(&["Credit card payments", "Transfers"])
}

fn default_recurring_envelopes() -> BTreeSet<String> {
    set_of(&[
        "Rent",
        "Music & audio",
        "Home insurance",
        "Auto insurance",
        "Medical",
        "Student loan payments",
        "Investment transfers",
        "Other entertainment",
        "Fitness",
        "Games",
        "Phone & internet",
        "Other travel",
        "Emergency fund",
        "Car services",
    ])
}

fn default_variable_envelopes() -> BTreeSet<String> {
    set_of(&[
        "Restaurants & bars",
        "Groceries",
        "Clothing & accessories",
        "Events & recreation",
        "Gas & EV charging",
        "Coffee shops",
        "Other food & drink",
        "Personal care",
        "Retail",
        "Pet supplies",
    ])
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            budget_start_date: default_budget_start_date(),
            expected_monthly_income: default_expected_monthly_income(),
            income_tolerance: default_income_tolerance(),
            income_categories: default_income_categories(),
            health_exclusions: default_health_exclusions(),
            untracked_exclusions: default_untracked_exclusions(),
            recurring_envelopes: default_recurring_envelopes(),
            variable_envelopes: default_variable_envelopes(),
            track_unbudgeted: false,
        }
    }
}

impl BudgetConfig {
    /// A config with empty category sets, useful as a base for tests and builders
    pub fn empty(budget_start_date: NaiveDate, expected_monthly_income: Money) -> Self {
        Self {
            budget_start_date,
            expected_monthly_income,
            income_tolerance: default_income_tolerance(),
            income_categories: BTreeSet::new(),
            health_exclusions: BTreeSet::new(),
            untracked_exclusions: BTreeSet::new(),
            recurring_envelopes: BTreeSet::new(),
            variable_envelopes: BTreeSet::new(),
            track_unbudgeted: false,
        }
    }

    /// Builder-style: mark envelopes as recurring
    pub fn with_recurring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recurring_envelopes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builder-style: mark envelopes as variable
    pub fn with_variable<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variable_envelopes.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builder-style: exclude envelopes from Operating Margin
    pub fn with_health_exclusions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.health_exclusions.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builder-style: set the wage categories
    pub fn with_income_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.income_categories.extend(names.into_iter().map(Into::into));
        self
    }

    /// Builder-style: set the untracked categories
    pub fn with_untracked<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.untracked_exclusions.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_recurring(&self, category: &str) -> bool {
        self.recurring_envelopes.contains(category)
    }

    pub fn is_variable(&self, category: &str) -> bool {
        self.variable_envelopes.contains(category)
    }

    pub fn is_health_excluded(&self, category: &str) -> bool {
        self.health_exclusions.contains(category)
    }

    /// Check whether a transaction belongs to an untracked category
    pub fn is_untracked(&self, txn: &Transaction) -> bool {
        txn.matches_any(&self.untracked_exclusions)
    }

    /// Check whether a transaction is a wage deposit
    ///
    /// The detailed category is checked first, then the primary category. An
    /// empty income set treats every inflow as wages.
    pub fn is_wage(&self, txn: &Transaction) -> bool {
        if !txn.is_inflow() {
            return false;
        }
        if self.income_categories.is_empty() {
            return true;
        }
        self.income_categories.contains(&txn.detailed_category)
            || self.income_categories.contains(&txn.primary_category)
    }

    /// Check whether a transaction falls inside the budget window
    pub fn in_budget_window(&self, txn: &Transaction) -> bool {
        txn.date >= self.budget_start_date
    }
}
