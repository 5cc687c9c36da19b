//! Transaction model
//!
//! A bank transaction as delivered by ingestion: dated, signed, categorized
//! with the bank's detailed and primary categories.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// Status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Authorized but not yet posted
    #[default]
    Pending,
    /// Posted to the account
    Posted,
}

impl TransactionStatus {
    /// Parse the status column of a bank export (case-insensitive)
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("posted") {
            Self::Posted
        } else {
            Self::Pending
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Posted => write!(f, "Posted"),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Effective date (posted date, or authorized date when not yet posted)
    pub date: NaiveDate,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,

    /// Transaction status
    #[serde(default)]
    pub status: TransactionStatus,

    /// Bank description
    #[serde(default)]
    pub description: String,

    /// Fine-grained category; matched exactly against envelope names
    #[serde(default)]
    pub detailed_category: String,

    /// Coarse category grouping
    #[serde(default)]
    pub primary_category: String,
}

impl Transaction {
    /// Create a posted transaction
    pub fn posted(
        date: NaiveDate,
        amount: Money,
        description: impl Into<String>,
        detailed_category: impl Into<String>,
        primary_category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            status: TransactionStatus::Posted,
            description: description.into(),
            detailed_category: detailed_category.into(),
            primary_category: primary_category.into(),
        }
    }

    /// Pick the effective date: posted date, falling back to authorized date
    pub fn resolve_date(posted: Option<NaiveDate>, authorized: Option<NaiveDate>) -> Option<NaiveDate> {
        posted.or(authorized)
    }

    /// Check if the transaction has posted
    pub fn is_posted(&self) -> bool {
        self.status == TransactionStatus::Posted
    }

    /// Check if this is an inflow (positive amount)
    pub fn is_inflow(&self) -> bool {
        self.amount.is_positive()
    }

    /// Check if this is an outflow (negative amount)
    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }

    /// Magnitude of the outflow, zero for inflows
    pub fn outflow(&self) -> Money {
        self.amount.negative_part()
    }

    /// The month the transaction falls in
    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }

    /// Check whether either category is a member of `names`
    pub fn matches_any<'a, I>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        names
            .into_iter()
            .any(|n| *n == self.detailed_category || *n == self.primary_category)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{}]",
            self.date, self.description, self.amount, self.detailed_category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(TransactionStatus::parse("Posted"), TransactionStatus::Posted);
        assert_eq!(TransactionStatus::parse(" posted "), TransactionStatus::Posted);
        assert_eq!(TransactionStatus::parse("Pending"), TransactionStatus::Pending);
        assert_eq!(TransactionStatus::parse(""), TransactionStatus::Pending);
    }

    #[test]
    fn test_resolve_date() {
        let posted = date(2025, 2, 6);
        let authorized = date(2025, 2, 5);
        assert_eq!(
            Transaction::resolve_date(Some(posted), Some(authorized)),
            Some(posted)
        );
        assert_eq!(Transaction::resolve_date(None, Some(authorized)), Some(authorized));
        assert_eq!(Transaction::resolve_date(None, None), None);
    }

    #[test]
    fn test_flow_helpers() {
        let spend = Transaction::posted(
            date(2025, 2, 5),
            Money::from_cents(-4520),
            "Market",
            "Groceries",
            "Food and drink",
        );
        assert!(spend.is_outflow());
        assert_eq!(spend.outflow(), Money::from_cents(4520));
        assert_eq!(spend.month(), Month::new(2025, 2).unwrap());

        let pay = Transaction::posted(date(2025, 2, 10), Money::from_cents(240000), "Payroll", "Wages", "Income");
        assert!(pay.is_inflow());
        assert_eq!(pay.outflow(), Money::zero());
    }

    #[test]
    fn test_matches_any_checks_both_categories() {
        let txn = Transaction::posted(
            date(2025, 2, 1),
            Money::from_cents(-10000),
            "Card payment",
            "Credit card payments",
            "Loan payments",
        );
        let detailed = vec!["Credit card payments".to_string()];
        let primary = vec!["Loan payments".to_string()];
        let neither = vec!["Transfers".to_string()];
        assert!(txn.matches_any(&detailed));
        assert!(txn.matches_any(&primary));
        assert!(!txn.matches_any(&neither));
    }
}
