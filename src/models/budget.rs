//! Budget input records
//!
//! Allocations, transfers, and balance snapshots: the user-maintained inputs
//! that, together with transactions, determine the envelope ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;
use super::month::Month;

/// Note attached to transfers generated by smart rebalance
pub const SMART_REBALANCE_NOTE: &str = "smart rebalance";

/// An explicit budget amount for a category in a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// The month this allocation funds
    pub month: Month,

    /// Envelope name
    pub category: String,

    /// New funding for the envelope this month
    pub amount: Money,
}

impl Allocation {
    /// Create a new allocation
    pub fn new(month: Month, category: impl Into<String>, amount: Money) -> Self {
        Self {
            month,
            category: category.into(),
            amount,
        }
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.month, self.category, self.amount)
    }
}

/// A reallocation of funds between two envelopes within one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Month the transfer applies to
    pub month: Month,

    /// Envelope giving up funds
    pub from_category: String,

    /// Envelope receiving funds
    pub to_category: String,

    /// Amount moved (always positive)
    pub amount: Money,

    /// Free-form note
    #[serde(default)]
    pub note: String,
}

impl Transfer {
    /// Create a new transfer
    pub fn new(
        month: Month,
        from_category: impl Into<String>,
        to_category: impl Into<String>,
        amount: Money,
        note: impl Into<String>,
    ) -> Self {
        Self {
            month,
            from_category: from_category.into(),
            to_category: to_category.into(),
            amount,
            note: note.into(),
        }
    }

    /// Validate the transfer
    pub fn validate(&self) -> Result<(), TransferValidationError> {
        if !self.amount.is_positive() {
            return Err(TransferValidationError::NonPositiveAmount(self.amount));
        }

        if self.from_category == self.to_category {
            return Err(TransferValidationError::SameEnvelope(self.from_category.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Transfer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} {}",
            self.month, self.from_category, self.to_category, self.amount
        )
    }
}

/// The real external balance entering a month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Month whose opening balance this is
    pub month: Month,

    /// Balance as of the first day of the month
    pub balance: Money,
}

impl BalanceSnapshot {
    /// Create a new snapshot
    pub fn new(month: Month, balance: Money) -> Self {
        Self { month, balance }
    }
}

/// Validation errors for transfers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferValidationError {
    NonPositiveAmount(Money),
    SameEnvelope(String),
}

impl fmt::Display for TransferValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transfer amount must be positive, got {}", amount)
            }
            Self::SameEnvelope(name) => {
                write!(f, "Transfer source and destination are both '{}'", name)
            }
        }
    }
}

impl std::error::Error for TransferValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn feb() -> Month {
        Month::new(2025, 2).unwrap()
    }

    #[test]
    fn test_transfer_validation() {
        let ok = Transfer::new(feb(), "Dining", "Groceries", Money::from_cents(2500), "");
        assert!(ok.validate().is_ok());

        let zero = Transfer::new(feb(), "Dining", "Groceries", Money::zero(), "");
        assert_eq!(
            zero.validate(),
            Err(TransferValidationError::NonPositiveAmount(Money::zero()))
        );

        let same = Transfer::new(feb(), "Dining", "Dining", Money::from_cents(100), "");
        assert!(matches!(
            same.validate(),
            Err(TransferValidationError::SameEnvelope(_))
        ));
    }

    #[test]
    fn test_allocation_display() {
        let a = Allocation::new(feb(), "Rent", Money::from_cents(165000));
        assert_eq!(a.to_string(), "2025-02 Rent: $1650.00");
    }
}
