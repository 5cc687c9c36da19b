//! Rebalance and What-If Reports
//!
//! Renders a Smart Rebalance proposal, and a before/after comparison of a
//! month with a queue of hypothetical transfers applied.

use crate::display::{double_separator, format_delta, separator, truncate};
use crate::ledger::LedgerSlice;
use crate::models::Money;
use crate::rebalance::RebalanceProposal;
use crate::whatif::WhatIfSlice;

/// A rebalance proposal, ready to print
#[derive(Debug, Clone)]
pub struct RebalanceReport {
    pub proposal: RebalanceProposal,
    currency_symbol: String,
}

impl RebalanceReport {
    pub fn new(proposal: RebalanceProposal) -> Self {
        Self {
            proposal,
            currency_symbol: "$".to_string(),
        }
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let width = 72;
        let p = &self.proposal;
        let mut output = String::new();

        output.push_str(&format!("Smart Rebalance - {}\n", p.month.label()));
        output.push_str(&double_separator(width));
        output.push('\n');

        if p.is_empty() && p.is_complete() {
            output.push_str("No overspent envelopes. Nothing to rebalance.\n");
            return output;
        }

        if !p.is_empty() {
            output.push_str(&format!("{:<24} {:<24} {:>14}\n", "From", "To", "Amount"));
            output.push_str(&separator(width));
            output.push('\n');
            for transfer in &p.transfers {
                output.push_str(&format!(
                    "{:<24} {:<24} {:>14}\n",
                    truncate(&transfer.from_category, 24),
                    truncate(&transfer.to_category, 24),
                    self.money(transfer.amount)
                ));
            }
            output.push_str(&separator(width));
            output.push('\n');
            output.push_str(&format!(
                "{:<49} {:>14}\n",
                format!("{} transfer(s), total moved:", p.transfers.len()),
                self.money(p.total_moved())
            ));
        }

        if !p.is_complete() {
            output.push_str("\nStill uncovered:\n");
            for deficit in &p.uncovered {
                output.push_str(&format!(
                    "  {:<46} {:>14}\n",
                    truncate(&deficit.category, 46),
                    self.money(deficit.remaining)
                ));
            }
        }

        output.push_str(&format!(
            "\nSurplus remaining: {}\n",
            self.money(p.surplus_remaining)
        ));

        output
    }
}

/// A month before and after a what-if overlay
#[derive(Debug, Clone)]
pub struct WhatIfReport<'a> {
    pub before: &'a LedgerSlice,
    pub after: &'a WhatIfSlice,
    currency_symbol: String,
}

impl<'a> WhatIfReport<'a> {
    pub fn new(before: &'a LedgerSlice, after: &'a WhatIfSlice) -> Self {
        Self {
            before,
            after,
            currency_symbol: "$".to_string(),
        }
    }

    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Only envelopes touched by the overlay are listed
    pub fn format_terminal(&self) -> String {
        let width = 72;
        let sym = &self.currency_symbol;
        let mut output = String::new();

        output.push_str(&format!("What-If - {}\n", self.before.month.label()));
        output.push_str(&double_separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{} transfer(s) applied, {} ignored (other months)\n\n",
            self.after.applied, self.after.ignored
        ));

        if self.after.deltas.is_empty() {
            output.push_str("No envelopes changed.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<28} {:>13} {:>13} {:>13}\n",
            "Envelope", "Before", "After", "Change"
        ));
        output.push_str(&separator(width));
        output.push('\n');

        for (category, delta) in &self.after.deltas {
            let before = self
                .before
                .get(category)
                .map(|e| e.available_balance)
                .unwrap_or_default();
            let after = self
                .after
                .slice
                .get(category)
                .map(|e| e.available_balance)
                .unwrap_or_default();
            let flag = if after.is_negative() { " *" } else { "" };

            output.push_str(&format!(
                "{:<28} {:>13} {:>13} {:>13}{}\n",
                truncate(category, 28),
                before.format_with_symbol(sym),
                after.format_with_symbol(sym),
                format_delta(*delta, sym),
                flag
            ));
        }

        output.push_str(&separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:<28} {:>13} {:>13}\n",
            "Total available:",
            self.before.total_available().format_with_symbol(sym),
            self.after.slice.total_available().format_with_symbol(sym)
        ));

        output
    }
}
