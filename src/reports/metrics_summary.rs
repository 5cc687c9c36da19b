//! Metrics Summary Report
//!
//! Terminal rendering of one month's computed metrics: income progress,
//! budget health, cash position, uncategorized spend, and the pace of
//! variable envelopes.

use crate::display::{double_separator, format_bar, format_percentage, separator, truncate};
use crate::metrics::{
    IncomeStatus, MonthKind, MonthMetrics, PaceStatus, UnassignedCash, VariableProjection,
};
use crate::models::Money;

/// Metrics for one month, ready to print
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub metrics: MonthMetrics,
    currency_symbol: String,
}

impl MetricsReport {
    pub fn new(metrics: MonthMetrics) -> Self {
        Self {
            metrics,
            currency_symbol: "$".to_string(),
        }
    }

    /// Render amounts with a different currency symbol
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
        let m = &self.metrics;
        let mut output = String::new();

        let kind = match m.kind {
            MonthKind::Past => "past",
            MonthKind::Current => "current",
            MonthKind::Planning => "planning",
        };
        output.push_str(&format!("Budget Metrics - {} [{}]\n", m.month.label(), kind));
        output.push_str(&double_separator(width));
        output.push_str("\n\n");

        self.write_income(&mut output);
        self.write_health(&mut output);
        self.write_cash(&mut output);
        self.write_uncategorized(&mut output, width);
        self.write_variable(&mut output, width);

        output
    }

    fn write_income(&self, output: &mut String) {
        let income = &self.metrics.income;
        let status = match income.status {
            IncomeStatus::Pending => "pending",
            IncomeStatus::WithinBuffer => "received (within buffer)",
            IncomeStatus::FullyReceived => "fully received",
        };

        output.push_str("INCOME\n");
        output.push_str(&format!("  {:<28} {:>14}\n", "Wages:", self.money(income.wages)));
        output.push_str(&format!("  {:<28} {:>14}\n", "Expected:", self.money(income.expected)));
        if let Some(pct) = income.percent_received {
            output.push_str(&format!(
                "  {:<28} {:>14}  {}\n",
                "Received:",
                format_percentage(pct as f64),
                format_bar(pct as f64, 100.0, 20)
            ));
        }
        output.push_str(&format!("  {:<28} {:>14}\n", "Remaining:", self.money(income.remaining)));
        output.push_str(&format!("  {:<28} {:>14}\n", "Status:", status));
        if !income.other_income.is_zero() {
            output.push_str(&format!(
                "  {:<28} {:>14}\n",
                "Other income:",
                self.money(income.other_income)
            ));
        }
        output.push('\n');
    }

    fn write_health(&self, output: &mut String) {
        let health = &self.metrics.health;

        output.push_str("HEALTH\n");
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Operating margin:",
            self.money(health.operating_margin)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Deployed capital:",
            self.money(health.deployed_capital)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Needs attention:",
            self.money(health.needs_attention)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Total enveloped:",
            self.money(health.total_enveloped)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "New funding:",
            self.money(health.new_funding)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Rollover into month:",
            self.money(health.rollover_into_month)
        ));
        output.push_str(&format!(
            "  {:<28} {:>14}\n",
            "Spent:",
            self.money(health.total_spent)
        ));
        output.push('\n');
    }

    fn write_cash(&self, output: &mut String) {
        let m = &self.metrics;
        output.push_str("CASH\n");

        match &m.unassigned_cash {
            Some(UnassignedCash::Actual {
                amount,
                snapshot_month,
                bank_balance,
                ..
            }) => {
                output.push_str(&format!(
                    "  {:<28} {:>14}\n",
                    "Bank balance:",
                    self.money(*bank_balance)
                ));
                output.push_str(&format!(
                    "  {:<28} {:>14}  (snapshot {})\n",
                    "Unassigned cash:",
                    self.money(*amount),
                    snapshot_month
                ));
            }
            Some(UnassignedCash::Unavailable) => {
                output.push_str("  Unassigned cash: no balance snapshot on file\n");
            }
            None => {}
        }

        if let Some(projected) = &m.projected_cash {
            let label = if projected.estimated {
                "Projected cash (est.):"
            } else {
                "Projected cash:"
            };
            output.push_str(&format!("  {:<28} {:>14}\n", label, self.money(projected.amount)));
        }
        if let Some(surplus) = m.unallocated_surplus {
            output.push_str(&format!(
                "  {:<28} {:>14}\n",
                "Unallocated surplus:",
                self.money(surplus)
            ));
        }
        output.push('\n');
    }

    fn write_uncategorized(&self, output: &mut String, width: usize) {
        let uncategorized = &self.metrics.uncategorized;
        if uncategorized.is_empty() {
            return;
        }

        output.push_str(&format!(
            "UNCATEGORIZED SPEND ({} transactions)\n",
            uncategorized.transactions.len()
        ));
        for row in &uncategorized.by_category {
            output.push_str(&format!(
                "  {:<28} {:>14}\n",
                truncate(&row.category, 28),
                self.money(row.amount)
            ));
        }
        output.push_str(&format!("  {}\n", separator(width - 2)));
        output.push_str(&format!(
            "  {:<28} {:>14}\n\n",
            "Total:",
            self.money(uncategorized.total)
        ));
    }

    fn write_variable(&self, output: &mut String, width: usize) {
        let variable = &self.metrics.variable;
        if variable.is_empty() {
            return;
        }

        let progress = variable[0].month_progress_pct;
        output.push_str(&format!(
            "VARIABLE ENVELOPES (month {} elapsed)\n",
            format_percentage(progress as f64)
        ));
        output.push_str(&format!(
            "  {:<20} {:>11} {:>11} {:>12}  {:<12} {}\n",
            "Envelope", "Spent", "Allocated", "Projected", "Used", "Pace"
        ));
        output.push_str(&format!("  {}\n", separator(width - 2)));

        for projection in variable {
            output.push_str(&self.variable_row(projection));
        }
    }

    fn variable_row(&self, p: &VariableProjection) -> String {
        let used = match p.spent_pct {
            Some(pct) => format_bar(pct as f64, 100.0, 10),
            None => "-".to_string(),
        };
        let pace = match p.pace {
            PaceStatus::OnTrack => "on track",
            PaceStatus::AheadOfPace => "ahead of pace",
            PaceStatus::OverPace => "OVER PACE",
            PaceStatus::Unfunded => "unfunded",
        };

        format!(
            "  {:<20} {:>11} {:>11} {:>12}  {:<12} {}\n",
            truncate(&p.category, 20),
            self.money(p.spent),
            self.money(p.allocated),
            self.money(p.projected_spend),
            used,
            pace
        )
    }
}
