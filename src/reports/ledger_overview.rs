//! Ledger Overview Report
//!
//! One month of the envelope ledger grouped by primary category, with the
//! month-over-month change and a balance trend for each envelope.

use std::io::Write;

use crate::display::{double_separator, format_delta, separator, sparkline, truncate};
use crate::error::{TriageError, TriageResult};
use crate::ledger::Ledger;
use crate::models::{EnvelopeMonthState, Money, Month};

/// A row in the report for a single envelope
#[derive(Debug, Clone)]
pub struct EnvelopeReportRow {
    pub state: EnvelopeMonthState,
    /// Available balance in the previous month
    pub prev_available: Option<Money>,
    /// Available balance per month up to and including this one
    pub trend: Vec<Money>,
}

impl EnvelopeReportRow {
    pub fn is_overspent(&self) -> bool {
        self.state.is_overspent()
    }

    pub fn delta(&self) -> Option<Money> {
        self.prev_available
            .map(|prev| self.state.available_balance - prev)
    }
}

/// Envelopes sharing a primary category, with totals
#[derive(Debug, Clone)]
pub struct GroupReportRow {
    pub group_name: String,
    pub envelopes: Vec<EnvelopeReportRow>,
    pub total_allocated: Money,
    pub total_spent: Money,
    pub total_available: Money,
}

impl GroupReportRow {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            envelopes: Vec::new(),
            total_allocated: Money::zero(),
            total_spent: Money::zero(),
            total_available: Money::zero(),
        }
    }

    pub fn add_envelope(&mut self, row: EnvelopeReportRow) {
        self.total_allocated += row.state.allocated_new;
        self.total_spent += row.state.spent;
        self.total_available += row.state.available_balance;
        self.envelopes.push(row);
    }
}

/// Ledger overview for one month
#[derive(Debug, Clone)]
pub struct LedgerOverviewReport {
    pub month: Month,
    pub groups: Vec<GroupReportRow>,
    pub grand_total_rollover: Money,
    pub grand_total_allocated: Money,
    pub grand_total_spent: Money,
    pub grand_total_available: Money,
    currency_symbol: String,
}

impl LedgerOverviewReport {
    /// Generate the report for one month of a built ledger
    pub fn generate(ledger: &Ledger, month: Month) -> TriageResult<Self> {
        let slice = ledger.require_slice(month)?;

        let groups = slice
            .grouped()
            .into_iter()
            .map(|(name, states)| {
                let mut group = GroupReportRow::new(name);
                for state in states {
                    let trend = ledger
                        .history(&state.category)
                        .into_iter()
                        .take_while(|(m, _)| *m <= month)
                        .map(|(_, available)| available)
                        .collect();
                    group.add_envelope(EnvelopeReportRow {
                        state: state.clone(),
                        prev_available: ledger.previous_available(month, &state.category),
                        trend,
                    });
                }
                group
            })
            .collect();

        Ok(Self {
            month,
            groups,
            grand_total_rollover: slice.total_rollover(),
            grand_total_allocated: slice.total_allocated(),
            grand_total_spent: slice.total_spent(),
            grand_total_available: slice.total_available(),
            currency_symbol: "$".to_string(),
        })
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
        let width = 104;
        let mut output = String::new();

        output.push_str(&format!("Envelope Ledger - {} ({})\n", self.month.label(), self.month));
        output.push_str(&double_separator(width));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:>11} {:>11} {:>11} {:>11} {:>12} {:>11}  {}\n",
            "Envelope", "Rollover", "Allocated", "Transfers", "Spent", "Available", "Change", "Trend"
        ));
        output.push_str(&separator(width));
        output.push('\n');

        for group in &self.groups {
            output.push_str(&format!("\n{}\n", group.group_name.to_uppercase()));

            for row in &group.envelopes {
                let state = &row.state;
                let mut name = truncate(&state.category, 20);
                if state.is_recurring {
                    name.push_str(" ↻");
                }
                let available = if row.is_overspent() {
                    format!("{} *", self.money(state.available_balance))
                } else {
                    self.money(state.available_balance)
                };
                let change = row
                    .delta()
                    .map(|d| format_delta(d, &self.currency_symbol))
                    .unwrap_or_else(|| "new".to_string());

                output.push_str(&format!(
                    "  {:<22} {:>11} {:>11} {:>11} {:>11} {:>12} {:>11}  {}\n",
                    name,
                    self.money(state.rollover_in),
                    self.money(state.allocated_new),
                    format_delta(state.net_transfers(), &self.currency_symbol),
                    self.money(state.spent),
                    available,
                    change,
                    sparkline(&row.trend),
                ));
            }

            output.push_str(&format!(
                "  {:<22} {:>11} {:>11} {:>11} {:>11} {:>12}\n",
                "Group Total:",
                "",
                self.money(group.total_allocated),
                "",
                self.money(group.total_spent),
                self.money(group.total_available),
            ));
        }

        output.push_str(&separator(width));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>11} {:>11} {:>11} {:>11} {:>12}\n",
            "GRAND TOTAL",
            self.money(self.grand_total_rollover),
            self.money(self.grand_total_allocated),
            "",
            self.money(self.grand_total_spent),
            self.money(self.grand_total_available),
        ));

        output.push_str("\n* = Overspent   ↻ = Recurring\n");

        output
    }

    /// Export the month as `Envelope,Spent,Budgeted,Available` CSV with group headings
    pub fn export_csv<W: Write>(&self, writer: W) -> TriageResult<()> {
        let mut csv_writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);

        let export_err = |e: csv::Error| TriageError::Export(e.to_string());

        csv_writer
            .write_record(["Envelope", "Spent", "Budgeted", "Available"])
            .map_err(export_err)?;
        for group in &self.groups {
            let heading = format!("-- {} --", group.group_name);
            csv_writer
                .write_record([heading.as_str(), "", "", ""])
                .map_err(export_err)?;
            for row in &group.envelopes {
                csv_writer
                    .write_record([
                        row.state.category.clone(),
                        row.state.spent.to_decimal_string(),
                        row.state.total_budgeted().to_decimal_string(),
                        row.state.available_balance.to_decimal_string(),
                    ])
                    .map_err(export_err)?;
            }
        }

        csv_writer
            .flush()
            .map_err(|e| TriageError::Export(e.to_string()))?;
        Ok(())
    }

    pub fn overspent_count(&self) -> usize {
        self.groups
            .iter()
            .flat_map(|g| &g.envelopes)
            .filter(|r| r.is_overspent())
            .count()
    }
}
