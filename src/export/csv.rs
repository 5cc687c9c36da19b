//! CSV Export functionality
//!
//! Exports every ledger row, and transfer queues in the same layout
//! `transfers.csv` is read from.

use std::io::Write;

use serde::Serialize;

use crate::error::{TriageError, TriageResult};
use crate::ledger::Ledger;
use crate::models::Transfer;

#[derive(Serialize)]
struct LedgerRecord<'a> {
    month: String,
    category: &'a str,
    primary_category: &'a str,
    rollover_in: String,
    allocated_new: String,
    transfers_in: String,
    transfers_out: String,
    spent: String,
    available_balance: String,
    recurring: bool,
    variable: bool,
}

#[derive(Serialize)]
struct TransferRecord<'a> {
    month: String,
    from_category: &'a str,
    to_category: &'a str,
    amount: String,
    note: &'a str,
}

fn export_err(e: csv::Error) -> TriageError {
    TriageError::Export(e.to_string())
}

/// Export every envelope-month row of the ledger, oldest month first
pub fn export_ledger_csv<W: Write>(ledger: &Ledger, writer: &mut W) -> TriageResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for state in ledger.rows() {
        csv_writer
            .serialize(LedgerRecord {
                month: state.month.to_string(),
                category: &state.category,
                primary_category: &state.primary_category,
                rollover_in: state.rollover_in.to_decimal_string(),
                allocated_new: state.allocated_new.to_decimal_string(),
                transfers_in: state.transfers_in.to_decimal_string(),
                transfers_out: state.transfers_out.to_decimal_string(),
                spent: state.spent.to_decimal_string(),
                available_balance: state.available_balance.to_decimal_string(),
                recurring: state.is_recurring,
                variable: state.is_variable,
            })
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| TriageError::Export(e.to_string()))?;
    Ok(())
}

/// Export transfers as `month,from_category,to_category,amount,note`
pub fn export_transfers_csv<W: Write>(transfers: &[Transfer], writer: &mut W) -> TriageResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    if transfers.is_empty() {
        // serialize() only emits headers alongside the first record
        csv_writer
            .write_record(["month", "from_category", "to_category", "amount", "note"])
            .map_err(export_err)?;
    }

    for transfer in transfers {
        csv_writer
            .serialize(TransferRecord {
                month: transfer.month.to_string(),
                from_category: &transfer.from_category,
                to_category: &transfer.to_category,
                amount: transfer.amount.to_decimal_string(),
                note: &transfer.note,
            })
            .map_err(export_err)?;
    }

    csv_writer
        .flush()
        .map_err(|e| TriageError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BudgetConfig;
    use crate::import::read_transfers;
    use crate::ledger::LedgerInputs;
    use crate::models::{Allocation, Money, Month, Transaction};
    use chrono::NaiveDate;

    fn m(mo: u32) -> Month {
        Month::new(2025, mo).unwrap()
    }

    #[test]
    fn test_ledger_csv() {
        let d = |mo, day| NaiveDate::from_ymd_opt(2025, mo, day).unwrap();
        let inputs = LedgerInputs {
            transactions: vec![Transaction::posted(
                d(2, 5),
                Money::from_cents(-4520),
                "MARKET",
                "Groceries",
                "Food and drink",
            )],
            allocations: vec![
                Allocation::new(m(2), "Groceries", Money::from_cents(32000)),
                Allocation::new(m(2), "Rent", Money::from_cents(165000)),
            ],
            ..Default::default()
        };
        let config = BudgetConfig::empty(d(1, 1), Money::zero()).with_recurring(["Rent"]);
        let ledger = Ledger::build(&inputs, &config, None).unwrap();

        let mut buffer = Vec::new();
        export_ledger_csv(&ledger, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("month,category,primary_category,rollover_in,allocated_new,transfers_in,transfers_out,spent,available_balance,recurring,variable")
        );
        assert_eq!(
            lines.next(),
            Some("2025-02,Groceries,Food and drink,0.00,320.00,0.00,0.00,45.20,274.80,false,false")
        );
        assert_eq!(
            lines.next(),
            Some("2025-02,Rent,General,0.00,1650.00,0.00,0.00,0.00,1650.00,true,false")
        );
    }

    #[test]
    fn test_transfers_csv_reads_back() {
        let transfers = vec![
            Transfer::new(m(3), "Savings", "Dining", Money::from_cents(2500), "smart rebalance"),
            Transfer::new(m(3), "Gifts", "Travel, abroad", Money::from_cents(1000), ""),
        ];

        let mut buffer = Vec::new();
        export_transfers_csv(&transfers, &mut buffer).unwrap();
        let csv = String::from_utf8(buffer.clone()).unwrap();
        assert!(csv.starts_with("month,from_category,to_category,amount,note"));
        assert!(csv.contains("\"Travel, abroad\""));

        let read = read_transfers(buffer.as_slice(), "transfers.csv").unwrap();
        assert_eq!(read, transfers);
    }

    #[test]
    fn test_empty_transfers_still_has_header() {
        let mut buffer = Vec::new();
        export_transfers_csv(&[], &mut buffer).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap().trim_end(),
            "month,from_category,to_category,amount,note"
        );
    }
}
