//! CSV ingestion
//!
//! Reads the four input files (bank transactions, allocations, transfers,
//! balance snapshots) into a [`LedgerInputs`]. Headers and fields are trimmed.
//! A missing file yields an empty record set; a malformed row is an error
//! naming the file and the 1-based line number.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::InputFiles;
use crate::error::{TriageError, TriageResult};
use crate::ledger::LedgerInputs;
use crate::models::{
    Allocation, BalanceSnapshot, Money, Month, Transaction, TransactionStatus, Transfer,
};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%m-%d-%Y"];

/// Locations of the four CSV inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSources {
    pub transactions: PathBuf,
    pub allocations: PathBuf,
    pub transfers: PathBuf,
    pub balances: PathBuf,
}

impl CsvSources {
    /// Resolve the configured file names inside `dir`
    pub fn in_dir(dir: &Path, files: &InputFiles) -> Self {
        Self {
            transactions: dir.join(&files.transactions),
            allocations: dir.join(&files.allocations),
            transfers: dir.join(&files.transfers),
            balances: dir.join(&files.balances),
        }
    }

    /// Load every record set
    pub fn load(&self) -> TriageResult<LedgerInputs> {
        let inputs = LedgerInputs {
            transactions: load_file(&self.transactions, read_transactions)?,
            allocations: load_file(&self.allocations, read_allocations)?,
            transfers: load_file(&self.transfers, read_transfers)?,
            snapshots: load_file(&self.balances, read_balances)?,
        };

        info!(
            transactions = inputs.transactions.len(),
            allocations = inputs.allocations.len(),
            transfers = inputs.transfers.len(),
            snapshots = inputs.snapshots.len(),
            "loaded CSV inputs"
        );

        Ok(inputs)
    }
}

/// Read one file, returning an empty set when it does not exist
pub fn load_file<T>(
    path: &Path,
    read: fn(File, &str) -> TriageResult<Vec<T>>,
) -> TriageResult<Vec<T>> {
    if !path.exists() {
        debug!(path = %path.display(), "input file missing, using empty record set");
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| TriageError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    let source = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    read(file, &source)
}

#[derive(Debug, Deserialize)]
struct TransactionRow {
    #[serde(rename = "Posted Date", default)]
    posted_date: Option<String>,
    #[serde(rename = "Authorized Date", default)]
    authorized_date: Option<String>,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Status", default)]
    status: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Detailed Category", default)]
    detailed_category: String,
    #[serde(rename = "Primary Category", default)]
    primary_category: String,
}

#[derive(Debug, Deserialize)]
struct AllocationRow {
    month: String,
    category: String,
    allocated: String,
}

#[derive(Debug, Deserialize)]
struct TransferRow {
    month: String,
    from_category: String,
    to_category: String,
    amount: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BalanceRow {
    month: String,
    balance: String,
}

/// Read bank transactions, keeping only posted rows
pub fn read_transactions<R: Read>(reader: R, source: &str) -> TriageResult<Vec<Transaction>> {
    let mut skipped = 0usize;
    let mut transactions = Vec::new();

    for (line, row) in rows::<TransactionRow, R>(reader, source)? {
        let status = TransactionStatus::parse(&row.status);
        if status != TransactionStatus::Posted {
            skipped += 1;
            continue;
        }

        let posted = optional_date(row.posted_date.as_deref(), source, line)?;
        let authorized = optional_date(row.authorized_date.as_deref(), source, line)?;
        let date = Transaction::resolve_date(posted, authorized)
            .ok_or_else(|| row_error(source, line, "missing posted and authorized date"))?;

        transactions.push(Transaction {
            date,
            amount: parse_money(&row.amount, source, line)?,
            status,
            description: row.description,
            detailed_category: row.detailed_category,
            primary_category: row.primary_category,
        });
    }

    debug!(source, kept = transactions.len(), skipped, "read transactions");
    Ok(transactions)
}

/// Read `month,category,allocated` rows
pub fn read_allocations<R: Read>(reader: R, source: &str) -> TriageResult<Vec<Allocation>> {
    rows::<AllocationRow, R>(reader, source)?
        .into_iter()
        .map(|(line, row)| {
            Ok(Allocation::new(
                parse_month(&row.month, source, line)?,
                required(row.category, "category", source, line)?,
                parse_money(&row.allocated, source, line)?,
            ))
        })
        .collect()
}

/// Read `month,from_category,to_category,amount,note` rows
pub fn read_transfers<R: Read>(reader: R, source: &str) -> TriageResult<Vec<Transfer>> {
    rows::<TransferRow, R>(reader, source)?
        .into_iter()
        .map(|(line, row)| {
            Ok(Transfer::new(
                parse_month(&row.month, source, line)?,
                required(row.from_category, "from_category", source, line)?,
                required(row.to_category, "to_category", source, line)?,
                parse_money(&row.amount, source, line)?,
                row.note.unwrap_or_default(),
            ))
        })
        .collect()
}

/// Read `month,balance` rows
pub fn read_balances<R: Read>(reader: R, source: &str) -> TriageResult<Vec<BalanceSnapshot>> {
    rows::<BalanceRow, R>(reader, source)?
        .into_iter()
        .map(|(line, row)| {
            Ok(BalanceSnapshot::new(
                parse_month(&row.month, source, line)?,
                parse_money(&row.balance, source, line)?,
            ))
        })
        .collect()
}

/// Parse a bank-export date
///
/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY` and a few common variants, and the
/// leading ISO date of a timestamp such as `2025-11-03T08:15:00`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }

    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Deserialize every row, pairing it with its 1-based line number
fn rows<T, R>(reader: R, source: &str) -> TriageResult<Vec<(usize, T)>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut out = Vec::new();
    for (idx, result) in csv_reader.deserialize::<T>().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let row = result.map_err(|e| row_error(source, line, &e.to_string()))?;
        out.push((line, row));
    }
    Ok(out)
}

fn row_error(source: &str, line: usize, message: &str) -> TriageError {
    TriageError::Import(format!("{} row {}: {}", source, line, message))
}

fn optional_date(value: Option<&str>, source: &str, line: usize) -> TriageResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => parse_date(v)
            .map(Some)
            .ok_or_else(|| row_error(source, line, &format!("invalid date '{}'", v))),
    }
}

fn parse_money(value: &str, source: &str, line: usize) -> TriageResult<Money> {
    Money::parse(value).map_err(|e| row_error(source, line, &e.to_string()))
}

fn parse_month(value: &str, source: &str, line: usize) -> TriageResult<Month> {
    Month::parse(value).map_err(|e| row_error(source, line, &e.to_string()))
}

fn required(value: String, column: &str, source: &str, line: usize) -> TriageResult<String> {
    if value.is_empty() {
        Err(row_error(source, line, &format!("empty {}", column)))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    const TRX: &str = "\
 Posted Date ,Authorized Date,Amount,Status,Description,Detailed Category,Primary Category
2025-02-05,2025-02-04,-45.20,Posted,MARKET,Groceries,Food and drink
,02/09/2025,\"$2,400.00\",posted,PAYROLL,Wages,Income
2025-02-11,2025-02-10,-12.00,Pending,CAFE,Coffee shops,Food and drink
2025-02-12T09:30:00,,-8.5,POSTED,BUS,Public transit,Transportation
";

    #[test]
    fn test_read_transactions() {
        let txns = read_transactions(TRX.as_bytes(), "ALL_TRX.csv").unwrap();

        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].date, d(2025, 2, 5));
        assert_eq!(txns[0].amount.cents(), -4520);
        assert_eq!(txns[0].detailed_category, "Groceries");
        assert_eq!(txns[0].primary_category, "Food and drink");

        // Authorized date fallback and currency formatting
        assert_eq!(txns[1].date, d(2025, 2, 9));
        assert_eq!(txns[1].amount.cents(), 240000);

        assert_eq!(txns[2].date, d(2025, 2, 12));
        assert_eq!(txns[2].amount.cents(), -850);
        assert!(txns.iter().all(Transaction::is_posted));
    }

    #[test]
    fn test_malformed_amount_names_file_and_row() {
        let csv = "Posted Date,Amount,Status\n2025-02-05,-1.00,Posted\n2025-02-06,abc,Posted\n";
        let err = read_transactions(csv.as_bytes(), "ALL_TRX.csv").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ALL_TRX.csv row 3"), "{message}");
    }

    #[test]
    fn test_missing_dates_is_an_error() {
        let csv = "Posted Date,Authorized Date,Amount,Status\n,,-1.00,Posted\n";
        let err = read_transactions(csv.as_bytes(), "ALL_TRX.csv").unwrap_err();
        assert!(matches!(err, TriageError::Import(_)));
    }

    #[test]
    fn test_read_allocations_and_transfers() {
        let budgets = "month,category,allocated\n2025-02,Rent,1650\n2025-02,Groceries,320.00\n";
        let allocations = read_allocations(budgets.as_bytes(), "budgets.csv").unwrap();
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].amount.cents(), 165000);
        assert_eq!(allocations[1].month, Month::new(2025, 2).unwrap());

        let transfers_csv = "month,from_category,to_category,amount,note\n\
2025-02,\"Groceries\",\"Dining\",30.00,\"smart rebalance\"\n\
2025-02,Travel,Dining,5\n";
        let transfers = read_transfers(transfers_csv.as_bytes(), "transfers.csv").unwrap();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[0].note, "smart rebalance");
        assert_eq!(transfers[1].amount.cents(), 500);
        assert_eq!(transfers[1].note, "");
    }

    #[test]
    fn test_invalid_month_is_an_error() {
        let budgets = "month,category,allocated\nFeb 2025,Rent,1650\n";
        let err = read_allocations(budgets.as_bytes(), "budgets.csv").unwrap_err();
        assert!(err.to_string().contains("budgets.csv row 2"));
    }

    #[test]
    fn test_empty_category_is_an_error() {
        let budgets = "month,category,allocated\n2025-02,,1650\n";
        assert!(read_allocations(budgets.as_bytes(), "budgets.csv").is_err());
    }

    #[test]
    fn test_read_balances() {
        let csv = "month,balance\n2025-02,\"3,000.00\"\n";
        let balances = read_balances(csv.as_bytes(), "balances.csv").unwrap();
        assert_eq!(balances[0].balance.cents(), 300000);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-02-05"), Some(d(2025, 2, 5)));
        assert_eq!(parse_date("02/05/2025"), Some(d(2025, 2, 5)));
        assert_eq!(parse_date("2025-02-05 13:45:00"), Some(d(2025, 2, 5)));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_load_from_directory_with_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("budgets.csv"),
            "month,category,allocated\n2025-02,Rent,1650\n",
        )
        .unwrap();

        let sources = CsvSources::in_dir(temp_dir.path(), &InputFiles::default());
        let inputs = sources.load().unwrap();

        assert_eq!(inputs.allocations.len(), 1);
        assert!(inputs.transactions.is_empty());
        assert!(inputs.transfers.is_empty());
        assert!(inputs.snapshots.is_empty());
    }
}
