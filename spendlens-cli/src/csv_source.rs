//! Read transaction CSV exports into storage rows.
//!
//! Expected header: `id,date,type,category,note,amount`. The `type` and
//! `note` columns may be omitted; rows default to expenses. Dates stay
//! strings here — validation happens at the engine's intake boundary.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use spendlens_core::{StoredRow, TxnKind};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: i64,
    date: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    category: String,
    #[serde(default)]
    note: Option<String>,
    amount: Decimal,
}

fn parse_kind(raw: Option<&str>) -> TxnKind {
    match raw.map(str::trim) {
        Some(k) if k.eq_ignore_ascii_case("income") => TxnKind::Income,
        _ => TxnKind::Expense,
    }
}

/// Load all rows from a transaction CSV file
pub fn read_rows(path: impl AsRef<Path>) -> Result<Vec<StoredRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())
        .with_context(|| format!("opening {}", path.as_ref().display()))?;

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: CsvRow = result.with_context(|| {
            format!("reading transactions from {}", path.as_ref().display())
        })?;
        rows.push(StoredRow {
            id: row.id,
            amount: row.amount,
            category: row.category,
            note: row.note.unwrap_or_default(),
            date: row.date,
            kind: parse_kind(row.kind.as_deref()),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_full_rows() {
        let file = write_csv(
            "id,date,type,category,note,amount\n\
             1,2025-01-05,expense,groceries,weekly shop,120.50\n\
             2,2025-01-31,income,salary,january pay,50000\n",
        );
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].amount, dec!(120.50));
        assert_eq!(rows[0].kind, TxnKind::Expense);
        assert_eq!(rows[1].kind, TxnKind::Income);
        assert_eq!(rows[1].note, "january pay");
    }

    #[test]
    fn test_missing_type_defaults_to_expense() {
        let file = write_csv("id,date,category,note,amount\n7,2025-02-02,rent,,800\n");
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows[0].kind, TxnKind::Expense);
        assert_eq!(rows[0].note, "");
    }

    #[test]
    fn test_bad_dates_pass_through_for_intake_to_count() {
        let file = write_csv("id,date,category,amount\n1,someday,misc,5\n");
        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows[0].date, "someday");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_rows("/nonexistent/txns.csv").is_err());
    }
}
