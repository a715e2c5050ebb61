//! Transaction records and the intake boundary where storage rows become
//! typed, date-validated transactions.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether a transaction adds to or draws from the user's balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxnKind {
    #[serde(rename = "expense")]
    Expense,
    #[serde(rename = "income")]
    Income,
}

/// An immutable, validated transaction. Created at the intake boundary;
/// the engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Storage-assigned identifier
    pub id: i64,
    /// Signed amount in major currency units
    pub amount: Decimal,
    /// Raw category text as the user entered it
    pub category: String,
    /// Free-text note/description (may be empty)
    pub note: String,
    /// Calendar date; None when the stored date string failed to parse
    pub date: Option<NaiveDate>,
    pub kind: TxnKind,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TxnKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TxnKind::Income
    }
}

/// Row shape the storage collaborator hands us:
/// `(id, amount, category, note, date-string, kind)`. The date stays a
/// string until intake so one bad row can't fail a whole read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRow {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub note: String,
    pub date: String,
    pub kind: TxnKind,
}

/// Data-quality metadata gathered during intake. Malformed dates are not
/// errors: the transaction still participates in category rollups, it is
/// just excluded from date-keyed analysis.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataQuality {
    /// Rows whose date string could not be parsed as YYYY-MM-DD
    pub malformed_dates: usize,
}

impl DataQuality {
    pub fn is_clean(&self) -> bool {
        self.malformed_dates == 0
    }
}

/// Parse the leading 10 chars of a stored date string as YYYY-MM-DD.
/// Stored dates are sometimes full ISO timestamps; the date part is enough.
fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Convert storage rows into transactions, counting date failures instead
/// of raising them.
pub fn from_rows(rows: &[StoredRow]) -> (Vec<Transaction>, DataQuality) {
    let mut quality = DataQuality::default();
    let txns = rows
        .iter()
        .map(|row| {
            let date = parse_stored_date(&row.date);
            if date.is_none() {
                quality.malformed_dates += 1;
                debug!(id = row.id, raw = %row.date, "dropping unparseable date");
            }
            Transaction {
                id: row.id,
                amount: row.amount,
                category: row.category.clone(),
                note: row.note.clone(),
                date,
                kind: row.kind,
            }
        })
        .collect();
    (txns, quality)
}

/// Read side of the storage collaborator. Implementations return all
/// transactions for a user ordered by date; the engine knows nothing about
/// the schema behind this.
pub trait TransactionSource {
    fn transactions_for(&self, user: &str) -> anyhow::Result<Vec<StoredRow>>;
}

/// In-memory source backing tests and one-shot CLI runs
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    rows: Vec<StoredRow>,
}

impl MemorySource {
    pub fn new(mut rows: Vec<StoredRow>) -> Self {
        rows.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
        Self { rows }
    }
}

impl TransactionSource for MemorySource {
    fn transactions_for(&self, _user: &str) -> anyhow::Result<Vec<StoredRow>> {
        Ok(self.rows.clone())
    }
}
