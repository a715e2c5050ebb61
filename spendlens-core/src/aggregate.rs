//! Grouped sums/counts/means over a transaction snapshot.
//!
//! All accumulation is exact Decimal arithmetic; rounding to two decimals
//! only ever happens when something is formatted for display.

use crate::category::Category;
use crate::transaction::{Transaction, TxnKind};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate over one grouping key. Never materialized with count 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bucket {
    pub total: Decimal,
    pub count: usize,
}

impl Bucket {
    fn add(&mut self, amount: Decimal) {
        self.total += amount;
        self.count += 1;
    }

    /// Exact mean; zero for a hypothetical empty bucket
    pub fn mean(&self) -> Decimal {
        if self.count == 0 {
            return Decimal::ZERO;
        }
        self.total / Decimal::from(self.count as u64)
    }
}

/// `YYYY-MM` key for a date
pub fn month_key(date: chrono::NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// ISO `YYYY-Www` key for a date
pub fn week_key(date: chrono::NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{:04}-W{:02}", iso.year(), iso.week())
}

/// Group transactions by an arbitrary key. Transactions for which the key
/// function returns None are skipped (used for date-keyed slices where a
/// malformed date means "no key"). Empty input yields an empty map.
pub fn aggregate<K, F>(txns: &[Transaction], key_fn: F) -> BTreeMap<K, Bucket>
where
    K: Ord,
    F: Fn(&Transaction) -> Option<K>,
{
    let mut buckets: BTreeMap<K, Bucket> = BTreeMap::new();
    for txn in txns {
        if let Some(key) = key_fn(txn) {
            buckets.entry(key).or_default().add(txn.amount);
        }
    }
    buckets
}

/// Totals per canonical category. Every transaction lands somewhere, even
/// ones with unparseable dates.
pub fn by_category(txns: &[Transaction]) -> BTreeMap<Category, Bucket> {
    aggregate(txns, |t| Some(Category::normalize(&t.category)))
}

/// Totals per calendar month (`YYYY-MM`); undated transactions are skipped
pub fn by_month(txns: &[Transaction]) -> BTreeMap<String, Bucket> {
    aggregate(txns, |t| t.date.map(month_key))
}

/// Totals per ISO week (`YYYY-Www`); undated transactions are skipped
pub fn by_week(txns: &[Transaction]) -> BTreeMap<String, Bucket> {
    aggregate(txns, |t| t.date.map(week_key))
}

/// Totals per weekday, Monday = 0 .. Sunday = 6
pub fn by_weekday(txns: &[Transaction]) -> BTreeMap<u8, Bucket> {
    aggregate(txns, |t| {
        t.date.map(|d| d.weekday().num_days_from_monday() as u8)
    })
}

/// Sum of all amounts in the snapshot
pub fn total_amount(txns: &[Transaction]) -> Decimal {
    txns.iter().map(|t| t.amount).sum()
}

/// Income vs expense totals for one month
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthSummary {
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthSummary {
    pub fn net(&self) -> Decimal {
        self.income - self.expense
    }
}

/// Per-month income/expense/net split, keyed `YYYY-MM`
pub fn monthly_summary(txns: &[Transaction]) -> BTreeMap<String, MonthSummary> {
    let mut months: BTreeMap<String, MonthSummary> = BTreeMap::new();
    for txn in txns {
        let Some(date) = txn.date else { continue };
        let entry = months.entry(month_key(date)).or_default();
        match txn.kind {
            TxnKind::Income => entry.income += txn.amount,
            TxnKind::Expense => entry.expense += txn.amount,
        }
    }
    months
}
