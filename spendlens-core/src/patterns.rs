//! Habit-style findings: biggest single expense, repeated purchases,
//! and the weekday where spending concentrates.

use crate::aggregate::{Bucket, by_weekday};
use crate::transaction::Transaction;
use std::collections::HashMap;

pub const WEEKDAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The single largest expense in the snapshot, by amount
pub fn biggest_expense(txns: &[Transaction]) -> Option<&Transaction> {
    txns.iter()
        .filter(|t| t.is_expense())
        .max_by(|a, b| a.amount.cmp(&b.amount))
}

/// Expense descriptions that repeat at least `min_count` times
/// (lowercased), ordered by count descending then name ascending.
pub fn recurring_notes(txns: &[Transaction], min_count: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        let note = txn.note.trim().to_lowercase();
        if !note.is_empty() {
            *counts.entry(note).or_insert(0) += 1;
        }
    }

    let mut recurring: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .collect();
    recurring.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    recurring
}

/// Weekday (Monday = 0) with the highest expense total
pub fn top_weekday(txns: &[Transaction]) -> Option<(u8, Bucket)> {
    let expenses: Vec<Transaction> = txns.iter().filter(|t| t.is_expense()).cloned().collect();
    by_weekday(&expenses)
        .into_iter()
        .max_by(|a, b| a.1.total.cmp(&b.1.total))
}
