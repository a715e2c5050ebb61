//! Outlier detection over transaction amounts.
//!
//! Two independent policies share one z-score primitive. Categories are
//! usually small and noisy, so the per-category detector works from n=2;
//! monthly expense screening needs a bigger sample to mean anything and
//! skips months with fewer than five transactions.

use crate::aggregate::month_key;
use crate::category::Category;
use crate::stats;
use crate::transaction::Transaction;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnomalyDirection {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "low")]
    Low,
}

/// A transaction flagged as unusual within its group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnomalyRecord {
    pub txn_id: i64,
    pub description: String,
    /// Category name or `YYYY-MM`, depending on the policy
    pub group_key: String,
    pub amount: Decimal,
    pub z_score: f64,
    pub direction: AnomalyDirection,
}

/// Two-sided detection within each canonical category
#[derive(Debug, Clone, Copy)]
pub struct CategoryPolicy {
    /// Minimum absolute z-score to flag (inclusive, so a transaction
    /// sitting exactly at the configured sigma is still reported)
    pub threshold: f64,
    /// Groups smaller than this are skipped outright
    pub min_group: usize,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            min_group: 2,
        }
    }
}

/// One-sided (high only) detection over each month's expenses
#[derive(Debug, Clone, Copy)]
pub struct MonthlyPolicy {
    /// Flag amounts strictly above `mean + sigma * std`
    pub sigma: f64,
    pub min_group: usize,
}

impl Default for MonthlyPolicy {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            min_group: 5,
        }
    }
}

fn amount_f64(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or(0.0)
}

/// Flag transactions whose amount deviates from their category's mean by
/// at least `threshold` standard deviations. Output sorted by z-score
/// descending; ties keep their insertion order.
pub fn detect_by_category(txns: &[Transaction], policy: CategoryPolicy) -> Vec<AnomalyRecord> {
    let mut groups: BTreeMap<Category, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns {
        groups
            .entry(Category::normalize(&txn.category))
            .or_default()
            .push(txn);
    }

    let mut anomalies = Vec::new();
    for (category, members) in &groups {
        if members.len() < policy.min_group {
            continue;
        }
        let amounts: Vec<f64> = members.iter().map(|t| amount_f64(t.amount)).collect();
        let mean = stats::mean(&amounts);
        let std = stats::std_dev(&amounts);

        for (txn, amount) in members.iter().zip(&amounts) {
            let z = stats::z_score(*amount, mean, std);
            if z >= policy.threshold && z > 0.0 {
                anomalies.push(AnomalyRecord {
                    txn_id: txn.id,
                    description: txn.note.clone(),
                    group_key: category.name().to_string(),
                    amount: txn.amount,
                    z_score: z,
                    direction: if *amount > mean {
                        AnomalyDirection::High
                    } else {
                        AnomalyDirection::Low
                    },
                });
            }
        }
    }

    // Stable sort: equal z-scores keep insertion order
    anomalies.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));
    anomalies
}

/// Flag expense transactions sitting above `mean + sigma * std` of their
/// calendar month. Expense-only, valid dates only, high side only.
pub fn detect_by_month(txns: &[Transaction], policy: MonthlyPolicy) -> Vec<AnomalyRecord> {
    let mut groups: BTreeMap<String, Vec<&Transaction>> = BTreeMap::new();
    for txn in txns.iter().filter(|t| t.is_expense()) {
        if let Some(date) = txn.date {
            groups.entry(month_key(date)).or_default().push(txn);
        }
    }

    let mut anomalies = Vec::new();
    for (month, members) in &groups {
        if members.len() < policy.min_group {
            continue;
        }
        let amounts: Vec<f64> = members.iter().map(|t| amount_f64(t.amount)).collect();
        let mean = stats::mean(&amounts);
        let std = stats::std_dev(&amounts);
        let ceiling = mean + policy.sigma * std;

        for (txn, amount) in members.iter().zip(&amounts) {
            if *amount > ceiling {
                anomalies.push(AnomalyRecord {
                    txn_id: txn.id,
                    description: txn.note.clone(),
                    group_key: month.clone(),
                    amount: txn.amount,
                    z_score: stats::z_score(*amount, mean, std),
                    direction: AnomalyDirection::High,
                });
            }
        }
    }

    anomalies.sort_by(|a, b| b.z_score.total_cmp(&a.z_score));
    anomalies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TxnKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expense(id: i64, amount: Decimal, category: &str, date: &str) -> Transaction {
        Transaction {
            id,
            amount,
            category: category.into(),
            note: format!("txn-{id}"),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            kind: TxnKind::Expense,
        }
    }

    #[test]
    fn test_spike_at_two_sigma_is_flagged_high() {
        // mean 28, population std 36; the 100 sits exactly at z = 2.0
        let txns: Vec<Transaction> = [10, 10, 10, 10, 100]
            .iter()
            .enumerate()
            .map(|(i, amt)| expense(i as i64 + 1, Decimal::from(*amt), "food", "2025-01-10"))
            .collect();

        let anomalies = detect_by_category(&txns, CategoryPolicy::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].txn_id, 5);
        assert_eq!(anomalies[0].z_score, 2.0);
        assert_eq!(anomalies[0].direction, AnomalyDirection::High);
        assert_eq!(anomalies[0].group_key, "Groceries");
    }

    #[test]
    fn test_groups_below_two_members_are_skipped() {
        let txns = vec![expense(1, dec!(1000000), "rent", "2025-01-01")];
        assert!(detect_by_category(&txns, CategoryPolicy::default()).is_empty());
    }

    #[test]
    fn test_zero_variance_yields_no_anomalies() {
        let txns = vec![
            expense(1, dec!(50), "food", "2025-01-01"),
            expense(2, dec!(50), "food", "2025-01-02"),
            expense(3, dec!(50), "food", "2025-01-03"),
        ];
        assert!(detect_by_category(&txns, CategoryPolicy::default()).is_empty());
    }

    #[test]
    fn test_low_side_outlier_direction() {
        // One value far below the rest of the group
        let mut txns: Vec<Transaction> = (1..=9)
            .map(|i| expense(i, dec!(100), "transport", "2025-01-05"))
            .collect();
        txns.push(expense(10, dec!(1), "transport", "2025-01-06"));

        let anomalies = detect_by_category(
            &txns,
            CategoryPolicy {
                threshold: 1.5,
                ..CategoryPolicy::default()
            },
        );
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].direction, AnomalyDirection::Low);
    }

    #[test]
    fn test_output_sorted_by_z_descending() {
        let mut txns: Vec<Transaction> = (1..=20)
            .map(|i| expense(i, dec!(10), "food", "2025-01-01"))
            .collect();
        txns.push(expense(21, dec!(200), "food", "2025-01-02"));
        txns.push(expense(22, dec!(400), "food", "2025-01-03"));

        let anomalies = detect_by_category(
            &txns,
            CategoryPolicy {
                threshold: 1.0,
                ..CategoryPolicy::default()
            },
        );
        for pair in anomalies.windows(2) {
            assert!(pair[0].z_score >= pair[1].z_score);
        }
        assert_eq!(anomalies[0].txn_id, 22);
    }

    #[test]
    fn test_monthly_detector_requires_five_expenses() {
        let txns = vec![
            expense(1, dec!(10), "food", "2025-02-01"),
            expense(2, dec!(10), "food", "2025-02-02"),
            expense(3, dec!(10), "food", "2025-02-03"),
            expense(4, dec!(9000), "food", "2025-02-04"),
        ];
        assert!(detect_by_month(&txns, MonthlyPolicy::default()).is_empty());
    }

    #[test]
    fn test_monthly_detector_flags_high_side_only() {
        let amounts = [100, 100, 100, 100, 100, 100, 100, 100, 100, 2000];
        let txns: Vec<Transaction> = amounts
            .iter()
            .enumerate()
            .map(|(i, amt)| expense(i as i64 + 1, Decimal::from(*amt), "food", "2025-03-07"))
            .collect();

        let anomalies = detect_by_month(&txns, MonthlyPolicy::default());
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].txn_id, 10);
        assert_eq!(anomalies[0].group_key, "2025-03");
        assert_eq!(anomalies[0].direction, AnomalyDirection::High);
    }

    #[test]
    fn test_monthly_detector_ignores_income_and_undated() {
        let mut txns: Vec<Transaction> = (1..=6)
            .map(|i| expense(i, dec!(20), "food", "2025-04-01"))
            .collect();
        txns.push(Transaction {
            kind: TxnKind::Income,
            ..expense(7, dec!(50000), "salary", "2025-04-02")
        });
        txns.push(expense(8, dec!(50000), "food", "not-a-date"));

        assert!(detect_by_month(&txns, MonthlyPolicy::default()).is_empty());
    }

    #[test]
    fn test_z_scores_are_nonnegative() {
        let txns = vec![
            expense(1, dec!(5), "food", "2025-01-01"),
            expense(2, dec!(500), "food", "2025-01-02"),
            expense(3, dec!(5), "food", "2025-01-03"),
        ];
        for record in detect_by_category(
            &txns,
            CategoryPolicy {
                threshold: 0.1,
                ..CategoryPolicy::default()
            },
        ) {
            assert!(record.z_score >= 0.0);
        }
    }
}
