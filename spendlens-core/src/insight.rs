//! Turns aggregate, trend, anomaly, and recommendation outputs into one
//! prioritized, human-readable list of findings.
//!
//! Ordering is deterministic: summary, trend findings, habit findings,
//! anomalies, savings score, recommendations. Text is fixed templates only.

use crate::aggregate::{Bucket, by_category, by_month, by_week, monthly_summary};
use crate::anomaly::AnomalyRecord;
use crate::category::Category;
use crate::patterns::{WEEKDAY_NAMES, biggest_expense, recurring_notes, top_weekday};
use crate::recommend::{RecPriority, Recommendation};
use crate::transaction::Transaction;
use crate::trend::{latest_delta, period_deltas};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A category claiming more than this share of total spend escalates the
/// trend finding to a warning.
pub const HIGH_SHARE_PCT: f64 = 40.0;
/// How many anomalies make it into the findings list
pub const ANOMALY_LIMIT: usize = 5;
/// How many recurring purchases to surface
pub const RECURRING_LIMIT: usize = 5;
/// A description must repeat this often to count as a habit
pub const RECURRING_MIN: usize = 2;
/// Spend-to-income ratio above which the savings score turns into a warning
pub const SPEND_RATIO_WARN: f64 = 0.9;
/// Ratio below which the month counts as a strong saving month
pub const SPEND_RATIO_GOOD: f64 = 0.7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightKind {
    #[serde(rename = "summary")]
    Summary,
    #[serde(rename = "trend")]
    Trend,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "anomaly")]
    Anomaly,
    #[serde(rename = "recommendation")]
    Recommendation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InsightPriority {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "high")]
    High,
}

/// One finding, ready for a text panel. Produced fresh on every call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
    pub priority: InsightPriority,
}

fn share_pct(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part / whole).to_f64().unwrap_or(0.0) * 100.0
}

/// Category with the highest total; ties resolve to the smallest name
fn top_by<F: Fn(&Bucket) -> Decimal>(
    buckets: &BTreeMap<Category, Bucket>,
    metric: F,
) -> Option<(Category, Bucket)> {
    let mut best: Option<(Category, Bucket)> = None;
    for (category, bucket) in buckets {
        match &best {
            Some((_, current)) if metric(bucket) <= metric(current) => {}
            _ => best = Some((*category, *bucket)),
        }
    }
    best
}

/// Build the full findings list for one analysis pass. `anomalies` is
/// expected sorted by z-score descending (the detectors guarantee it);
/// recommendations come from the coach and may be empty.
pub fn synthesize(
    txns: &[Transaction],
    anomalies: &[AnomalyRecord],
    recommendations: &[Recommendation],
) -> Vec<Insight> {
    let expenses: Vec<Transaction> = txns.iter().filter(|t| t.is_expense()).cloned().collect();
    if expenses.is_empty() {
        return Vec::new();
    }

    let categories = by_category(&expenses);
    let total: Decimal = categories.values().map(|b| b.total).sum();
    let count: usize = categories.values().map(|b| b.count).sum();

    let mut insights = Vec::new();

    // 1. Summary
    insights.push(Insight {
        kind: InsightKind::Summary,
        text: format!("Total spending analyzed: {:.2}", total),
        priority: InsightPriority::Info,
    });

    // 2. Highest-spending category, escalated when it dominates
    if let Some((category, bucket)) = top_by(&categories, |b| b.total) {
        let pct = share_pct(bucket.total, total);
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: format!(
                "{} is your highest spending category at {:.2} ({:.1}%)",
                category, bucket.total, pct
            ),
            priority: if pct > HIGH_SHARE_PCT {
                InsightPriority::Warning
            } else {
                InsightPriority::Info
            },
        });
    }

    // 3. Average transaction
    let average = total / Decimal::from(count as u64);
    insights.push(Insight {
        kind: InsightKind::Trend,
        text: format!("Average transaction amount: {:.2}", average),
        priority: InsightPriority::Info,
    });

    // 4. Most frequent category
    if let Some((category, bucket)) = top_by(&categories, |b| Decimal::from(b.count as u64)) {
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: format!(
                "Most frequent category: {} ({} transactions)",
                category, bucket.count
            ),
            priority: InsightPriority::Info,
        });
    }

    // 5. Month-over-month expense changes, then the most recent week
    for period in period_deltas(&by_month(&expenses)) {
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: period.describe(),
            priority: InsightPriority::Info,
        });
    }
    if let Some(week) = latest_delta(&by_week(&expenses)) {
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: week.describe(),
            priority: InsightPriority::Info,
        });
    }

    // 6. Habit findings
    if let Some(big) = biggest_expense(&expenses) {
        let label = if big.note.is_empty() { "Expense" } else { big.note.as_str() };
        let when = big
            .date
            .map(|d| format!(" on {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: format!(
                "Biggest single expense: {}{} = {:.2} ({})",
                label,
                when,
                big.amount,
                Category::normalize(&big.category)
            ),
            priority: InsightPriority::Info,
        });
    }
    for (note, times) in recurring_notes(&expenses, RECURRING_MIN)
        .into_iter()
        .take(RECURRING_LIMIT)
    {
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: format!("'{}' repeated {} times", note, times),
            priority: InsightPriority::Info,
        });
    }
    if let Some((day, bucket)) = top_weekday(&expenses) {
        insights.push(Insight {
            kind: InsightKind::Trend,
            text: format!(
                "Highest spending day: {} ({:.2} across {} transactions)",
                WEEKDAY_NAMES[day as usize], bucket.total, bucket.count
            ),
            priority: InsightPriority::Info,
        });
    }

    // 7. Anomalies, top slice by z-score
    for record in anomalies.iter().take(ANOMALY_LIMIT) {
        let label = if record.description.is_empty() {
            "Expense"
        } else {
            record.description.as_str()
        };
        insights.push(Insight {
            kind: InsightKind::Anomaly,
            text: format!(
                "Unusual transaction in {}: {} = {:.2} (z-score {:.2})",
                record.group_key, label, record.amount, record.z_score
            ),
            priority: InsightPriority::Warning,
        });
    }

    // 8. Savings score for the latest month with income on record
    let months = monthly_summary(txns);
    if let Some((month, summary)) = months
        .iter()
        .rfind(|(_, s)| s.income > Decimal::ZERO)
    {
        let ratio = (summary.expense / summary.income).to_f64().unwrap_or(0.0);
        let (text, kind, priority) = if ratio > SPEND_RATIO_WARN {
            (
                format!(
                    "In {}, you spent {:.1}% of your income. Consider cutting the top category.",
                    month,
                    ratio * 100.0
                ),
                InsightKind::Warning,
                InsightPriority::Warning,
            )
        } else if ratio > SPEND_RATIO_GOOD {
            (
                format!(
                    "In {}, you spent {:.1}% of your income. There is room to save more.",
                    month,
                    ratio * 100.0
                ),
                InsightKind::Trend,
                InsightPriority::Info,
            )
        } else {
            (
                format!(
                    "In {}, you spent {:.1}% of your income. Strong saving month.",
                    month,
                    ratio * 100.0
                ),
                InsightKind::Trend,
                InsightPriority::Info,
            )
        };
        insights.push(Insight {
            kind,
            text,
            priority,
        });
    }

    // 9. Recommendations last
    for rec in recommendations {
        insights.push(Insight {
            kind: InsightKind::Recommendation,
            text: format!("{} (target {:.2})", rec.message, rec.suggested_target),
            priority: match rec.priority {
                RecPriority::High => InsightPriority::High,
                RecPriority::Low => InsightPriority::Info,
            },
        });
    }

    insights
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
            note: String::new(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            kind: TxnKind::Expense,
        }
    }

    #[test]
    fn test_empty_input_gives_no_insights() {
        assert!(synthesize(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_dominant_category_escalates_to_warning() {
        // Food 400 of 450 total = 88.9% > 40%
        let txns = vec![
            expense(1, dec!(100), "food", "2025-01-01"),
            expense(2, dec!(300), "food", "2025-01-02"),
            expense(3, dec!(50), "transport", "2025-01-03"),
        ];
        let insights = synthesize(&txns, &[], &[]);

        assert_eq!(insights[0].kind, InsightKind::Summary);
        assert!(insights[0].text.contains("450.00"));

        let highest = &insights[1];
        assert_eq!(highest.kind, InsightKind::Trend);
        assert!(highest.text.contains("Groceries"));
        assert!(highest.text.contains("88.9%"));
        assert_eq!(highest.priority, InsightPriority::Warning);
    }

    #[test]
    fn test_balanced_categories_stay_info() {
        let txns = vec![
            expense(1, dec!(100), "food", "2025-01-01"),
            expense(2, dec!(100), "transport", "2025-01-02"),
            expense(3, dec!(100), "rent", "2025-01-03"),
        ];
        let insights = synthesize(&txns, &[], &[]);
        assert_eq!(insights[1].priority, InsightPriority::Info);
    }

    #[test]
    fn test_ordering_summary_trend_anomaly_recommendation() {
        let txns = vec![
            expense(1, dec!(100), "food", "2025-01-01"),
            expense(2, dec!(120), "food", "2025-02-01"),
        ];
        let anomalies = vec![crate::anomaly::AnomalyRecord {
            txn_id: 2,
            description: "big one".into(),
            group_key: "Groceries".into(),
            amount: dec!(120),
            z_score: 3.4,
            direction: crate::anomaly::AnomalyDirection::High,
        }];
        let recs = vec![Recommendation {
            category: Category::Groceries,
            message: "Budget recommendation for Groceries".into(),
            suggested_target: dec!(242),
            priority: RecPriority::Low,
        }];

        let insights = synthesize(&txns, &anomalies, &recs);
        let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();

        assert_eq!(kinds[0], InsightKind::Summary);
        let anomaly_at = kinds.iter().position(|k| *k == InsightKind::Anomaly).unwrap();
        let rec_at = kinds
            .iter()
            .position(|k| *k == InsightKind::Recommendation)
            .unwrap();
        assert!(anomaly_at < rec_at);
        assert!(kinds[1..anomaly_at].iter().all(|k| *k == InsightKind::Trend));
        assert_eq!(rec_at, kinds.len() - 1);
    }

    #[test]
    fn test_anomaly_list_truncated_to_limit() {
        let txns = vec![expense(1, dec!(10), "food", "2025-01-01")];
        let anomalies: Vec<AnomalyRecord> = (0..8)
            .map(|i| AnomalyRecord {
                txn_id: i,
                description: format!("a{i}"),
                group_key: "Groceries".into(),
                amount: dec!(100),
                z_score: 8.0 - i as f64,
                direction: crate::anomaly::AnomalyDirection::High,
            })
            .collect();
        let insights = synthesize(&txns, &anomalies, &[]);
        let anomaly_count = insights
            .iter()
            .filter(|i| i.kind == InsightKind::Anomaly)
            .count();
        assert_eq!(anomaly_count, ANOMALY_LIMIT);
    }

    #[test]
    fn test_month_delta_insight_names_both_months() {
        let txns = vec![
            expense(1, dec!(1000), "rent", "2025-01-01"),
            expense(2, dec!(1500), "rent", "2025-02-01"),
        ];
        let insights = synthesize(&txns, &[], &[]);
        let delta = insights
            .iter()
            .find(|i| i.text.contains("more than"))
            .unwrap();
        assert!(delta.text.contains("2025-01"));
        assert!(delta.text.contains("2025-02"));
        assert!(delta.text.contains("500.00"));
    }

    #[test]
    fn test_latest_week_delta_is_surfaced() {
        // Both in January, so no month delta competes: W02 100 -> W03 180
        let txns = vec![
            expense(1, dec!(100), "food", "2025-01-06"),
            expense(2, dec!(180), "food", "2025-01-15"),
        ];
        let insights = synthesize(&txns, &[], &[]);
        let week = insights
            .iter()
            .find(|i| i.text.contains("2025-W03"))
            .unwrap();
        assert_eq!(week.kind, InsightKind::Trend);
        assert!(week.text.contains("2025-W02"));
        assert!(week.text.contains("80.00 more"));
    }

    #[test]
    fn test_overspending_month_raises_warning() {
        let mut txns = vec![expense(1, dec!(950), "rent", "2025-01-02")];
        txns.push(Transaction {
            kind: TxnKind::Income,
            ..expense(2, dec!(1000), "salary", "2025-01-01")
        });
        let insights = synthesize(&txns, &[], &[]);
        let score = insights
            .iter()
            .find(|i| i.text.contains("of your income"))
            .unwrap();
        assert_eq!(score.priority, InsightPriority::Warning);
        assert!(score.text.contains("95.0%"));
    }
}
