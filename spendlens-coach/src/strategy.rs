//! The two interchangeable savings strategies.
//!
//! Whichever runs, the caller sees the same `Proposal` shape; selecting
//! between them is the coach's job, never the presentation layer's.

use crate::artifact::{
    REDUCIBLE_CATEGORIES, ScoringArtifact, TARGET_DISPOSABLE, TARGET_SAVINGS, TARGET_SAVINGS_PCT,
};
use crate::profile::UserProfile;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use spendlens_core::{Category, HIGH_SHARE_PCT, RecPriority, Recommendation};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Heuristic savings target as a share of income
pub const SAVINGS_RATE: Decimal = dec!(0.20);
/// Suggested budget for an overweight category: 20% reduction
pub const REDUCE_FACTOR: Decimal = dec!(0.80);
/// Suggested budget for a balanced category: 10% buffer
pub const BUFFER_FACTOR: Decimal = dec!(1.10);
/// How many model-ranked opportunities to surface
pub const TOP_OPPORTUNITIES: usize = 3;

/// Uniform output of either strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Proposal {
    /// Savings goal as a percentage of income
    pub savings_pct: Decimal,
    pub recommended_savings: Decimal,
    pub disposable_income: Decimal,
    pub recommendations: Vec<Recommendation>,
}

/// A per-category savings proposer. Implementations must be pure: same
/// profile and spend snapshot, same proposal.
pub trait SavingsStrategy {
    fn propose(&self, profile: &UserProfile, spend: &BTreeMap<Category, Decimal>) -> Proposal;
}

fn share_pct(part: Decimal, whole: Decimal) -> f64 {
    if whole.is_zero() {
        return 0.0;
    }
    (part / whole).to_f64().unwrap_or(0.0) * 100.0
}

fn to_money(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

/// Fixed-percentage rules: save 20% of income, trim any category that
/// eats more than 40% of total spend.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicStrategy;

impl SavingsStrategy for HeuristicStrategy {
    fn propose(&self, profile: &UserProfile, spend: &BTreeMap<Category, Decimal>) -> Proposal {
        let total: Decimal = spend.values().copied().sum();

        let mut ranked: Vec<(Category, Decimal)> = spend
            .iter()
            .filter(|(_, amount)| **amount > Decimal::ZERO)
            .map(|(category, amount)| (*category, *amount))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name().cmp(b.0.name())));

        let recommendations = ranked
            .into_iter()
            .map(|(category, amount)| {
                let share = share_pct(amount, total);
                if share > HIGH_SHARE_PCT {
                    Recommendation {
                        category,
                        message: format!(
                            "Consider reducing {} spending (currently {:.1}% of total)",
                            category, share
                        ),
                        suggested_target: (amount * REDUCE_FACTOR).round_dp(2),
                        priority: RecPriority::High,
                    }
                } else {
                    Recommendation {
                        category,
                        message: format!("Budget recommendation for {}", category),
                        suggested_target: (amount * BUFFER_FACTOR).round_dp(2),
                        priority: RecPriority::Low,
                    }
                }
            })
            .collect();

        Proposal {
            savings_pct: SAVINGS_RATE * dec!(100),
            recommended_savings: (profile.income * SAVINGS_RATE).round_dp(2),
            disposable_income: profile.income - total,
            recommendations,
        }
    }
}

/// Trained-model lookup: ask the scoring artifact for desired savings and
/// per-category potential, then surface the biggest opportunities.
#[derive(Debug, Clone)]
pub struct ModelStrategy {
    artifact: Arc<ScoringArtifact>,
}

impl ModelStrategy {
    pub fn new(artifact: Arc<ScoringArtifact>) -> Self {
        Self { artifact }
    }
}

impl SavingsStrategy for ModelStrategy {
    fn propose(&self, profile: &UserProfile, spend: &BTreeMap<Category, Decimal>) -> Proposal {
        let total: Decimal = spend.values().copied().sum();
        let features = self.artifact.feature_vector(profile, spend);
        let scores = self.artifact.predict(&features);
        let target = |name: &str| self.artifact.target_index(name).map(|i| scores[i]);

        let mut opportunities: Vec<(Category, f64)> = REDUCIBLE_CATEGORIES
            .iter()
            .filter_map(|category| {
                target(&ScoringArtifact::potential_target(*category))
                    .filter(|potential| *potential > 0.0)
                    .map(|potential| (*category, potential))
            })
            .collect();
        opportunities.sort_by(|a, b| {
            b.1.total_cmp(&a.1)
                .then_with(|| a.0.name().cmp(b.0.name()))
        });
        opportunities.truncate(TOP_OPPORTUNITIES);

        let recommendations = opportunities
            .into_iter()
            .map(|(category, potential)| {
                let current = spend.get(&category).copied().unwrap_or_default();
                let suggested = (current - to_money(potential)).max(Decimal::ZERO);
                Recommendation {
                    category,
                    message: format!(
                        "Cut {} spending by about {:.2} per month",
                        category, potential
                    ),
                    suggested_target: suggested.round_dp(2),
                    priority: if share_pct(current, total) > HIGH_SHARE_PCT {
                        RecPriority::High
                    } else {
                        RecPriority::Low
                    },
                }
            })
            .collect();

        Proposal {
            savings_pct: target(TARGET_SAVINGS_PCT).map(to_money).unwrap_or_default(),
            recommended_savings: target(TARGET_SAVINGS).map(to_money).unwrap_or_default(),
            disposable_income: target(TARGET_DISPOSABLE)
                .map(to_money)
                .unwrap_or(profile.income - total),
            recommendations,
        }
    }
}
