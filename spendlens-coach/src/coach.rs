//! The savings coach: strategy selection plus the report callers render.
//!
//! Blocking by design — the engine computes in well under a second for
//! realistic volumes; dispatching off an interactive thread is the
//! caller's concern.

use crate::artifact::{ArtifactError, ScoringArtifact};
use crate::cache::ModelCache;
use crate::profile::UserProfile;
use crate::strategy::{HeuristicStrategy, ModelStrategy, Proposal, SavingsStrategy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendlens_core::{Category, Recommendation, Transaction, by_category};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Which strategy produced a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum CoachStatus {
    /// Trained scoring model answered
    Model,
    /// No artifact on disk yet; heuristic rules answered
    HeuristicNotTrained,
    /// Artifact exists but is unusable; heuristic rules answered
    HeuristicCorruptModel { reason: String },
}

impl CoachStatus {
    /// One human-readable status line for the report header
    pub fn describe(&self) -> String {
        match self {
            CoachStatus::Model => "Recommendations from the trained scoring model.".to_string(),
            CoachStatus::HeuristicNotTrained => {
                "No trained model yet; using heuristic rules.".to_string()
            }
            CoachStatus::HeuristicCorruptModel { reason } => {
                format!("Trained model unusable ({reason}); using heuristic rules.")
            }
        }
    }
}

/// Everything the presentation layer needs to render coach output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoachReport {
    pub status: CoachStatus,
    pub total_spend: Decimal,
    pub savings_pct: Decimal,
    pub recommended_savings: Decimal,
    pub disposable_income: Decimal,
    pub recommendations: Vec<Recommendation>,
}

/// Sum expense amounts per canonical category
pub fn spend_by_category(txns: &[Transaction]) -> BTreeMap<Category, Decimal> {
    let expenses: Vec<Transaction> = txns.iter().filter(|t| t.is_expense()).cloned().collect();
    by_category(&expenses)
        .into_iter()
        .map(|(category, bucket)| (category, bucket.total))
        .collect()
}

pub struct SavingsCoach {
    model_path: PathBuf,
    cache: ModelCache,
}

impl SavingsCoach {
    /// Coach backed by a scoring artifact path. The artifact is loaded
    /// lazily on the first `advise` call, then cached for the lifetime of
    /// this coach — including load failures.
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            cache: ModelCache::new(),
        }
    }

    /// Produce savings advice from a transaction snapshot. Never fails on
    /// data-shape problems: a missing or corrupt model degrades to the
    /// heuristic strategy with an explanatory status.
    pub fn advise(&self, profile: &UserProfile, txns: &[Transaction]) -> CoachReport {
        let spend = spend_by_category(txns);
        let total_spend: Decimal = spend.values().copied().sum();

        let (status, proposal) = match self
            .cache
            .get_or_load(|| ScoringArtifact::load(&self.model_path))
        {
            Ok(artifact) => {
                debug!("scoring with trained model");
                (
                    CoachStatus::Model,
                    ModelStrategy::new(artifact).propose(profile, &spend),
                )
            }
            Err(err) => {
                warn!(%err, "falling back to heuristic strategy");
                let status = match err {
                    ArtifactError::NotTrained { .. } => CoachStatus::HeuristicNotTrained,
                    ArtifactError::Corrupt { reason, .. } => {
                        CoachStatus::HeuristicCorruptModel { reason }
                    }
                };
                (status, HeuristicStrategy.propose(profile, &spend))
            }
        };

        self.report(status, total_spend, proposal)
    }

    fn report(&self, status: CoachStatus, total_spend: Decimal, proposal: Proposal) -> CoachReport {
        CoachReport {
            status,
            total_spend,
            savings_pct: proposal.savings_pct,
            recommended_savings: proposal.recommended_savings,
            disposable_income: proposal.disposable_income,
            recommendations: proposal.recommendations,
        }
    }
}
