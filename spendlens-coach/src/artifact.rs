//! The packaged scoring function: a JSON artifact exported by the training
//! pipeline. The pipeline itself is a black box; all we rely on is the
//! contract `{features, targets, intercepts, coefficients, encodings}`
//! mapping an ordered feature vector to an ordered target vector.

use crate::profile::UserProfile;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use spendlens_core::Category;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Demographic features, in artifact order, ahead of the spend columns
pub const BASE_FEATURES: &[&str] = &["Income", "Age", "Dependents", "Occupation", "City_Tier"];

/// Categories the model predicts potential savings for. Rent, loan
/// repayments, and insurance are fixed obligations and have no target.
pub const REDUCIBLE_CATEGORIES: &[Category] = &[
    Category::Groceries,
    Category::Transport,
    Category::EatingOut,
    Category::Entertainment,
    Category::Utilities,
    Category::Healthcare,
    Category::Education,
    Category::Miscellaneous,
];

pub const TARGET_SAVINGS_PCT: &str = "Desired_Savings_Percentage";
pub const TARGET_SAVINGS: &str = "Desired_Savings";
pub const TARGET_DISPOSABLE: &str = "Disposable_Income";

/// Why the scoring artifact could not be used. `NotTrained` and `Corrupt`
/// are deliberately distinct: the first means "run the training pipeline",
/// the second means "re-export the artifact".
#[derive(Debug, Clone, Error)]
pub enum ArtifactError {
    #[error("no trained scoring model at {}", path.display())]
    NotTrained { path: PathBuf },
    #[error("scoring model at {} is unusable: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

/// Linear scoring function over named features. Categorical features are
/// mapped to numbers through per-level encodings baked in at export time.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringArtifact {
    pub features: Vec<String>,
    pub targets: Vec<String>,
    pub intercepts: Vec<f64>,
    pub coefficients: Vec<Vec<f64>>,
    #[serde(default)]
    pub encodings: HashMap<String, HashMap<String, f64>>,
}

impl ScoringArtifact {
    /// Load and validate the artifact file. A missing file is the
    /// not-trained-yet state; anything unreadable or dimensionally wrong
    /// is corrupt.
    pub fn load(path: &Path) -> Result<ScoringArtifact, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::NotTrained {
                path: path.to_path_buf(),
            });
        }
        let corrupt = |reason: String| ArtifactError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let raw = std::fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
        let artifact: ScoringArtifact =
            serde_json::from_str(&raw).map_err(|e| corrupt(e.to_string()))?;
        artifact.validate().map_err(corrupt)?;
        debug!(
            features = artifact.features.len(),
            targets = artifact.targets.len(),
            "loaded scoring artifact"
        );
        Ok(artifact)
    }

    fn validate(&self) -> Result<(), String> {
        if self.features.is_empty() {
            return Err("empty feature list".to_string());
        }
        if self.targets.is_empty() {
            return Err("empty target list".to_string());
        }
        if self.intercepts.len() != self.targets.len() {
            return Err(format!(
                "{} intercepts for {} targets",
                self.intercepts.len(),
                self.targets.len()
            ));
        }
        if self.coefficients.len() != self.targets.len() {
            return Err(format!(
                "{} coefficient rows for {} targets",
                self.coefficients.len(),
                self.targets.len()
            ));
        }
        for (i, row) in self.coefficients.iter().enumerate() {
            if row.len() != self.features.len() {
                return Err(format!(
                    "coefficient row {} has {} entries for {} features",
                    i,
                    row.len(),
                    self.features.len()
                ));
            }
        }
        Ok(())
    }

    /// Score one feature vector (same order as `features`)
    pub fn predict(&self, values: &[f64]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                intercept + row.iter().zip(values).map(|(c, v)| c * v).sum::<f64>()
            })
            .collect()
    }

    /// Assemble the feature vector for a profile + per-category spend.
    /// Names in `BASE_FEATURES` read from the profile, everything else is
    /// treated as a spend column. Unknown categorical levels encode to 0;
    /// unmatched feature names contribute 0.
    pub fn feature_vector(
        &self,
        profile: &UserProfile,
        spend: &BTreeMap<Category, Decimal>,
    ) -> Vec<f64> {
        self.features
            .iter()
            .map(|name| {
                if BASE_FEATURES.contains(&name.as_str()) {
                    self.demographic(name, profile)
                } else {
                    spend
                        .iter()
                        .find(|(cat, _)| cat.name() == name.as_str())
                        .map(|(_, amount)| amount.to_f64().unwrap_or(0.0))
                        .unwrap_or(0.0)
                }
            })
            .collect()
    }

    fn demographic(&self, name: &str, profile: &UserProfile) -> f64 {
        match name {
            "Income" => profile.income.to_f64().unwrap_or(0.0),
            "Age" => f64::from(profile.age),
            "Dependents" => f64::from(profile.dependents),
            "Occupation" => self.encode(name, &profile.occupation),
            "City_Tier" => self.encode(name, &profile.city_tier),
            _ => 0.0,
        }
    }

    fn encode(&self, feature: &str, level: &str) -> f64 {
        self.encodings
            .get(feature)
            .and_then(|levels| levels.get(level))
            .copied()
            .unwrap_or(0.0)
    }

    /// Position of a target column, if the artifact predicts it
    pub fn target_index(&self, name: &str) -> Option<usize> {
        self.targets.iter().position(|t| t == name)
    }

    /// Target column name carrying a category's potential savings
    pub fn potential_target(category: Category) -> String {
        format!("Potential_Savings_{}", category.name())
    }
}
