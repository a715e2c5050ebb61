//! spendlens-coach: per-category savings recommendations.
//!
//! One interface, two strategies: fixed-percentage heuristics, or a
//! trained scoring artifact when one is available on disk.

pub mod artifact;
pub mod cache;
pub mod coach;
pub mod profile;
pub mod strategy;

pub use artifact::{ArtifactError, BASE_FEATURES, REDUCIBLE_CATEGORIES, ScoringArtifact};
pub use cache::ModelCache;
pub use coach::{CoachReport, CoachStatus, SavingsCoach, spend_by_category};
pub use profile::UserProfile;
pub use strategy::{
    HeuristicStrategy, ModelStrategy, Proposal, SAVINGS_RATE, SavingsStrategy, TOP_OPPORTUNITIES,
};
