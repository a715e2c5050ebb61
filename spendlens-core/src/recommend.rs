//! Output shape shared by every savings-recommendation strategy.
//!
//! Both the heuristic and the model-backed coach produce this exact shape,
//! so consumers never branch on which strategy ran.

use crate::category::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecPriority {
    #[serde(rename = "high")]
    High,
    #[serde(rename = "low")]
    Low,
}

/// One actionable per-category savings suggestion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub category: Category,
    pub message: String,
    /// Suggested monthly budget for the category, major units
    pub suggested_target: Decimal,
    pub priority: RecPriority,
}
