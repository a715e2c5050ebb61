//! User profile fed into the savings strategies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income plus the demographic fields the scoring model was trained on.
/// Everything except income has a sensible default so a bare income is
/// enough to ask for advice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Monthly income, major currency units
    pub income: Decimal,
    pub age: u32,
    pub dependents: u32,
    pub occupation: String,
    pub city_tier: String,
}

impl UserProfile {
    pub fn new(income: Decimal) -> Self {
        Self {
            income,
            age: 30,
            dependents: 0,
            occupation: "Unknown".to_string(),
            city_tier: "Tier_2".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let profile = UserProfile::new(dec!(50000));
        assert_eq!(profile.income, dec!(50000));
        assert_eq!(profile.age, 30);
        assert_eq!(profile.dependents, 0);
        assert_eq!(profile.occupation, "Unknown");
        assert_eq!(profile.city_tier, "Tier_2");
    }
}
