//! Canonical budget categories and the keyword normalizer.
//!
//! Raw user-entered category text is mapped onto a fixed enum via an
//! ordered keyword table — substring match, first hit wins, everything
//! else lands in Miscellaneous.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed set of budget categories used for all analysis
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "Rent")]
    Rent,
    #[serde(rename = "Loan_Repayment")]
    LoanRepayment,
    #[serde(rename = "Insurance")]
    Insurance,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Eating_Out")]
    EatingOut,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Utilities")]
    Utilities,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Miscellaneous")]
    Miscellaneous,
}

/// Ordered keyword table. Evaluated top to bottom; the first keyword
/// contained in the (trimmed, lowercased) input decides the category.
pub const KEYWORD_RULES: &[(&str, Category)] = &[
    ("rent", Category::Rent),
    ("loan", Category::LoanRepayment),
    ("repayment", Category::LoanRepayment),
    ("insurance", Category::Insurance),
    ("eating out", Category::EatingOut),
    ("restaurant", Category::EatingOut),
    ("fast food", Category::EatingOut),
    ("groceries", Category::Groceries),
    ("grocery", Category::Groceries),
    ("food", Category::Groceries),
    ("transport", Category::Transport),
    ("ride", Category::Transport),
    ("fuel", Category::Transport),
    ("entertainment", Category::Entertainment),
    ("utilities", Category::Utilities),
    ("bill", Category::Utilities),
    ("healthcare", Category::Healthcare),
    ("health", Category::Healthcare),
    ("education", Category::Education),
    ("study", Category::Education),
    ("miscellaneous", Category::Miscellaneous),
    ("misc", Category::Miscellaneous),
    ("other", Category::Miscellaneous),
];

/// All categories, in display order
pub const ALL_CATEGORIES: &[Category] = &[
    Category::Rent,
    Category::LoanRepayment,
    Category::Insurance,
    Category::Groceries,
    Category::Transport,
    Category::EatingOut,
    Category::Entertainment,
    Category::Utilities,
    Category::Healthcare,
    Category::Education,
    Category::Miscellaneous,
];

impl Category {
    /// Map free-text category input onto the canonical set.
    /// Total and pure: every input resolves to some category.
    pub fn normalize(raw: &str) -> Category {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return Category::Miscellaneous;
        }
        for (keyword, category) in KEYWORD_RULES {
            if needle.contains(keyword) {
                return *category;
            }
        }
        Category::Miscellaneous
    }

    /// Canonical column name (matches the scoring artifact's spend columns)
    pub fn name(&self) -> &'static str {
        match self {
            Category::Rent => "Rent",
            Category::LoanRepayment => "Loan_Repayment",
            Category::Insurance => "Insurance",
            Category::Groceries => "Groceries",
            Category::Transport => "Transport",
            Category::EatingOut => "Eating_Out",
            Category::Entertainment => "Entertainment",
            Category::Utilities => "Utilities",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Miscellaneous => "Miscellaneous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
