//! Period-over-period deltas for totals and per-category breakdowns.

use crate::aggregate::Bucket;
use crate::category::Category;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// How many category shifts to report per period pair
pub const TOP_SHIFTS: usize = 3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    #[serde(rename = "more")]
    More,
    #[serde(rename = "less")]
    Less,
    #[serde(rename = "same")]
    Same,
}

/// Signed change between two buckets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delta {
    pub diff: Decimal,
    pub direction: Direction,
}

/// Change between two named periods (months or weeks)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeriodDelta {
    pub prev_key: String,
    pub cur_key: String,
    pub delta: Delta,
}

/// Per-category change between two periods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDelta {
    pub category: Category,
    pub diff: Decimal,
    pub direction: Direction,
}

/// Compare two buckets by total
pub fn delta(current: &Bucket, previous: &Bucket) -> Delta {
    let diff = current.total - previous.total;
    let direction = if diff > Decimal::ZERO {
        Direction::More
    } else if diff < Decimal::ZERO {
        Direction::Less
    } else {
        Direction::Same
    };
    Delta { diff, direction }
}

/// Deltas across every consecutive pair of period keys, oldest first.
/// A single observed period gives no history to compare against, so the
/// result is simply empty.
pub fn period_deltas(periods: &BTreeMap<String, Bucket>) -> Vec<PeriodDelta> {
    let keys: Vec<&String> = periods.keys().collect();
    keys.windows(2)
        .map(|pair| PeriodDelta {
            prev_key: pair[0].clone(),
            cur_key: pair[1].clone(),
            delta: delta(&periods[pair[1]], &periods[pair[0]]),
        })
        .collect()
}

/// Last period vs the one before it, if at least two periods exist
pub fn latest_delta(periods: &BTreeMap<String, Bucket>) -> Option<PeriodDelta> {
    period_deltas(periods).pop()
}

/// Per-category deltas between two periods, ranked by magnitude of change
/// descending. Categories absent from a period count as zero. Ties on
/// magnitude break by category name ascending, so the ranking is stable.
pub fn category_shifts(
    current: &BTreeMap<Category, Bucket>,
    previous: &BTreeMap<Category, Bucket>,
    top_n: usize,
) -> Vec<CategoryDelta> {
    let categories: BTreeSet<Category> = current.keys().chain(previous.keys()).copied().collect();

    let mut shifts: Vec<CategoryDelta> = categories
        .into_iter()
        .filter_map(|category| {
            let cur = current.get(&category).copied().unwrap_or_default();
            let prev = previous.get(&category).copied().unwrap_or_default();
            let d = delta(&cur, &prev);
            (d.direction != Direction::Same).then_some(CategoryDelta {
                category,
                diff: d.diff,
                direction: d.direction,
            })
        })
        .collect();

    shifts.sort_by(|a, b| {
        b.diff
            .abs()
            .cmp(&a.diff.abs())
            .then_with(|| a.category.name().cmp(b.category.name()))
    });
    shifts.truncate(top_n);
    shifts
}

impl PeriodDelta {
    /// Templated one-liner naming both period keys
    pub fn describe(&self) -> String {
        match self.delta.direction {
            Direction::More => format!(
                "In {}, you spent {:.2} more than {}.",
                self.cur_key, self.delta.diff, self.prev_key
            ),
            Direction::Less => format!(
                "In {}, you spent {:.2} less than {}.",
                self.cur_key, -self.delta.diff, self.prev_key
            ),
            Direction::Same => format!(
                "In {}, your spending was the same as {}.",
                self.cur_key, self.prev_key
            ),
        }
    }
}
