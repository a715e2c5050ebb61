//! spendlens-core: spending analytics over transaction snapshots.
//!
//! Everything here is a pure function over caller-supplied data: the crate
//! holds no state between calls and never mutates a transaction.

pub mod aggregate;
pub mod anomaly;
pub mod category;
pub mod insight;
pub mod patterns;
pub mod recommend;
pub mod stats;
pub mod transaction;
pub mod trend;

pub use aggregate::{
    Bucket, MonthSummary, aggregate, by_category, by_month, by_week, by_weekday, month_key,
    monthly_summary, total_amount, week_key,
};
pub use anomaly::{
    AnomalyDirection, AnomalyRecord, CategoryPolicy, MonthlyPolicy, detect_by_category,
    detect_by_month,
};
pub use category::{ALL_CATEGORIES, Category, KEYWORD_RULES};
pub use insight::{
    ANOMALY_LIMIT, HIGH_SHARE_PCT, Insight, InsightKind, InsightPriority, synthesize,
};
pub use recommend::{RecPriority, Recommendation};
pub use transaction::{
    DataQuality, MemorySource, StoredRow, Transaction, TransactionSource, TxnKind, from_rows,
};
pub use trend::{
    CategoryDelta, Delta, Direction, PeriodDelta, TOP_SHIFTS, category_shifts, delta,
    latest_delta, period_deltas,
};
