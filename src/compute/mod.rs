//! Resolves entries to monthly values.
pub mod cache;
pub mod engine;
pub mod ledger;
pub mod totals;

pub use cache::{fingerprint, EvaluationCache};
pub use engine::{evaluate, Diagnostics, Valuation, ValuationEngine};
pub use ledger::{Ledger, ZeroCause};
pub use totals::{expense_breakdown, totals_by_category, Aggregates, BreakdownRow, CategoryTotals};
