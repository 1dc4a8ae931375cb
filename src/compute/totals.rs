//! Coarse aggregates over resolved monthly values.

use crate::store::{Entry, EntryType, Frequency};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many expense categories a breakdown keeps before folding the rest.
pub const BREAKDOWN_TOP_N: usize = 8;
pub const OTHER_CATEGORY: &str = "Other";

/// Monthly totals per entry type.
///
/// `net` is income minus expense only: investments and allocations move money
/// into wealth-building and are not counted as consumption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub income: f64,
    pub expense: f64,
    pub investment: f64,
    pub allocation: f64,
    /// Every investment, plus allocations flagged as wealth-building.
    pub wealth_building: f64,
    pub net: f64,
}

impl Aggregates {
    /// `monthly` must be aligned with `entries`.
    pub fn from_entries(entries: &[Entry], monthly: &[f64]) -> Self {
        let mut totals = Self::default();
        for (entry, &value) in entries.iter().zip(monthly) {
            match entry.entry_type {
                EntryType::Income => totals.income += value,
                EntryType::Expense => totals.expense += value,
                EntryType::Investment => {
                    totals.investment += value;
                    totals.wealth_building += value;
                }
                EntryType::Allocation => {
                    totals.allocation += value;
                    if entry.is_wealth_building {
                        totals.wealth_building += value;
                    }
                }
            }
        }
        totals.net = totals.income - totals.expense;
        totals
    }

    /// The same totals expressed per `view` period.
    pub fn in_view(&self, view: Frequency) -> Self {
        let f = view.view_factor();
        Self {
            income: self.income * f,
            expense: self.expense * f,
            investment: self.investment * f,
            allocation: self.allocation * f,
            wealth_building: self.wealth_building * f,
            net: self.net * f,
        }
    }

    /// Share of income left after expenses; 0 when there is no income.
    pub fn savings_rate(&self) -> f64 {
        if self.income > 0.0 {
            self.net / self.income
        } else {
            0.0
        }
    }
}

/// Monthly totals of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub income: f64,
    pub expense: f64,
    /// Investments and allocations.
    pub invested: f64,
}

/// Per-category totals, keyed by category name in sorted order.
/// Entries without a category are left out.
pub fn totals_by_category(entries: &[Entry], monthly: &[f64]) -> BTreeMap<String, CategoryTotals> {
    let mut out: BTreeMap<String, CategoryTotals> = BTreeMap::new();
    for (entry, &value) in entries.iter().zip(monthly) {
        if entry.category.is_empty() {
            continue;
        }
        let slot = out.entry(entry.category.clone()).or_default();
        match entry.entry_type {
            EntryType::Income => slot.income += value,
            EntryType::Expense => slot.expense += value,
            EntryType::Investment | EntryType::Allocation => slot.invested += value,
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub category: String,
    pub income: f64,
    pub expense: f64,
}

/// Categories with a positive expense, largest first (ties by name).
///
/// Only the top [`BREAKDOWN_TOP_N`] are kept; the remainder is folded into a
/// single `Other` row.
pub fn expense_breakdown(by_category: &BTreeMap<String, CategoryTotals>) -> Vec<BreakdownRow> {
    let mut rows: Vec<BreakdownRow> = by_category
        .iter()
        .map(|(category, t)| BreakdownRow {
            category: category.clone(),
            income: t.income.max(0.0),
            expense: t.expense.max(0.0),
        })
        .filter(|row| row.expense > 0.0)
        .collect();

    rows.sort_by(|a, b| b.expense.total_cmp(&a.expense).then_with(|| a.category.cmp(&b.category)));

    if rows.len() > BREAKDOWN_TOP_N {
        let rest = rows.split_off(BREAKDOWN_TOP_N);
        let other = rest.into_iter().fold(
            BreakdownRow { category: OTHER_CATEGORY.to_string(), income: 0.0, expense: 0.0 },
            |mut acc, row| {
                acc.income += row.income;
                acc.expense += row.expense;
                acc
            },
        );
        rows.push(other);
    }
    rows
}
