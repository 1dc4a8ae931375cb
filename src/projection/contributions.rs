//! Per-account monthly inflow from allocation entries.

use crate::compute::Valuation;
use crate::store::{Entry, EntryType};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contributions {
    per_account: HashMap<String, f64>,
}

impl Contributions {
    /// Sums the resolved monthly value of every allocation, per target account.
    pub fn collect(entries: &[Entry], valuation: &Valuation) -> Self {
        Self::from_monthly(entries, valuation.monthly_values())
    }

    /// As [`Contributions::collect`], with `monthly` aligned to `entries`.
    pub fn from_monthly(entries: &[Entry], monthly: &[f64]) -> Self {
        let mut per_account: HashMap<String, f64> = HashMap::new();
        for (entry, &value) in entries.iter().zip(monthly) {
            if entry.entry_type != EntryType::Allocation {
                continue;
            }
            match entry.target_account.as_deref() {
                Some(target) if !target.is_empty() => *per_account.entry(target.to_string()).or_insert(0.0) += value,
                _ => {}
            }
        }
        Self { per_account }
    }

    pub fn for_account(&self, account_id: &str) -> f64 {
        self.per_account.get(account_id).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.per_account.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.per_account.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Frequency;

    #[test]
    fn test_sums_allocations_per_account() {
        let entries = vec![
            Entry::amount("a", EntryType::Allocation, "401k", 500.0, Frequency::Monthly).targeting("acc-1"),
            Entry::amount("b", EntryType::Allocation, "Match", 1200.0, Frequency::Yearly).targeting("acc-1"),
            Entry::amount("c", EntryType::Allocation, "Rainy day", 50.0, Frequency::Monthly).targeting("acc-2"),
            Entry::amount("d", EntryType::Allocation, "Loose", 70.0, Frequency::Monthly),
            Entry::amount("e", EntryType::Expense, "Rent", 900.0, Frequency::Monthly).targeting("acc-2"),
        ];
        let monthly = [500.0, 100.0, 50.0, 70.0, 900.0];

        let c = Contributions::from_monthly(&entries, &monthly);
        assert_eq!(c.for_account("acc-1"), 600.0);
        assert_eq!(c.for_account("acc-2"), 50.0, "only allocations count");
        assert_eq!(c.for_account("acc-3"), 0.0);
        assert_eq!(c.total(), 650.0);
    }
}
