//! Month-by-month search for when net worth first reaches a target.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum TimeToTarget {
    Reached { months: u32 },
    /// No contribution to grow with, or the month cap was hit first.
    Unreachable,
}

impl TimeToTarget {
    pub fn months(&self) -> Option<u32> {
        match self {
            TimeToTarget::Reached { months } => Some(*months),
            TimeToTarget::Unreachable => None,
        }
    }

    pub fn years(&self) -> Option<f64> {
        self.months().map(|m| m as f64 / 12.0)
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, TimeToTarget::Reached { .. })
    }
}

/// Steps `net_worth = net_worth * (1 + r/12) + contribution` until it reaches
/// `target`, for at most `max_months` steps.
///
/// A non-positive contribution is unreachable outright: there is no growth
/// path to simulate, whatever the starting balance.
pub fn simulate(
    start_net_worth: f64,
    annual_rate: f64,
    monthly_contribution: f64,
    target: f64,
    max_months: u32,
) -> TimeToTarget {
    if monthly_contribution <= 0.0 || target.is_nan() {
        return TimeToTarget::Unreachable;
    }

    let monthly_rate = annual_rate / 12.0;
    let mut net_worth = start_net_worth;
    let mut months = 0;

    while net_worth < target {
        if months >= max_months {
            return TimeToTarget::Unreachable;
        }
        net_worth = net_worth * (1.0 + monthly_rate) + monthly_contribution;
        months += 1;
    }
    TimeToTarget::Reached { months }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_contribution_is_unreachable() {
        assert_eq!(simulate(1_000.0, 0.07, 0.0, 2_000.0, 600), TimeToTarget::Unreachable);
        assert_eq!(simulate(1_000.0, 0.07, -10.0, 500.0, 600), TimeToTarget::Unreachable);
    }

    #[test]
    fn test_linear_growth_without_return() {
        // 0 -> 1000 at 100/month, no interest: exactly 10 months.
        assert_eq!(simulate(0.0, 0.0, 100.0, 1_000.0, 600), TimeToTarget::Reached { months: 10 });
    }

    #[test]
    fn test_already_at_target() {
        assert_eq!(simulate(5_000.0, 0.07, 100.0, 5_000.0, 600).months(), Some(0));
    }

    #[test]
    fn test_cap_makes_it_unreachable() {
        assert_eq!(simulate(0.0, 0.0, 1.0, 1_000.0, 600), TimeToTarget::Unreachable);
        assert_eq!(simulate(0.0, 0.0, 1.0, 600.0, 600), TimeToTarget::Reached { months: 600 });
        assert_eq!(simulate(0.0, 0.0, 1.0, f64::INFINITY, 600), TimeToTarget::Unreachable);
    }

    #[test]
    fn test_monotonic_in_target() {
        let mut previous = 0;
        for target in (0..40).map(|i| i as f64 * 25_000.0) {
            match simulate(10_000.0, 0.06, 800.0, target, 600) {
                TimeToTarget::Reached { months } => {
                    assert!(months >= previous, "target {} took {} < {}", target, months, previous);
                    previous = months;
                }
                TimeToTarget::Unreachable => previous = u32::MAX,
            }
        }
    }

    #[test]
    fn test_years_helper() {
        assert_eq!(TimeToTarget::Reached { months: 18 }.years(), Some(1.5));
        assert_eq!(TimeToTarget::Unreachable.years(), None);
    }
}
