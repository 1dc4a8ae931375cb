//! Compound growth of a single balance with a fixed monthly contribution.

use crate::store::Account;

/// Future value after `years`, compounding monthly at `annual_rate / 12`.
///
/// With `r = annual_rate / 12` and `n = years * 12`:
/// - `r == 0`: `P + C*n`
/// - otherwise: `P*(1+r)^n + C*((1+r)^n - 1)/r`
pub fn future_value(balance: f64, annual_rate: f64, monthly_contribution: f64, years: f64) -> f64 {
    let r = annual_rate / 12.0;
    let n = years * 12.0;

    if r == 0.0 {
        return balance + monthly_contribution * n;
    }

    let growth = (1.0 + r).powf(n);
    balance * growth + monthly_contribution * (growth - 1.0) / r
}

/// Sum of balances over active accounts. Inactive accounts are excluded.
pub fn net_worth(accounts: &[Account]) -> f64 {
    accounts.iter().filter(|a| a.is_active).map(|a| a.balance).sum()
}

/// Balance-weighted annual return across active accounts.
///
/// Falls back to `fallback` when the active balance total is not positive,
/// since there is nothing meaningful to weight by.
pub fn weighted_annual_return(accounts: &[Account], fallback: f64) -> f64 {
    let (total, weighted) = accounts
        .iter()
        .filter(|a| a.is_active)
        .fold((0.0, 0.0), |(total, weighted), a| (total + a.balance, weighted + a.balance * a.expected_return));

    if total > 0.0 {
        weighted / total
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_one_year_at_seven_percent() {
        let fv = future_value(10_000.0, 0.07, 500.0, 1.0);
        assert!((fv - 16_919.193_453_382_577).abs() < 1e-6, "got {}", fv);
    }

    #[rstest]
    #[case(10_000.0, 500.0, 1.0)]
    #[case(0.0, 250.0, 30.0)]
    #[case(1_234.5, 0.0, 7.0)]
    fn test_zero_rate_is_linear(#[case] balance: f64, #[case] contribution: f64, #[case] years: f64) {
        assert_eq!(future_value(balance, 0.0, contribution, years), balance + contribution * years * 12.0);
    }

    #[test]
    fn test_zero_years_is_balance() {
        assert_eq!(future_value(5_000.0, 0.05, 100.0, 0.0), 5_000.0);
    }

    #[test]
    fn test_net_worth_excludes_inactive() {
        let mut closed = Account::new("c", "Closed", 99_999.0, 0.1);
        closed.is_active = false;
        let accounts = vec![Account::new("a", "A", 1_000.0, 0.05), Account::new("b", "B", 3_000.0, 0.09), closed];

        assert_eq!(net_worth(&accounts), 4_000.0);
        assert!((weighted_annual_return(&accounts, 0.07) - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_return_falls_back_without_balance() {
        let accounts = vec![Account::new("a", "A", 0.0, 0.12)];
        assert_eq!(weighted_annual_return(&accounts, 0.07), 0.07);
        assert_eq!(weighted_annual_return(&[], 0.07), 0.07);
    }
}
