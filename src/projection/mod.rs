//! src/projection/mod.rs
//!
//! The wealth projection engine: compound growth per account, net worth,
//! time-to-target and passive income, all driven by the allocations resolved
//! during valuation.

pub mod contributions;
pub mod growth;
pub mod target;

pub use contributions::Contributions;
pub use growth::{future_value, net_worth, weighted_annual_return};
pub use target::{simulate, TimeToTarget};

use crate::compute::Valuation;
use crate::config::EngineConfig;
use crate::store::{Account, Entry};
use rayon::prelude::*;
use serde::Serialize;

/// Year-by-year projected value of one account.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSchedule {
    pub account_id: String,
    pub name: String,
    /// `values[i]` is the projected value at the end of year `i + 1`.
    pub values: Vec<f64>,
}

pub struct WealthProjector<'a> {
    accounts: &'a [Account],
    contributions: Contributions,
    /// Monthly total of wealth-building entries; feeds time-to-target.
    monthly_savings: f64,
    config: EngineConfig,
}

impl<'a> WealthProjector<'a> {
    pub fn new(
        accounts: &'a [Account],
        contributions: Contributions,
        monthly_savings: f64,
        config: &EngineConfig,
    ) -> Self {
        Self { accounts, contributions, monthly_savings, config: config.clone() }
    }

    /// Builds a projector from a finished valuation of `entries`.
    pub fn from_valuation(
        accounts: &'a [Account],
        entries: &[Entry],
        valuation: &Valuation,
        config: &EngineConfig,
    ) -> Self {
        let contributions = Contributions::collect(entries, valuation);
        Self::new(accounts, contributions, valuation.totals.wealth_building, config)
    }

    pub fn contributions(&self) -> &Contributions {
        &self.contributions
    }

    pub fn monthly_savings(&self) -> f64 {
        self.monthly_savings
    }

    /// Value of `account` after `years`, at its own expected return and with
    /// the allocations that target it as the monthly contribution.
    pub fn project_account_value(&self, account: &Account, years: f64) -> f64 {
        future_value(
            account.balance,
            account.expected_return,
            self.contributions.for_account(&account.id),
            years,
        )
    }

    pub fn net_worth(&self) -> f64 {
        net_worth(self.accounts)
    }

    pub fn weighted_annual_return(&self) -> f64 {
        weighted_annual_return(self.accounts, self.config.default_annual_return)
    }

    /// Months until net worth first reaches `target`, saving the monthly
    /// wealth-building total and growing at the weighted return.
    pub fn time_to_target(&self, target: f64) -> TimeToTarget {
        let rate = self.weighted_annual_return();
        let outcome = simulate(self.net_worth(), rate, self.monthly_savings, target, self.config.max_months);
        match outcome {
            TimeToTarget::Reached { months } => tracing::debug!(target_value = target, rate, months, "target reached in simulation"),
            TimeToTarget::Unreachable => tracing::warn!(
                target_value = target,
                rate,
                contribution = self.monthly_savings,
                max_months = self.config.max_months,
                "target unreachable"
            ),
        }
        outcome
    }

    /// Sustainable yearly draw at the configured withdrawal rate.
    pub fn passive_income(&self) -> f64 {
        self.passive_income_at(self.config.withdrawal_rate)
    }

    pub fn passive_income_at(&self, withdrawal_rate: f64) -> f64 {
        self.net_worth() * withdrawal_rate
    }

    /// Sum of projected values of the active accounts after `years`.
    pub fn projected_net_worth(&self, years: f64) -> f64 {
        self.accounts
            .iter()
            .filter(|a| a.is_active)
            .map(|a| self.project_account_value(a, years))
            .sum()
    }

    /// Projects every account for years `1..=years`, one account per task.
    pub fn schedule(&self, years: u32) -> Vec<AccountSchedule> {
        self.accounts
            .par_iter()
            .map(|account| AccountSchedule {
                account_id: account.id.clone(),
                name: account.name.clone(),
                values: (1..=years).map(|y| self.project_account_value(account, y as f64)).collect(),
            })
            .collect()
    }
}
