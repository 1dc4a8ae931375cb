use super::types::*;
use crate::validation::{AccountUpdate, AccountValidator, ValidationError, ValidationErrorType};
use serde::{Deserialize, Serialize};

const DEFAULT_ACCOUNT_NAME: &str = "New Account";

/// The dry-run report of deleting an account that allocations still target.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePlan {
    pub account_id: String,
    /// Ids of the allocation entries that would be removed with the account.
    pub dependents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The account is gone, along with `removed_entries` (allocation ids).
    Deleted { removed_entries: Vec<String> },
    /// Dependents exist and the caller did not confirm. Nothing changed.
    Cancelled { dependents: Vec<String> },
    NotFound,
}

/// The collection of accounts the allocation entries point into.
///
/// Names are kept unique case-insensitively: `create` picks a free name and
/// `update` rejects clashes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountRegistry {
    accounts: Vec<Account>,
}

impl AccountRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        Self { accounts }
    }

    pub fn accounts(&self) -> &[Account] { &self.accounts }
    pub fn into_accounts(self) -> Vec<Account> { self.accounts }
    pub fn len(&self) -> usize { self.accounts.len() }
    pub fn is_empty(&self) -> bool { self.accounts.is_empty() }

    pub fn get(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Account> {
        let key = name.trim().to_lowercase();
        self.accounts.iter().find(|a| a.name.trim().to_lowercase() == key)
    }

    pub fn active(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter().filter(|a| a.is_active)
    }

    /// Adds a savings account with a fresh id, zero balance, and no expected return.
    pub fn create(&mut self, name: &str) -> &Account {
        let id = uuid::Uuid::new_v4().to_string();

        // --- Unique Name Enforcement ---
        let original_name = match name.trim() {
            "" => DEFAULT_ACCOUNT_NAME,
            trimmed => trimmed,
        };
        let mut candidate_name = original_name.to_string();
        let mut counter = 2;
        while self.find_by_name(&candidate_name).is_some() {
            candidate_name = format!("{} {}", original_name, counter);
            counter += 1;
        }
        // -------------------------------

        tracing::info!(account_id = %id, name = %candidate_name, "account created");
        self.accounts.push(Account::new(id, candidate_name, 0.0, 0.0));
        &self.accounts[self.accounts.len() - 1]
    }

    /// Validates and applies `update` as one unit: either every field changes or none does.
    pub fn update(&mut self, id: &str, update: &AccountUpdate) -> Result<&Account, Vec<ValidationError>> {
        let valid = AccountValidator::new(&self.accounts).validate(id, update).map_err(|errors| {
            tracing::warn!(account_id = %id, errors = errors.len(), "account update rejected");
            errors
        })?;

        match self.accounts.iter_mut().find(|a| a.id == id) {
            Some(account) => {
                valid.apply(account);
                tracing::info!(account_id = %id, "account updated");
                Ok(account)
            }
            None => Err(vec![ValidationError::new(
                id,
                "id",
                ValidationErrorType::UnknownAccount,
                format!("No account with id '{}'", id),
            )]),
        }
    }

    /// Lists the allocation entries that target `id`, without changing anything.
    /// Returns `None` when no such account exists.
    pub fn plan_delete(&self, id: &str, entries: &[Entry]) -> Option<DeletePlan> {
        self.get(id)?;
        let dependents = entries
            .iter()
            .filter(|e| e.entry_type == EntryType::Allocation && e.target_account.as_deref() == Some(id))
            .map(|e| e.id.clone())
            .collect();
        Some(DeletePlan { account_id: id.to_string(), dependents })
    }

    /// Deletes an account. If allocations still target it, the delete only
    /// proceeds when `confirmed` is set, and then removes those entries too.
    pub fn delete(&mut self, id: &str, entries: &mut Vec<Entry>, confirmed: bool) -> DeleteOutcome {
        let plan = match self.plan_delete(id, entries) {
            Some(plan) => plan,
            None => return DeleteOutcome::NotFound,
        };

        if !plan.dependents.is_empty() && !confirmed {
            tracing::warn!(
                account_id = %id,
                dependents = plan.dependents.len(),
                "account delete cancelled: allocations still target it"
            );
            return DeleteOutcome::Cancelled { dependents: plan.dependents };
        }

        entries.retain(|e| !plan.dependents.contains(&e.id));
        self.accounts.retain(|a| a.id != id);
        tracing::info!(account_id = %id, removed_entries = plan.dependents.len(), "account deleted");
        DeleteOutcome::Deleted { removed_entries: plan.dependents }
    }
}
