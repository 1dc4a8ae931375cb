//! The validator that checks a proposed account update before it is applied.
use super::error::{ValidationError, ValidationErrorType};
use super::rules::{names, numbers};
use crate::store::{Account, AccountType};

/// A partial edit of an account. `None` leaves the field untouched.
///
/// `account_type` is raw text from the editing layer so that unknown values
/// can be reported rather than rejected at deserialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub account_type: Option<String>,
    pub balance: Option<f64>,
    pub expected_return: Option<f64>,
    pub is_active: Option<bool>,
}

/// The checked form of an [`AccountUpdate`], ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValidUpdate {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<f64>,
    pub expected_return: Option<f64>,
    pub is_active: Option<bool>,
}

impl ValidUpdate {
    pub fn apply(self, account: &mut Account) {
        if let Some(name) = self.name {
            account.name = name;
        }
        if let Some(t) = self.account_type {
            account.account_type = t;
        }
        if let Some(b) = self.balance {
            account.balance = b;
        }
        if let Some(r) = self.expected_return {
            account.expected_return = r;
        }
        if let Some(a) = self.is_active {
            account.is_active = a;
        }
    }
}

/// Checks an update against the account it targets and its siblings.
///
/// Like a linter, it collects every problem rather than stopping at the first.
pub struct AccountValidator<'a> {
    accounts: &'a [Account],
}

impl<'a> AccountValidator<'a> {
    pub fn new(accounts: &'a [Account]) -> Self {
        Self { accounts }
    }

    /// # Returns
    /// - `Ok(ValidUpdate)` if every supplied field is acceptable.
    /// - `Err(Vec<ValidationError>)` containing all problems found.
    pub(crate) fn validate(&self, account_id: &str, update: &AccountUpdate) -> Result<ValidUpdate, Vec<ValidationError>> {
        if !self.accounts.iter().any(|a| a.id == account_id) {
            return Err(vec![ValidationError::new(
                account_id,
                "id",
                ValidationErrorType::UnknownAccount,
                format!("No account with id '{}'", account_id),
            )]);
        }

        let mut errors = Vec::new();

        let name = update.name.as_deref().and_then(|raw| {
            names::validate_name(self.accounts, account_id, raw).map_err(|e| errors.push(e)).ok()
        });

        let account_type = update.account_type.as_deref().and_then(|raw| {
            raw.parse::<AccountType>()
                .map_err(|msg| {
                    errors.push(ValidationError::new(account_id, "type", ValidationErrorType::InvalidType, msg))
                })
                .ok()
        });

        let balance = update
            .balance
            .and_then(|v| numbers::validate_finite(account_id, "balance", v).map_err(|e| errors.push(e)).ok());
        let expected_return = update
            .expected_return
            .and_then(|v| numbers::validate_finite(account_id, "expectedReturn", v).map_err(|e| errors.push(e)).ok());

        if errors.is_empty() {
            Ok(ValidUpdate { name, account_type, balance, expected_return, is_active: update.is_active })
        } else {
            Err(errors)
        }
    }
}
