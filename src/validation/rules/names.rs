//! Account naming rule.

use crate::store::Account;
use crate::validation::error::{ValidationError, ValidationErrorType};

/// Names must be non-empty and unique among the *other* accounts, ignoring
/// case and surrounding whitespace. Returns the trimmed name to store.
pub(crate) fn validate_name(accounts: &[Account], account_id: &str, raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::new(
            account_id,
            "name",
            ValidationErrorType::EmptyName,
            "Account name cannot be empty",
        ));
    }

    let key = name.to_lowercase();
    let clash = accounts
        .iter()
        .find(|a| a.id != account_id && a.name.trim().to_lowercase() == key);
    if let Some(other) = clash {
        return Err(ValidationError::new(
            account_id,
            "name",
            ValidationErrorType::DuplicateName,
            format!("An account named '{}' already exists", other.name),
        ));
    }

    Ok(name.to_string())
}
