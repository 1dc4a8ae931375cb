//! Numeric field rule: balances and rates must be finite.

use crate::validation::error::{ValidationError, ValidationErrorType};

pub(crate) fn validate_finite(account_id: &str, field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::new(
            account_id,
            field,
            ValidationErrorType::NonFiniteNumber,
            format!("{} must be a finite number, got {}", field, value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_rejects_non_finite(#[case] value: f64) {
        let err = validate_finite("a", "balance", value).unwrap_err();
        assert_eq!(err.error_type, ValidationErrorType::NonFiniteNumber);
        assert_eq!(err.field, "balance");
    }

    #[test]
    fn test_accepts_negative_and_zero() {
        assert_eq!(validate_finite("a", "expectedReturn", -0.02), Ok(-0.02));
        assert_eq!(validate_finite("a", "balance", 0.0), Ok(0.0));
    }
}
