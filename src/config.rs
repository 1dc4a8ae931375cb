//! Engine tunables. Every field has a default, so an empty document is valid.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Deepest reference chain the valuation engine will follow.
pub const DEFAULT_MAX_DEPTH: usize = 50;
/// Month cap for the time-to-target simulation (50 years).
pub const DEFAULT_MAX_MONTHS: u32 = 600;
/// Assumed annual return when there is no active balance to weight by.
pub const DEFAULT_ANNUAL_RETURN: f64 = 0.07;
pub const DEFAULT_WITHDRAWAL_RATE: f64 = 0.04;

/// Upper limit accepted for `max_depth`; the resolver recurses once per hop.
const MAX_DEPTH_LIMIT: usize = 1_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub max_depth: usize,
    pub max_months: u32,
    pub default_annual_return: f64,
    pub withdrawal_rate: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_months: DEFAULT_MAX_MONTHS,
            default_annual_return: DEFAULT_ANNUAL_RETURN,
            withdrawal_rate: DEFAULT_WITHDRAWAL_RATE,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::info!(path = %path.as_ref().display(), "loaded engine config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "maxDepth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        if self.max_months == 0 {
            return Err(ConfigError::Invalid("maxMonths must be greater than 0".to_string()));
        }
        if !self.default_annual_return.is_finite() {
            return Err(ConfigError::Invalid("defaultAnnualReturn must be a finite number".to_string()));
        }
        if !(self.withdrawal_rate > 0.0 && self.withdrawal_rate < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "withdrawalRate must be between 0 and 1 (e.g. 0.04), got {}",
                self.withdrawal_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.max_months, 600);
    }

    #[test]
    fn test_partial_override() {
        let config = EngineConfig::from_json_str(r#"{ "withdrawalRate": 0.035, "maxMonths": 120 }"#).unwrap();
        assert_eq!(config.withdrawal_rate, 0.035);
        assert_eq!(config.max_months, 120);
        assert_eq!(config.default_annual_return, DEFAULT_ANNUAL_RETURN);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        for json in [
            r#"{ "withdrawalRate": 1.5 }"#,
            r#"{ "withdrawalRate": 0 }"#,
            r#"{ "maxMonths": 0 }"#,
            r#"{ "maxDepth": 100000 }"#,
        ] {
            let err = EngineConfig::from_json_str(json).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}: {}", json, err);
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(EngineConfig::from_json_str("{ nope"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "maxDepth": 10, "defaultAnnualReturn": 0.05 }}"#).unwrap();

        let config = EngineConfig::from_path(file.path()).unwrap();
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.default_annual_return, 0.05);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::from_path(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
