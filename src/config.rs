use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};

/// engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// applications a customer may have in SUBMITTED or UNDER_REVIEW at once
    pub max_active_applications: u32,
    /// times a transition is re-validated after losing a write race
    pub max_conflict_retries: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_active_applications: 3,
            max_conflict_retries: 16,
        }
    }
}

impl EngineConfig {
    /// parse from json, missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_max_active_applications(mut self, limit: u32) -> Self {
        self.max_active_applications = limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_active_applications == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max_active_applications must be at least 1".to_string(),
            });
        }
        if self.max_conflict_retries == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max_conflict_retries must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_active_applications, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "max_active_applications": 5 }"#).unwrap();
        assert_eq!(config.max_active_applications, 5);
        assert_eq!(config.max_conflict_retries, 16);
    }

    #[test]
    fn test_rejects_zero_ceiling() {
        let err = EngineConfig::from_json(r#"{ "max_active_applications": 0 }"#).unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        let err = EngineConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_zero_conflict_retries() {
        let err = EngineConfig::from_json(r#"{ "max_conflict_retries": 0 }"#).unwrap_err();
        assert!(matches!(err, LoanError::InvalidConfiguration { .. }));

        let config = EngineConfig::from_json(r#"{ "max_conflict_retries": 1 }"#).unwrap();
        assert_eq!(config.max_conflict_retries, 1);
    }
}
