use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::errors::{LedgerError, Result};

pub const DEFAULT_CURRENCY: &str = "BRL";
pub const DEFAULT_MAX_INSTALLMENTS: u8 = 12;
pub const DEFAULT_LOG_FILTER: &str = "purchase_ledger=info";

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LedgerConfig {
    /// iso 4217 code used for display
    pub currency: String,
    /// upper bound on installments for a credit payment
    pub max_installments: u8,
    /// tracing filter directive installed by `logging::init_from_config`
    pub log_filter: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            max_installments: DEFAULT_MAX_INSTALLMENTS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl LedgerConfig {
    /// parse and validate a json document; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json).map_err(|e| {
            LedgerError::InvalidConfiguration {
                message: e.to_string(),
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_installments == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "maxInstallments must be at least 1".to_string(),
            });
        }

        let currency = self.currency.as_bytes();
        if currency.len() != 3 || !currency.iter().all(|c| c.is_ascii_uppercase()) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("currency must be a 3-letter code, got {:?}", self.currency),
            });
        }

        if let Err(err) = EnvFilter::try_new(&self.log_filter) {
            return Err(LedgerError::InvalidConfiguration {
                message: format!("invalid logFilter {:?}: {}", self.log_filter, err),
            });
        }

        Ok(())
    }

    pub fn with_max_installments(mut self, max: u8) -> Self {
        self.max_installments = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.currency, "BRL");
        assert_eq!(config.max_installments, 12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = LedgerConfig::from_json_str(r#"{ "maxInstallments": 6 }"#).unwrap();
        assert_eq!(config.max_installments, 6);
        assert_eq!(config.currency, "BRL");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);

        let config = LedgerConfig::from_json_str(r#"{ "logFilter": "purchase_ledger=trace" }"#).unwrap();
        assert_eq!(config.log_filter, "purchase_ledger=trace");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            LedgerConfig::from_json_str(r#"{ "maxInstallments": 0 }"#),
            Err(LedgerError::InvalidConfiguration { .. })
        ));
        assert!(LedgerConfig::from_json_str(r#"{ "currency": "reais" }"#).is_err());
        assert!(LedgerConfig::from_json_str("not json").is_err());
        assert!(LedgerConfig::from_json_str(r#"{ "logFilter": "purchase_ledger=loud" }"#).is_err());
    }
}
