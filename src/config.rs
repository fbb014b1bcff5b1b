//! Engine configuration
//!
//! Rates and thresholds the calculators and alert rules read. Band tables
//! belong to [`Regime`](crate::individual::Regime) and are not configurable.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alerts::{AlertRules, AlertThresholds};
use crate::company::CompanyTaxConfig;
use crate::error::Result;
use crate::vat::VAT_RATE;
use crate::wht::WhtRates;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub company: CompanyTaxConfig,
    pub vat_rate: f64,
    pub wht: WhtRates,
    pub alerts: AlertThresholds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            company: CompanyTaxConfig::default(),
            vat_rate: VAT_RATE,
            wht: WhtRates::default(),
            alerts: AlertThresholds::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn alert_rules(&self) -> AlertRules {
        AlertRules::new(self.alerts.clone(), self.company.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.vat_rate, 0.075);
        assert_eq!(config.company.small_turnover_ceiling, 25_000_000.0);
        assert_eq!(config.company.edt_turnover_threshold, 50_000_000.0);
        assert_eq!(config.wht.company, 0.10);
        assert_eq!(config.alerts.low_profit_ceiling, 10_000_000.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(
            r#"{"vatRate": 0.1, "company": {"edtTurnoverThreshold": 25000000}}"#,
        )
        .unwrap();

        assert_eq!(config.vat_rate, 0.1);
        assert_eq!(config.company.edt_turnover_threshold, 25_000_000.0);
        assert_eq!(config.company.large_rate, 0.30);
        assert_eq!(config.wht, WhtRates::default());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"wht": {{"individual": 0.1}}}}"#).unwrap();

        let config = EngineConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.wht.individual, 0.1);
        assert_eq!(config.wht.company, 0.10);

        assert!(EngineConfig::from_json_str("not json").is_err());
        assert!(EngineConfig::from_json_path(Path::new("/nonexistent/engine.json")).is_err());
    }
}
