//! Company income tax (CIT) and education tax (EDT)
//!
//! Size class, and therefore the CIT rate, depends only on annual turnover.
//! EDT is gated on its own turnover threshold, which is deliberately kept
//! separate from the classification thresholds.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// Company size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    Small,
    Medium,
    Large,
}

impl CompanySize {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanySize::Small => "Small",
            CompanySize::Medium => "Medium",
            CompanySize::Large => "Large",
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Company", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompanyClassification {
    pub size: CompanySize,
    pub rate: f64,
}

/// Thresholds and rates for company taxation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyTaxConfig {
    /// Turnover below this is Small
    pub small_turnover_ceiling: f64,
    /// Turnover at or above this is Large
    pub large_turnover_floor: f64,
    pub medium_rate: f64,
    pub large_rate: f64,
    /// Education tax rate on assessable profit
    pub edt_rate: f64,
    /// EDT applies only when turnover exceeds this
    pub edt_turnover_threshold: f64,
}

impl Default for CompanyTaxConfig {
    fn default() -> Self {
        Self {
            small_turnover_ceiling: 25_000_000.0,
            large_turnover_floor: 100_000_000.0,
            medium_rate: 0.20,
            large_rate: 0.30,
            edt_rate: 0.025,
            edt_turnover_threshold: 50_000_000.0,
        }
    }
}

impl CompanyTaxConfig {
    /// Classify by turnover; each band includes its lower bound and excludes its upper
    pub fn classify(&self, turnover: f64) -> CompanyClassification {
        if turnover < self.small_turnover_ceiling {
            CompanyClassification { size: CompanySize::Small, rate: 0.0 }
        } else if turnover < self.large_turnover_floor {
            CompanyClassification { size: CompanySize::Medium, rate: self.medium_rate }
        } else {
            CompanyClassification { size: CompanySize::Large, rate: self.large_rate }
        }
    }

    pub fn edt_applies(&self, turnover: f64) -> bool {
        turnover > self.edt_turnover_threshold
    }

    pub fn compute(&self, turnover: f64, expenses: f64) -> CompanyTaxResult {
        let profit = (turnover - expenses).max(0.0);
        let classification = self.classify(turnover);
        let cit_payable = profit * classification.rate;

        let edt_applicable = self.edt_applies(turnover);
        let edt_payable = if edt_applicable { profit * self.edt_rate } else { 0.0 };

        debug!(
            "company: turnover={:.2} profit={:.2} size={:?} cit={:.2} edt={:.2}",
            turnover, profit, classification.size, cit_payable, edt_payable
        );

        CompanyTaxResult {
            turnover,
            expenses,
            profit,
            classification,
            cit_payable,
            edt_applicable,
            edt_payable,
            total_company_tax: cit_payable + edt_payable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTaxResult {
    pub turnover: f64,
    pub expenses: f64,
    pub profit: f64,
    pub classification: CompanyClassification,
    pub cit_payable: f64,
    pub edt_applicable: bool,
    pub edt_payable: f64,
    pub total_company_tax: f64,
}

/// Classify under the default thresholds
pub fn classify(turnover: f64) -> CompanyClassification {
    CompanyTaxConfig::default().classify(turnover)
}

/// Compute CIT and EDT under the default thresholds and rates
pub fn compute_company_tax(turnover: f64, expenses: f64) -> CompanyTaxResult {
    CompanyTaxConfig::default().compute(turnover, expenses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_classification_boundaries() {
        assert_eq!(classify(0.0).size, CompanySize::Small);
        assert_eq!(classify(24_999_999.0).size, CompanySize::Small);
        assert_eq!(classify(25_000_000.0).size, CompanySize::Medium);
        assert_eq!(classify(99_999_999.0).size, CompanySize::Medium);
        assert_eq!(classify(100_000_000.0).size, CompanySize::Large);

        assert_eq!(classify(1_000.0).rate, 0.0);
        assert_eq!(classify(30_000_000.0).rate, 0.20);
        assert_eq!(classify(500_000_000.0).rate, 0.30);
    }

    #[test]
    fn test_medium_company_below_edt_threshold() {
        let result = compute_company_tax(30_000_000.0, 5_000_000.0);

        assert_eq!(result.profit, 25_000_000.0);
        assert_eq!(result.classification.size, CompanySize::Medium);
        assert_relative_eq!(result.cit_payable, 5_000_000.0, epsilon = 1e-6);
        assert!(!result.edt_applicable);
        assert_eq!(result.edt_payable, 0.0);
        assert_relative_eq!(result.total_company_tax, 5_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_edt_threshold_is_exclusive() {
        let at = compute_company_tax(50_000_000.0, 10_000_000.0);
        assert_eq!(at.edt_payable, 0.0);

        let above = compute_company_tax(60_000_000.0, 20_000_000.0);
        assert!(above.edt_applicable);
        assert_relative_eq!(above.edt_payable, 1_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(above.total_company_tax, 8_000_000.0 + 1_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_large_company() {
        let result = compute_company_tax(200_000_000.0, 150_000_000.0);
        assert_eq!(result.classification.size, CompanySize::Large);
        assert_relative_eq!(result.cit_payable, 15_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(result.edt_payable, 1_250_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_loss_gives_zero_profit() {
        let result = compute_company_tax(40_000_000.0, 90_000_000.0);
        assert_eq!(result.profit, 0.0);
        assert_eq!(result.total_company_tax, 0.0);
    }

    #[test]
    fn test_small_company_pays_no_cit() {
        let result = compute_company_tax(20_000_000.0, 2_000_000.0);
        assert_eq!(result.classification.size, CompanySize::Small);
        assert_eq!(result.cit_payable, 0.0);
        assert_eq!(result.total_company_tax, 0.0);
    }

    #[test]
    fn test_thresholds_configured_independently() {
        let config = CompanyTaxConfig {
            edt_turnover_threshold: 10_000_000.0,
            ..Default::default()
        };
        let result = config.compute(20_000_000.0, 0.0);
        assert_eq!(result.classification.size, CompanySize::Small);
        assert!(result.edt_applicable);
        assert_relative_eq!(result.edt_payable, 500_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_display() {
        assert_eq!(CompanySize::Medium.to_string(), "Medium Company");
    }
}
