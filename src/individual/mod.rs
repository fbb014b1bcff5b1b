//! Individual income tax (PIT / PAYE) under the legacy and 2026+ regimes

mod current;
mod legacy;
mod regime;
mod income;
mod payroll;

pub use current::{
    compute_current, rent_relief, CURRENT_BANDS, MINIMUM_WAGE_ANNUAL, RENT_RELIEF_CAP,
    RENT_RELIEF_RATE,
};
pub use legacy::{compute_legacy, cra, CRA_BASE, CRA_RATE, LEGACY_BANDS};
pub use regime::Regime;
pub use income::IncomeBasis;
pub use payroll::{compute_payroll, Employee, PayrollLine, PayrollSummary};

use serde::{Deserialize, Serialize};

use crate::brackets::BandResult;

/// Annual inputs to an individual calculation
///
/// The legacy regime only reads `gross_income`; its allowance is formula-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndividualInputs {
    pub gross_income: f64,
    pub pension: f64,
    pub nhf: f64,
    pub nhis: f64,
    pub rent_paid: f64,
}

impl IndividualInputs {
    /// Inputs with a gross income and no deductions
    pub fn gross(gross_income: f64) -> Self {
        Self {
            gross_income,
            ..Default::default()
        }
    }
}

/// Result of an individual calculation under either regime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualTaxResult {
    pub regime: Regime,
    pub gross_income: f64,
    pub total_deductions: f64,
    pub chargeable_income: f64,
    pub total_tax: f64,
    pub breakdown: Vec<BandResult>,
    /// Rent relief (2026+ regime only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_relief: Option<f64>,
    /// Consolidated relief allowance (legacy regime only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cra: Option<f64>,
    /// Income fell under the minimum-wage exemption and was not taxed
    #[serde(default)]
    pub minimum_wage_exempt: bool,
}

impl IndividualTaxResult {
    /// Total tax as a fraction of gross income (0 when there is no income)
    pub fn effective_rate(&self) -> f64 {
        if self.gross_income <= 0.0 {
            0.0
        } else {
            self.total_tax / self.gross_income
        }
    }

    pub fn monthly_tax(&self) -> f64 {
        self.total_tax / 12.0
    }
}
