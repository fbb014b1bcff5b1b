//! Pre-2026 regime (PITA with Consolidated Relief Allowance)

use crate::brackets::{compute_brackets, TaxBand};
use super::{IndividualTaxResult, Regime};

/// Fixed part of the CRA
pub const CRA_BASE: f64 = 200_000.0;

/// Share of gross income added to the CRA
pub const CRA_RATE: f64 = 0.20;

pub const LEGACY_BANDS: [TaxBand; 6] = [
    TaxBand::new("First ₦300,000", 300_000.0, 0.07),
    TaxBand::new("Next ₦300,000", 300_000.0, 0.11),
    TaxBand::new("Next ₦500,000", 500_000.0, 0.15),
    TaxBand::new("Next ₦500,000", 500_000.0, 0.19),
    TaxBand::new("Next ₦1,600,000", 1_600_000.0, 0.21),
    TaxBand::unbounded("Remainder", 0.24),
];

/// CRA = ₦200,000 + 20% of annual gross income
pub fn cra(gross_income: f64) -> f64 {
    CRA_BASE + gross_income * CRA_RATE
}

pub fn compute_legacy(gross_income: f64) -> IndividualTaxResult {
    let allowance = cra(gross_income);
    let chargeable_income = (gross_income - allowance).max(0.0);

    // compute_brackets returns zero tax and an empty breakdown for chargeable <= 0
    let outcome = compute_brackets(chargeable_income, &LEGACY_BANDS);

    IndividualTaxResult {
        regime: Regime::Legacy,
        gross_income,
        total_deductions: allowance,
        chargeable_income,
        total_tax: outcome.total_tax,
        breakdown: outcome.breakdown,
        rent_relief: None,
        cra: Some(allowance),
        minimum_wage_exempt: false,
    }
}
