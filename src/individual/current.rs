//! 2026+ regime (Nigeria Tax Act 2025)
//!
//! No CRA. Statutory deductions and rent relief reduce gross income, then the
//! first ₦800,000 of chargeable income is taxed at 0%.

use log::debug;

use crate::brackets::{compute_brackets, TaxBand};
use super::{IndividualInputs, IndividualTaxResult, Regime};

/// Annual income at or below which no tax is due (₦30,000 monthly minimum wage)
pub const MINIMUM_WAGE_ANNUAL: f64 = 30_000.0 * 12.0;

/// Share of annual rent paid that is relieved
pub const RENT_RELIEF_RATE: f64 = 0.20;

/// Ceiling on rent relief
pub const RENT_RELIEF_CAP: f64 = 500_000.0;

pub const CURRENT_BANDS: [TaxBand; 6] = [
    TaxBand::new("First ₦800,000", 800_000.0, 0.0),
    TaxBand::new("Next ₦2,200,000", 2_200_000.0, 0.15),
    TaxBand::new("Next ₦9,000,000", 9_000_000.0, 0.18),
    TaxBand::new("Next ₦13,000,000", 13_000_000.0, 0.21),
    TaxBand::new("Next ₦25,000,000", 25_000_000.0, 0.23),
    TaxBand::unbounded("Above ₦50,000,000", 0.25),
];

/// Rent relief for a year's rent, clamped to [0, RENT_RELIEF_CAP]
pub fn rent_relief(rent_paid: f64) -> f64 {
    (rent_paid.max(0.0) * RENT_RELIEF_RATE).min(RENT_RELIEF_CAP)
}

pub fn compute_current(inputs: &IndividualInputs) -> IndividualTaxResult {
    let gross = inputs.gross_income;

    // Blanket exemption, not a deduction: the bracket machinery is skipped
    if gross > 0.0 && gross <= MINIMUM_WAGE_ANNUAL {
        debug!("gross {:.2} within minimum wage exemption", gross);
        return IndividualTaxResult {
            regime: Regime::Current,
            gross_income: gross,
            total_deductions: 0.0,
            chargeable_income: gross,
            total_tax: 0.0,
            breakdown: Vec::new(),
            rent_relief: None,
            cra: None,
            minimum_wage_exempt: true,
        };
    }

    let relief = rent_relief(inputs.rent_paid);
    let total_deductions =
        inputs.pension.max(0.0) + inputs.nhf.max(0.0) + inputs.nhis.max(0.0) + relief;
    let chargeable_income = (gross - total_deductions).max(0.0);

    let outcome = compute_brackets(chargeable_income, &CURRENT_BANDS);

    IndividualTaxResult {
        regime: Regime::Current,
        gross_income: gross,
        total_deductions,
        chargeable_income,
        total_tax: outcome.total_tax,
        breakdown: outcome.breakdown,
        rent_relief: Some(relief),
        cra: None,
        minimum_wage_exempt: false,
    }
}
