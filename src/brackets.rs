//! Progressive bracket engine shared by every income-tax variant
//!
//! A band table is an ordered list of band *widths*. Income is consumed band
//! by band; each band's rate applies only to the slice that falls inside it.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxError};

/// One band of a progressive table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBand {
    pub label: &'static str,
    /// Width of the band; `None` for the unbounded top band
    pub limit: Option<f64>,
    /// Rate in [0, 1]
    pub rate: f64,
}

impl TaxBand {
    pub const fn new(label: &'static str, limit: f64, rate: f64) -> Self {
        Self { label, limit: Some(limit), rate }
    }

    pub const fn unbounded(label: &'static str, rate: f64) -> Self {
        Self { label, limit: None, rate }
    }

    pub fn is_unbounded(&self) -> bool {
        self.limit.is_none()
    }
}

/// Tax attributed to a single band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandResult {
    pub label: String,
    pub taxable_amount: f64,
    pub rate: f64,
    pub tax_for_band: f64,
}

/// Output of a bracket walk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketOutcome {
    pub total_tax: f64,
    pub breakdown: Vec<BandResult>,
}

impl BracketOutcome {
    /// Sum of income consumed across all bands
    pub fn total_taxable(&self) -> f64 {
        self.breakdown.iter().map(|b| b.taxable_amount).sum()
    }
}

/// Check that a band table is usable: non-empty, rates in [0, 1], finite
/// non-negative widths, and an unbounded final band
pub fn validate_bands(bands: &[TaxBand]) -> Result<()> {
    match bands.last() {
        Some(last) if last.is_unbounded() => {}
        _ => return Err(TaxError::UnboundedTopBand),
    }
    for band in bands {
        if !(0.0..=1.0).contains(&band.rate) {
            return Err(TaxError::InvalidNumber {
                field: format!("rate of band {:?}", band.label),
                raw: band.rate.to_string(),
            });
        }
        if let Some(limit) = band.limit {
            if !limit.is_finite() || limit < 0.0 {
                return Err(TaxError::InvalidNumber {
                    field: format!("limit of band {:?}", band.label),
                    raw: limit.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// Walk `bands` in order, taxing each slice of `chargeable` at its band's rate.
///
/// Every band that is reached is recorded, including a zero-rate band.
/// Iteration stops as soon as the income is exhausted.
pub fn compute_brackets(chargeable: f64, bands: &[TaxBand]) -> BracketOutcome {
    if chargeable <= 0.0 {
        return BracketOutcome::default();
    }

    let mut remaining = chargeable;
    let mut outcome = BracketOutcome::default();

    for band in bands {
        if remaining <= 0.0 {
            break;
        }

        let taxable_amount = match band.limit {
            Some(limit) => remaining.min(limit),
            None => remaining,
        };
        let tax_for_band = taxable_amount * band.rate;

        outcome.breakdown.push(BandResult {
            label: band.label.to_string(),
            taxable_amount,
            rate: band.rate,
            tax_for_band,
        });

        outcome.total_tax += tax_for_band;
        remaining -= taxable_amount;
    }

    if remaining > 0.0 {
        warn!(
            "band table exhausted with {:.2} of {:.2} chargeable income unclassified",
            remaining, chargeable
        );
    }

    debug!(
        "brackets: chargeable={:.2} bands_used={} total_tax={:.2}",
        chargeable,
        outcome.breakdown.len(),
        outcome.total_tax
    );

    outcome
}
