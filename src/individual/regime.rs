//! Regime selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::brackets::TaxBand;
use crate::error::TaxError;
use super::{compute_current, compute_legacy, IndividualInputs, IndividualTaxResult};
use super::{CURRENT_BANDS, LEGACY_BANDS};

/// The applicable version of individual tax law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Regime {
    /// PITA rules in force before 1 January 2026 (CRA applies)
    #[serde(rename = "pre-2026")]
    Legacy,
    /// Nigeria Tax Act 2025 rules from 1 January 2026
    #[default]
    #[serde(rename = "2026+")]
    Current,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Legacy, Regime::Current];

    pub fn label(&self) -> &'static str {
        match self {
            Regime::Legacy => "pre-2026",
            Regime::Current => "2026+",
        }
    }

    pub fn bands(&self) -> &'static [TaxBand] {
        match self {
            Regime::Legacy => &LEGACY_BANDS,
            Regime::Current => &CURRENT_BANDS,
        }
    }

    /// Pre-bracket allowance applied automatically by the regime
    pub fn allowance(&self, gross_income: f64) -> f64 {
        match self {
            Regime::Legacy => super::cra(gross_income),
            Regime::Current => 0.0,
        }
    }

    /// Run the regime's calculator
    pub fn compute(&self, inputs: &IndividualInputs) -> IndividualTaxResult {
        match self {
            Regime::Legacy => compute_legacy(inputs.gross_income),
            Regime::Current => compute_current(inputs),
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Regime {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pre-2026" | "legacy" | "pita" => Ok(Regime::Legacy),
            "2026+" | "current" | "nta" => Ok(Regime::Current),
            _ => Err(TaxError::UnknownRegime(s.to_string())),
        }
    }
}
