//! Types shared by the alert engine, scenarios, and the engine facade

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TaxError;

/// Loosely-typed field map used for calculation inputs and outputs
pub type FieldMap = Map<String, Value>;

/// Which calculator a set of inputs/outputs belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    /// Personal income tax for an individual
    Individual,
    /// Employer payroll tax for an employee
    #[serde(rename = "PAYE")]
    Paye,
    #[serde(rename = "CIT")]
    Cit,
    #[serde(rename = "VAT")]
    Vat,
    #[serde(rename = "WHT")]
    Wht,
}

impl TaxType {
    pub const ALL: [TaxType; 5] = [
        TaxType::Individual,
        TaxType::Paye,
        TaxType::Cit,
        TaxType::Vat,
        TaxType::Wht,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaxType::Individual => "Individual",
            TaxType::Paye => "PAYE",
            TaxType::Cit => "CIT",
            TaxType::Vat => "VAT",
            TaxType::Wht => "WHT",
        }
    }
}

impl fmt::Display for TaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxType {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TaxType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .or_else(|| wanted.eq_ignore_ascii_case("pit").then_some(TaxType::Individual))
            .ok_or_else(|| TaxError::UnknownTaxType(s.to_string()))
    }
}
