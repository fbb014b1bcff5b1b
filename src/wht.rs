//! Withholding tax on vendor payments
//!
//! WHT is an advance tax: the amount withheld is creditable against the
//! vendor's final liability for every vendor type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TaxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendorType {
    Individual,
    Company,
}

impl VendorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorType::Individual => "individual",
            VendorType::Company => "company",
        }
    }
}

impl fmt::Display for VendorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VendorType {
    type Err = TaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "individual" => Ok(VendorType::Individual),
            "company" => Ok(VendorType::Company),
            _ => Err(TaxError::UnknownVendorType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub vendor_type: VendorType,
    pub amount: f64,
}

/// WHT rates by vendor type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WhtRates {
    pub company: f64,
    pub individual: f64,
}

impl Default for WhtRates {
    fn default() -> Self {
        Self {
            company: 0.10,
            individual: 0.05,
        }
    }
}

impl WhtRates {
    pub fn rate_for(&self, vendor_type: VendorType) -> f64 {
        match vendor_type {
            VendorType::Company => self.company,
            VendorType::Individual => self.individual,
        }
    }

    pub fn compute(&self, vendors: &[VendorRecord]) -> WhtResult {
        let per_vendor: Vec<WhtLine> = vendors
            .iter()
            .map(|v| {
                let rate = self.rate_for(v.vendor_type);
                WhtLine {
                    name: v.name.clone(),
                    vendor_type: v.vendor_type,
                    amount: v.amount,
                    rate,
                    wht_withheld: v.amount * rate,
                }
            })
            .collect();

        let total_wht = per_vendor.iter().map(|l| l.wht_withheld).sum();

        WhtResult { per_vendor, total_wht }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhtLine {
    pub name: String,
    #[serde(rename = "type")]
    pub vendor_type: VendorType,
    pub amount: f64,
    pub rate: f64,
    pub wht_withheld: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhtResult {
    pub per_vendor: Vec<WhtLine>,
    #[serde(rename = "totalWHT")]
    pub total_wht: f64,
}

/// Compute WHT for each vendor payment at the default rates
pub fn compute_wht(vendors: &[VendorRecord]) -> WhtResult {
    WhtRates::default().compute(vendors)
}
