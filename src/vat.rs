//! VAT netting: output VAT on sales less input VAT on purchases

use serde::{Deserialize, Serialize};

/// Standard VAT rate
pub const VAT_RATE: f64 = 0.075;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatResult {
    #[serde(rename = "outputVAT")]
    pub output_vat: f64,
    #[serde(rename = "inputVAT")]
    pub input_vat: f64,
    /// Negative when input VAT exceeds output VAT
    pub vat_payable: f64,
}

impl VatResult {
    pub fn is_refundable(&self) -> bool {
        self.vat_payable < 0.0
    }
}

pub fn compute_vat_at(rate: f64, sales: f64, purchases: f64) -> VatResult {
    let output_vat = sales * rate;
    let input_vat = purchases * rate;
    VatResult {
        output_vat,
        input_vat,
        vat_payable: output_vat - input_vat,
    }
}

/// Net a month's VAT at the standard rate
pub fn compute_vat(monthly_sales: f64, monthly_purchases: f64) -> VatResult {
    compute_vat_at(VAT_RATE, monthly_sales, monthly_purchases)
}
