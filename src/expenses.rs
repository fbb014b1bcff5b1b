//! Business expense ledger
//!
//! Expenses are entered net of VAT. The VAT-inclusive total is what feeds
//! company profit; the deductible share is tracked alongside for reference.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::vat::VAT_RATE;

const UNCATEGORIZED: &str = "Uncategorized";

const NON_DEDUCTIBLE: [&str; 5] = [
    "Personal Expenses",
    "Owner Drawings",
    "Fines & Penalties",
    "Political Contributions",
    "Dividends",
];

const HALF_DEDUCTIBLE: [&str; 2] = ["Entertainment", "Home Office"];

/// Default deductible percentage (0-100) for an expense category
pub fn default_deductible_percent(category: &str) -> f64 {
    if NON_DEDUCTIBLE.contains(&category) {
        0.0
    } else if HALF_DEDUCTIBLE.contains(&category) {
        50.0
    } else {
        100.0
    }
}

fn default_vatable() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    #[serde(default)]
    pub category: String,
    /// Amount before VAT
    pub amount: f64,
    #[serde(default = "default_vatable", rename = "isVATable")]
    pub vatable: bool,
    /// Overrides the category default when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deductible_percent: Option<f64>,
}

impl ExpenseRecord {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
            vatable: true,
            deductible_percent: None,
        }
    }

    pub fn vat(&self) -> f64 {
        if self.vatable {
            self.amount * VAT_RATE
        } else {
            0.0
        }
    }

    pub fn amount_after_vat(&self) -> f64 {
        self.amount + self.vat()
    }

    pub fn deductible_percent(&self) -> f64 {
        self.deductible_percent
            .unwrap_or_else(|| default_deductible_percent(&self.category))
            .clamp(0.0, 100.0)
    }

    pub fn deductible_amount(&self) -> f64 {
        self.amount_after_vat() * self.deductible_percent() / 100.0
    }

    fn category_or_default(&self) -> &str {
        if self.category.trim().is_empty() {
            UNCATEGORIZED
        } else {
            &self.category
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSummary {
    /// VAT-inclusive total
    pub total_expenses: f64,
    #[serde(rename = "totalVAT")]
    pub total_vat: f64,
    pub total_deductible: f64,
    pub by_category: BTreeMap<String, f64>,
}

pub fn summarize_expenses(expenses: &[ExpenseRecord]) -> ExpenseSummary {
    let mut summary = ExpenseSummary::default();
    for expense in expenses {
        let gross = expense.amount_after_vat();
        summary.total_expenses += gross;
        summary.total_vat += expense.vat();
        summary.total_deductible += expense.deductible_amount();
        *summary
            .by_category
            .entry(expense.category_or_default().to_string())
            .or_insert(0.0) += gross;
    }
    summary
}
