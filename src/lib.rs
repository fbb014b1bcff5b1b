//! Tax Engine - Nigerian tax estimation under the legacy and 2026+ regimes
//!
//! This library provides:
//! - Progressive bracket computation shared by every income-tax variant
//! - Individual PIT and employer PAYE under both regimes
//! - Company income tax with education tax, VAT netting, and withholding tax
//! - Expense ledger, compliance calendar, and rule-based alerts
//! - Named scenario snapshots with side-by-side comparison

pub mod brackets;
pub mod individual;
pub mod company;
pub mod vat;
pub mod wht;
pub mod expenses;
pub mod calendar;
pub mod alerts;
pub mod scenario;
pub mod input;
pub mod loader;
pub mod engine;
pub mod config;
pub mod error;
pub mod fmt;
pub mod types;

// Re-export commonly used types
pub use brackets::{compute_brackets, BandResult, BracketOutcome, TaxBand};
pub use individual::{IndividualInputs, IndividualTaxResult, Regime};
pub use company::{classify, compute_company_tax, CompanySize, CompanyTaxResult};
pub use vat::{compute_vat, VatResult};
pub use wht::{compute_wht, VendorRecord, VendorType, WhtResult};
pub use alerts::{evaluate_alerts, Alert, AlertContext, AlertKind};
pub use scenario::{Scenario, ScenarioComparison, ScenarioStore};
pub use engine::{Evaluation, TaxEngine};
pub use config::EngineConfig;
pub use error::{Result, TaxError};
pub use types::{FieldMap, TaxType};
