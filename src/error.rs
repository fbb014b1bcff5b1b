//! Error taxonomy for the tax engine
//!
//! Calculators are total over their numeric domain and never return these.
//! Only the input boundary, the scenario store, and the loaders can fail.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxError {
    /// Scenario save was attempted with an empty or whitespace-only name
    #[error("scenario name must not be empty")]
    EmptyScenarioName,

    #[error("invalid number for {field}: {raw:?}")]
    InvalidNumber { field: String, raw: String },

    #[error("{field} must not be negative (got {value})")]
    NegativeAmount { field: String, value: f64 },

    #[error("unknown regime: {0}")]
    UnknownRegime(String),

    #[error("unknown tax type: {0}")]
    UnknownTaxType(String),

    #[error("unknown vendor type: {0}")]
    UnknownVendorType(String),

    /// A band table whose last band has a finite width
    #[error("band table must end with an unbounded band")]
    UnboundedTopBand,

    #[error("date out of range")]
    DateOutOfRange,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl TaxError {
    /// Whether this is a caller-facing validation failure rather than an I/O fault
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TaxError::EmptyScenarioName
                | TaxError::InvalidNumber { .. }
                | TaxError::NegativeAmount { .. }
                | TaxError::UnknownRegime(_)
                | TaxError::UnknownTaxType(_)
                | TaxError::UnknownVendorType(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TaxError>;
