//! Saved calculation scenarios
//!
//! A scenario is an immutable, named snapshot of one calculation's inputs and
//! outputs. Scenarios are persisted through an injected [`KeyValueStore`]
//! under a caller-supplied key, and compared field by field.
//!
//! # Example
//!
//! ```rust,ignore
//! use tax_engine::scenario::{MemoryStore, ScenarioStore, ScenarioComparison};
//!
//! let scenarios = ScenarioStore::new(MemoryStore::new(), "tax_scenarios_ada");
//! let base = scenarios.save("Base case", TaxType::Cit, Regime::Current, &inputs, &outputs)?;
//! let alt = scenarios.save("Higher expenses", TaxType::Cit, Regime::Current, &inputs2, &outputs2)?;
//! let view = ScenarioComparison::build(&scenarios.compare(&[base.id(), alt.id()]));
//! ```

mod store;
mod compare;

pub use store::{FileStore, KeyValueStore, MemoryStore, ScenarioStore};
pub use compare::{FieldRow, ScenarioComparison};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::individual::Regime;
use crate::types::{FieldMap, TaxType};

/// A saved snapshot. Fields are read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    id: String,
    name: String,
    tax_type: TaxType,
    #[serde(default)]
    regime: Regime,
    #[serde(default)]
    inputs: FieldMap,
    #[serde(default)]
    outputs: FieldMap,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Scenario {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tax_type(&self) -> TaxType {
        self.tax_type
    }

    pub fn regime(&self) -> Regime {
        self.regime
    }

    pub fn inputs(&self) -> &FieldMap {
        &self.inputs
    }

    pub fn outputs(&self) -> &FieldMap {
        &self.outputs
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
