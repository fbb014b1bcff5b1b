//! Side-by-side comparison of saved scenarios

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use crate::types::FieldMap;
use super::Scenario;

/// One field across every compared scenario
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRow {
    pub key: String,
    /// One entry per scenario; `None` where the field is absent
    pub values: Vec<Option<Value>>,
    pub differs: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub scenario_ids: Vec<String>,
    pub scenario_names: Vec<String>,
    pub inputs: Vec<FieldRow>,
    pub outputs: Vec<FieldRow>,
}

impl ScenarioComparison {
    pub fn build(scenarios: &[Scenario]) -> Self {
        Self {
            scenario_ids: scenarios.iter().map(|s| s.id().to_string()).collect(),
            scenario_names: scenarios.iter().map(|s| s.name().to_string()).collect(),
            inputs: field_rows(scenarios.iter().map(Scenario::inputs).collect()),
            outputs: field_rows(scenarios.iter().map(Scenario::outputs).collect()),
        }
    }

    pub fn differing_inputs(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().filter(|r| r.differs).map(|r| r.key.as_str())
    }

    pub fn differing_outputs(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().filter(|r| r.differs).map(|r| r.key.as_str())
    }
}

fn field_rows(maps: Vec<&FieldMap>) -> Vec<FieldRow> {
    let keys: BTreeSet<&String> = maps.iter().flat_map(|m| m.keys()).collect();
    keys.into_iter()
        .map(|key| {
            let values: Vec<Option<Value>> = maps.iter().map(|m| m.get(key).cloned()).collect();
            let differs = values.windows(2).any(|pair| !same_value(&pair[0], &pair[1]));
            FieldRow {
                key: key.clone(),
                values,
                differs,
            }
        })
        .collect()
}

/// A missing field never equals a present one
fn same_value(a: &Option<Value>, b: &Option<Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(x), Some(y)) => same_json(x, y),
        _ => false,
    }
}

/// Structural equality where numbers compare by value (`5` equals `5.0`) at any depth
fn same_json(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_json(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| same_json(x, y)))
        }
        _ => a == b,
    }
}
