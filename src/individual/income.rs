use serde::{Deserialize, Serialize};

/// How annual income was entered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "amounts", rename_all = "camelCase")]
pub enum IncomeBasis {
    Annual(f64),
    /// Same amount every month (×12)
    FixedMonthly(f64),
    /// Month-by-month amounts, summed
    VariableMonthly(Vec<f64>),
}

impl IncomeBasis {
    pub fn annual_total(&self) -> f64 {
        match self {
            IncomeBasis::Annual(amount) => *amount,
            IncomeBasis::FixedMonthly(amount) => amount * 12.0,
            IncomeBasis::VariableMonthly(months) => months.iter().sum(),
        }
    }
}
