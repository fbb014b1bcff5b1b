//! Engine facade
//!
//! [`TaxEngine`] owns an [`EngineConfig`] and dispatches to the calculators.
//! [`TaxEngine::evaluate`] takes the loosely-typed inputs a form or request
//! body supplies, and returns outputs and alerts in the shape a
//! [`Scenario`](crate::scenario::Scenario) persists.

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::alerts::{Alert, AlertContext, AlertRules};
use crate::calendar::{compliance_calendar, CalendarAmounts, Obligation};
use crate::company::CompanyTaxResult;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::expenses::{summarize_expenses, ExpenseRecord, ExpenseSummary};
use crate::individual::{
    compute_payroll, Employee, IncomeBasis, IndividualInputs, IndividualTaxResult, PayrollSummary,
    Regime,
};
use crate::input::coerce_value;
use crate::types::{FieldMap, TaxType};
use crate::vat::{compute_vat_at, VatResult};
use crate::wht::{VendorRecord, WhtResult};

/// Outputs and alerts for one calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub tax_type: TaxType,
    pub regime: Regime,
    pub outputs: FieldMap,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default)]
pub struct TaxEngine {
    config: EngineConfig,
    rules: AlertRules,
}

impl TaxEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let rules = config.alert_rules();
        Self { config, rules }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn individual(&self, regime: Regime, inputs: &IndividualInputs) -> IndividualTaxResult {
        regime.compute(inputs)
    }

    /// PAYE for one employee: gross salary with no personal deductions
    pub fn paye(&self, regime: Regime, monthly_salary: f64) -> IndividualTaxResult {
        regime.compute(&IndividualInputs::gross(monthly_salary * 12.0))
    }

    pub fn company(&self, turnover: f64, expenses: f64) -> CompanyTaxResult {
        self.config.company.compute(turnover, expenses)
    }

    pub fn vat(&self, monthly_sales: f64, monthly_purchases: f64) -> VatResult {
        compute_vat_at(self.config.vat_rate, monthly_sales, monthly_purchases)
    }

    pub fn wht(&self, vendors: &[VendorRecord]) -> WhtResult {
        self.config.wht.compute(vendors)
    }

    pub fn payroll(&self, employees: &[Employee], regime: Regime) -> PayrollSummary {
        compute_payroll(employees, regime)
    }

    pub fn expenses(&self, expenses: &[ExpenseRecord]) -> ExpenseSummary {
        summarize_expenses(expenses)
    }

    pub fn calendar(&self, today: NaiveDate, amounts: &CalendarAmounts) -> Result<Vec<Obligation>> {
        compliance_calendar(today, amounts)
    }

    pub fn alerts(&self, ctx: &AlertContext) -> Vec<Alert> {
        self.rules.evaluate(ctx)
    }

    /// Run the calculator for `tax_type` over raw `inputs`, then the alert rules over the result.
    ///
    /// Missing or malformed numeric inputs count as zero. Fails only on an unknown vendor type.
    pub fn evaluate(&self, tax_type: TaxType, regime: Regime, inputs: &FieldMap) -> Result<Evaluation> {
        let field = |key: &str| coerce_value(inputs.get(key));

        let outputs = match tax_type {
            TaxType::Individual => {
                let individual = IndividualInputs {
                    gross_income: income_basis(inputs).annual_total(),
                    pension: field("pension"),
                    nhf: field("nhf"),
                    nhis: field("nhis"),
                    rent_paid: field("rentPaid"),
                };
                let result = self.individual(regime, &individual);
                let mut outputs = to_fields(&result)?;
                outputs.insert("effectiveRate".into(), json!(result.effective_rate() * 100.0));
                outputs.insert("monthlyTax".into(), json!(result.monthly_tax()));
                outputs
            }
            TaxType::Paye => {
                let monthly = match field("monthlySalary") {
                    m if m != 0.0 => m,
                    _ => field("annualIncome") / 12.0,
                };
                let result = self.paye(regime, monthly);
                let mut outputs = to_fields(&result)?;
                outputs.insert("annualIncome".into(), json!(result.gross_income));
                outputs.insert("annualPAYE".into(), json!(result.total_tax));
                outputs.insert("monthlyPAYE".into(), json!(result.monthly_tax()));
                outputs
            }
            TaxType::Cit => to_fields(&self.company(field("annualTurnover"), field("annualExpenses")))?,
            TaxType::Vat => {
                let result = self.vat(field("monthlySales"), field("monthlyPurchases"));
                let mut outputs = to_fields(&result)?;
                outputs.insert("refundable".into(), json!(result.is_refundable()));
                outputs
            }
            TaxType::Wht => to_fields(&self.wht(&vendors(inputs)?))?,
        };

        let alerts = self.alerts(&AlertContext {
            tax_type,
            regime,
            inputs,
            outputs: &outputs,
        });
        debug!("evaluated {} under {}: {} alerts", tax_type, regime, alerts.len());

        Ok(Evaluation {
            tax_type,
            regime,
            outputs,
            alerts,
        })
    }
}

/// `monthlyIncomes` (list) wins over `monthlyIncome`, which wins over `annualIncome`
fn income_basis(inputs: &FieldMap) -> IncomeBasis {
    if let Some(Value::Array(months)) = inputs.get("monthlyIncomes") {
        return IncomeBasis::VariableMonthly(months.iter().map(|m| coerce_value(Some(m))).collect());
    }
    match coerce_value(inputs.get("monthlyIncome")) {
        m if m != 0.0 => IncomeBasis::FixedMonthly(m),
        _ => IncomeBasis::Annual(coerce_value(inputs.get("annualIncome"))),
    }
}

fn vendors(inputs: &FieldMap) -> Result<Vec<VendorRecord>> {
    let Some(Value::Array(rows)) = inputs.get("vendors") else {
        return Ok(Vec::new());
    };
    rows.iter()
        .map(|row| -> Result<VendorRecord> {
            Ok(VendorRecord {
                name: row.get("name").and_then(Value::as_str).unwrap_or_default().to_string(),
                vendor_type: row.get("type").and_then(Value::as_str).unwrap_or_default().parse()?,
                amount: coerce_value(row.get("amount")),
            })
        })
        .collect()
}

fn to_fields<T: Serialize>(value: &T) -> Result<FieldMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => {
            let mut map = FieldMap::new();
            map.insert("value".into(), other);
            Ok(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TaxError;
    use approx::assert_relative_eq;

    fn fields(value: Value) -> FieldMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn number(outputs: &FieldMap, key: &str) -> f64 {
        outputs[key].as_f64().unwrap()
    }

    #[test]
    fn test_evaluate_individual_current() {
        let engine = TaxEngine::new();
        let eval = engine
            .evaluate(
                TaxType::Individual,
                Regime::Current,
                &fields(json!({"annualIncome": "5000000", "pension": 400000, "rentPaid": 1200000})),
            )
            .unwrap();

        // chargeable = 5,000,000 - 400,000 - 240,000 = 4,360,000
        assert_relative_eq!(number(&eval.outputs, "chargeableIncome"), 4_360_000.0, epsilon = 1e-6);
        // 2.2m @ 15% + 1.36m @ 18%
        assert_relative_eq!(number(&eval.outputs, "totalTax"), 574_800.0, epsilon = 1e-6);
        assert_eq!(eval.outputs["regime"], json!("2026+"));
    }

    #[test]
    fn test_evaluate_individual_monthly_modes() {
        let engine = TaxEngine::new();
        let fixed = engine
            .evaluate(TaxType::Individual, Regime::Legacy, &fields(json!({"monthlyIncome": 100000})))
            .unwrap();
        assert_relative_eq!(number(&fixed.outputs, "grossIncome"), 1_200_000.0, epsilon = 1e-6);

        let variable = engine
            .evaluate(
                TaxType::Individual,
                Regime::Legacy,
                &fields(json!({"monthlyIncomes": [100000, "200000", null], "annualIncome": 9})),
            )
            .unwrap();
        assert_relative_eq!(number(&variable.outputs, "grossIncome"), 300_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_paye_high_rate_alert() {
        let engine = TaxEngine::new();
        let eval = engine
            .evaluate(TaxType::Paye, Regime::Current, &fields(json!({"monthlySalary": 10_000_000})))
            .unwrap();

        assert_relative_eq!(number(&eval.outputs, "annualIncome"), 120_000_000.0, epsilon = 1e-6);
        let annual = number(&eval.outputs, "annualPAYE");
        assert_relative_eq!(number(&eval.outputs, "monthlyPAYE"), annual / 12.0, epsilon = 1e-6);
        assert!(eval.alerts.iter().any(|a| a.title == "High Effective Tax Rate"));
    }

    #[test]
    fn test_evaluate_paye_from_annual() {
        let engine = TaxEngine::new();
        let eval = engine
            .evaluate(TaxType::Paye, Regime::Current, &fields(json!({"annualIncome": 3_000_000})))
            .unwrap();
        assert_relative_eq!(number(&eval.outputs, "annualPAYE"), 330_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_evaluate_cit() {
        let engine = TaxEngine::new();
        let eval = engine
            .evaluate(
                TaxType::Cit,
                Regime::Current,
                &fields(json!({"annualTurnover": 30_000_000, "annualExpenses": 22_000_000})),
            )
            .unwrap();

        assert_relative_eq!(number(&eval.outputs, "profit"), 8_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(number(&eval.outputs, "citPayable"), 1_600_000.0, epsilon = 1e-6);
        assert_eq!(eval.outputs["classification"]["size"], json!("Medium"));
        let titles: Vec<&str> = eval.alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Tax Structure Consideration"]);
    }

    #[test]
    fn test_evaluate_vat_refund() {
        let engine = TaxEngine::new();
        let eval = engine
            .evaluate(
                TaxType::Vat,
                Regime::Current,
                &fields(json!({"monthlySales": 100_000, "monthlyPurchases": 300_000})),
            )
            .unwrap();
        assert_relative_eq!(number(&eval.outputs, "vatPayable"), -15_000.0, epsilon = 1e-6);
        assert_eq!(eval.outputs["refundable"], json!(true));
    }

    #[test]
    fn test_evaluate_wht() {
        let engine = TaxEngine::new();
        let inputs = fields(json!({"vendors": [
            {"name": "Acme", "type": "company", "amount": 200000},
            {"name": "Jane", "type": "individual", "amount": "100000"}
        ]}));
        let eval = engine.evaluate(TaxType::Wht, Regime::Current, &inputs).unwrap();

        assert_relative_eq!(number(&eval.outputs, "totalWHT"), 25_000.0, epsilon = 1e-6);
        assert_eq!(eval.alerts.len(), 1);
        assert_eq!(eval.alerts[0].title, "WHT Credit Information");

        let bad = fields(json!({"vendors": [{"name": "X", "type": "trust", "amount": 1}]}));
        let err = engine.evaluate(TaxType::Wht, Regime::Current, &bad).unwrap_err();
        assert!(matches!(err, TaxError::UnknownVendorType(_)));
    }

    #[test]
    fn test_config_flows_through() {
        let mut config = EngineConfig::default();
        config.vat_rate = 0.1;
        config.company.edt_turnover_threshold = 10_000_000.0;
        let engine = TaxEngine::with_config(config);

        assert_relative_eq!(engine.vat(1_000.0, 0.0).vat_payable, 100.0, epsilon = 1e-9);
        let company = engine.company(20_000_000.0, 0.0);
        assert!(company.edt_applicable);
        assert_relative_eq!(company.edt_payable, 500_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_inputs_are_zero() {
        let engine = TaxEngine::new();
        for tax_type in TaxType::ALL {
            let eval = engine.evaluate(tax_type, Regime::Current, &FieldMap::new()).unwrap();
            assert_eq!(eval.tax_type, tax_type);
        }
    }
}
