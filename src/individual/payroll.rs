//! Employer PAYE across a list of employees

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{IndividualInputs, IndividualTaxResult, Regime};

/// An employee on the payroll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    pub monthly_salary: f64,
}

/// PAYE for one employee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollLine {
    pub name: String,
    pub annual_income: f64,
    pub annual_tax: f64,
    pub monthly_paye: f64,
    /// Full calculation; absent when there is no income to tax
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<IndividualTaxResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollSummary {
    pub regime: Regime,
    pub lines: Vec<PayrollLine>,
    pub total_monthly_paye: f64,
}

impl PayrollSummary {
    pub fn total_annual_paye(&self) -> f64 {
        self.lines.iter().map(|l| l.annual_tax).sum()
    }
}

fn payroll_line(employee: &Employee, regime: Regime) -> PayrollLine {
    let annual_income = employee.monthly_salary * 12.0;
    if annual_income <= 0.0 {
        return PayrollLine {
            name: employee.name.clone(),
            annual_income,
            annual_tax: 0.0,
            monthly_paye: 0.0,
            detail: None,
        };
    }

    // Employees carry no personal deductions here; gross salary is taxed as-is
    let detail = regime.compute(&IndividualInputs::gross(annual_income));
    PayrollLine {
        name: employee.name.clone(),
        annual_income,
        annual_tax: detail.total_tax,
        monthly_paye: detail.monthly_tax(),
        detail: Some(detail),
    }
}

/// Compute PAYE for every employee under `regime`, preserving input order
pub fn compute_payroll(employees: &[Employee], regime: Regime) -> PayrollSummary {
    let lines: Vec<PayrollLine> = employees
        .par_iter()
        .map(|e| payroll_line(e, regime))
        .collect();

    let total_monthly_paye = lines.iter().map(|l| l.monthly_paye).sum();

    PayrollSummary {
        regime,
        lines,
        total_monthly_paye,
    }
}
