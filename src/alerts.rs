//! Compliance alert rules
//!
//! A fixed, ordered list of independent threshold checks run over a
//! calculation's inputs and outputs. Each rule yields at most one alert.
//! Evaluation is pure: no state is kept between calls, so a condition that
//! still holds is reported again even if the caller dismissed it earlier.

use serde::{Deserialize, Serialize};

use crate::company::{CompanySize, CompanyTaxConfig};
use crate::fmt::naira;
use crate::individual::Regime;
use crate::input::coerce_value;
use crate::types::{FieldMap, TaxType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Warning,
    Info,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub icon: String,
}

impl Alert {
    fn warning(title: &str, message: String) -> Self {
        Self { kind: AlertKind::Warning, title: title.into(), message, icon: "⚠️".into() }
    }

    fn info(title: &str, message: String) -> Self {
        Self { kind: AlertKind::Info, title: title.into(), message, icon: "ℹ️".into() }
    }

    fn tip(title: &str, message: String) -> Self {
        Self { kind: AlertKind::Info, title: title.into(), message, icon: "💡".into() }
    }
}

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct AlertContext<'a> {
    pub tax_type: TaxType,
    pub regime: Regime,
    pub inputs: &'a FieldMap,
    pub outputs: &'a FieldMap,
}

impl AlertContext<'_> {
    fn input(&self, key: &str) -> f64 {
        coerce_value(self.inputs.get(key))
    }

    fn output(&self, key: &str) -> f64 {
        coerce_value(self.outputs.get(key))
    }

    /// Annual turnover, falling back to twelve months of sales
    fn annual_turnover(&self) -> f64 {
        first_nonzero(self.input("annualTurnover"), self.input("monthlySales") * 12.0)
    }

    fn annual_income(&self) -> f64 {
        first_nonzero(self.input("annualIncome"), self.input("monthlySalary") * 12.0)
    }

    fn tax_payable(&self) -> f64 {
        first_nonzero(self.output("totalTax"), self.output("annualPAYE"))
    }
}

fn first_nonzero(primary: f64, fallback: f64) -> f64 {
    if primary != 0.0 {
        primary
    } else {
        fallback
    }
}

/// Thresholds used by the alert rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertThresholds {
    pub vat_registration_threshold: f64,
    /// Width of the band just above the registration threshold that triggers the alert
    pub vat_proximity_window: f64,
    /// Effective PAYE/PIT rate, in percent of gross income, above which to warn
    pub high_effective_rate_pct: f64,
    pub low_profit_ceiling: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            vat_registration_threshold: 25_000_000.0,
            vat_proximity_window: 100_000.0,
            high_effective_rate_pct: 20.0,
            low_profit_ceiling: 10_000_000.0,
        }
    }
}

type Rule = fn(&AlertRules, &AlertContext) -> Option<Alert>;

/// Rules in evaluation order
const RULES: [Rule; 6] = [
    vat_registration_threshold,
    small_company_exemption,
    high_effective_rate,
    structure_consideration,
    education_tax_applicability,
    wht_credit_reminder,
];

/// The alert rule set with its thresholds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertRules {
    pub thresholds: AlertThresholds,
    pub company: CompanyTaxConfig,
}

impl AlertRules {
    pub fn new(thresholds: AlertThresholds, company: CompanyTaxConfig) -> Self {
        Self { thresholds, company }
    }

    pub fn evaluate(&self, ctx: &AlertContext) -> Vec<Alert> {
        RULES.iter().filter_map(|rule| rule(self, ctx)).collect()
    }
}

/// Evaluate the default rule set
pub fn evaluate_alerts(ctx: &AlertContext) -> Vec<Alert> {
    AlertRules::default().evaluate(ctx)
}

fn vat_registration_threshold(rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if !matches!(ctx.tax_type, TaxType::Vat | TaxType::Cit) {
        return None;
    }
    let threshold = rules.thresholds.vat_registration_threshold;
    let turnover = ctx.annual_turnover();
    if turnover < threshold || turnover >= threshold + rules.thresholds.vat_proximity_window {
        return None;
    }
    Some(Alert::warning(
        "VAT Registration Threshold",
        format!(
            "Your annual turnover ({}) has reached the {} VAT registration threshold. \
             You are required to register for VAT with FIRS.",
            naira(turnover),
            naira(threshold)
        ),
    ))
}

fn small_company_exemption(rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if ctx.tax_type != TaxType::Cit {
        return None;
    }
    let turnover = ctx.input("annualTurnover");
    if turnover <= 0.0 || rules.company.classify(turnover).size != CompanySize::Small {
        return None;
    }
    Some(Alert::info(
        "Small Company Exemption",
        format!(
            "Your company qualifies as a Small Company (turnover below {}) and is exempt \
             from Company Income Tax (0% rate).",
            naira(rules.company.small_turnover_ceiling)
        ),
    ))
}

fn high_effective_rate(rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if !matches!(ctx.tax_type, TaxType::Paye | TaxType::Individual) {
        return None;
    }
    let income = ctx.annual_income();
    let tax = ctx.tax_payable();
    if income <= 0.0 || tax <= 0.0 {
        return None;
    }
    let rate_pct = tax / income * 100.0;
    if rate_pct <= rules.thresholds.high_effective_rate_pct {
        return None;
    }
    Some(Alert::warning(
        "High Effective Tax Rate",
        format!(
            "Your effective tax rate under the {} regime is {:.1}%, which is above the typical \
             range. Consider reviewing your deductions and tax planning strategies.",
            ctx.regime.label(),
            rate_pct
        ),
    ))
}

fn structure_consideration(rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if ctx.tax_type != TaxType::Cit {
        return None;
    }
    let profit = ctx.output("profit");
    let cit = ctx.output("citPayable");
    if profit <= 0.0 || cit <= 0.0 || profit > rules.thresholds.low_profit_ceiling {
        return None;
    }
    Some(Alert::tip(
        "Tax Structure Consideration",
        format!(
            "For profits of {}, you may want to compare with individual tax rates. \
             Business structure can impact overall tax liability.",
            naira(profit)
        ),
    ))
}

fn education_tax_applicability(rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if ctx.tax_type != TaxType::Cit {
        return None;
    }
    let turnover = ctx.input("annualTurnover");
    if !rules.company.edt_applies(turnover) || ctx.output("edtPayable") != 0.0 {
        return None;
    }
    Some(Alert::info(
        "Education Tax (EDT)",
        format!(
            "Your company qualifies for Education Tax ({}% of assessable profits) as turnover exceeds {}.",
            rules.company.edt_rate * 100.0,
            naira(rules.company.edt_turnover_threshold)
        ),
    ))
}

fn wht_credit_reminder(_rules: &AlertRules, ctx: &AlertContext) -> Option<Alert> {
    if ctx.tax_type != TaxType::Wht {
        return None;
    }
    let total = ctx.output("totalWHT");
    if total <= 0.0 {
        return None;
    }
    Some(Alert::info(
        "WHT Credit Information",
        format!(
            "Remember that WHT ({}) is generally creditable against the recipient's final income tax liability.",
            naira(total)
        ),
    ))
}
