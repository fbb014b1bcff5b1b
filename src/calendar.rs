//! Compliance calendar of upcoming filing deadlines

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxError};

/// Due days never exceed the 28th so they exist in every month
const MAX_DUE_DAY: u32 = 28;

pub const VAT_DUE_DAY: u32 = 21;
pub const PAYE_DUE_DAY: u32 = 10;
pub const WHT_DUE_DAY: u32 = 21;
pub const CIT_DUE_MONTH: u32 = 12;
pub const CIT_DUE_DAY: u32 = 31;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub tax: String,
    pub amount: f64,
    pub due: NaiveDate,
}

/// Amounts to schedule; PAYE is the monthly remittance
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarAmounts {
    pub vat_payable: f64,
    pub monthly_paye: f64,
    pub total_wht: f64,
    pub cit_payable: f64,
}

/// The `day` of the month after `today`
pub fn next_month_date(today: NaiveDate, day: u32) -> Result<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, MAX_DUE_DAY)).ok_or(TaxError::DateOutOfRange)
}

/// The given `month`/`day` in the year after `today`
pub fn next_year_date(today: NaiveDate, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(today.year() + 1, month, day.clamp(1, MAX_DUE_DAY))
        .ok_or(TaxError::DateOutOfRange)
}

pub fn compliance_calendar(today: NaiveDate, amounts: &CalendarAmounts) -> Result<Vec<Obligation>> {
    Ok(vec![
        Obligation {
            tax: "VAT".into(),
            amount: amounts.vat_payable,
            due: next_month_date(today, VAT_DUE_DAY)?,
        },
        Obligation {
            tax: "PAYE".into(),
            amount: amounts.monthly_paye,
            due: next_month_date(today, PAYE_DUE_DAY)?,
        },
        Obligation {
            tax: "WHT".into(),
            amount: amounts.total_wht,
            due: next_month_date(today, WHT_DUE_DAY)?,
        },
        Obligation {
            tax: "CIT".into(),
            amount: amounts.cit_payable,
            due: next_year_date(today, CIT_DUE_MONTH, CIT_DUE_DAY)?,
        },
    ])
}
