//! Load vendor, employee, and expense schedules from CSV
//!
//! Numeric cells go through [`coerce_amount`]: blank or malformed amounts
//! load as zero rather than failing the whole file.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::expenses::ExpenseRecord;
use crate::individual::Employee;
use crate::input::coerce_amount;
use crate::wht::{VendorRecord, VendorType};

/// Raw row of a vendor schedule: `name,type,amount`
#[derive(Debug, serde::Deserialize)]
struct VendorRow {
    name: String,
    #[serde(rename = "type")]
    vendor_type: String,
    #[serde(default)]
    amount: Option<String>,
}

impl VendorRow {
    fn to_record(self) -> Result<VendorRecord> {
        Ok(VendorRecord {
            vendor_type: self.vendor_type.parse::<VendorType>()?,
            amount: coerce_amount(self.amount.as_deref()),
            name: self.name,
        })
    }
}

/// Raw row of an employee schedule: `name,monthly_salary`
#[derive(Debug, serde::Deserialize)]
struct EmployeeRow {
    name: String,
    #[serde(default)]
    monthly_salary: Option<String>,
}

/// Raw row of an expense schedule: `category,amount,vatable[,deductible_percent]`
#[derive(Debug, serde::Deserialize)]
struct ExpenseRow {
    #[serde(default)]
    category: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    vatable: Option<String>,
    #[serde(default)]
    deductible_percent: Option<String>,
}

impl ExpenseRow {
    fn to_record(self) -> ExpenseRecord {
        let deductible_percent = self
            .deductible_percent
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| coerce_amount(Some(raw)));

        ExpenseRecord {
            amount: coerce_amount(self.amount.as_deref()),
            vatable: parse_flag(self.vatable.as_deref()),
            deductible_percent,
            category: self.category,
        }
    }
}

/// Yes-ish values are true, no-ish values false; blank defaults to VAT-able
fn parse_flag(raw: Option<&str>) -> bool {
    match raw.map(|r| r.trim().to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "false" | "no" | "n" | "0") => false,
        _ => true,
    }
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in csv_reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Load vendors from any reader
pub fn load_vendors_from_reader<R: Read>(reader: R) -> Result<Vec<VendorRecord>> {
    read_rows::<R, VendorRow>(reader)?
        .into_iter()
        .map(VendorRow::to_record)
        .collect()
}

pub fn load_vendors<P: AsRef<Path>>(path: P) -> Result<Vec<VendorRecord>> {
    load_vendors_from_reader(std::fs::File::open(path)?)
}

/// Load employees from any reader
pub fn load_employees_from_reader<R: Read>(reader: R) -> Result<Vec<Employee>> {
    Ok(read_rows::<R, EmployeeRow>(reader)?
        .into_iter()
        .map(|row| Employee {
            monthly_salary: coerce_amount(row.monthly_salary.as_deref()),
            name: row.name,
        })
        .collect())
}

pub fn load_employees<P: AsRef<Path>>(path: P) -> Result<Vec<Employee>> {
    load_employees_from_reader(std::fs::File::open(path)?)
}

/// Load expenses from any reader
pub fn load_expenses_from_reader<R: Read>(reader: R) -> Result<Vec<ExpenseRecord>> {
    Ok(read_rows::<R, ExpenseRow>(reader)?
        .into_iter()
        .map(ExpenseRow::to_record)
        .collect())
}

pub fn load_expenses<P: AsRef<Path>>(path: P) -> Result<Vec<ExpenseRecord>> {
    load_expenses_from_reader(std::fs::File::open(path)?)
}
