//! Numeric input boundary
//!
//! Raw form values arrive as strings or loosely-typed JSON. Everything past
//! this module works on plain `f64`.
//!
//! Two conventions are offered:
//! - `coerce_*`: empty, missing, or non-numeric input becomes `0.0`; negatives pass through
//! - `parse_amount`: strict, returns a validated non-negative number or an error

use serde_json::Value;

use crate::error::{Result, TaxError};

/// Coerce an optional raw string to a number, mapping anything unparseable to zero
pub fn coerce_amount(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Coerce a JSON value: numbers pass through, numeric strings parse, everything else is zero
pub fn coerce_value(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Some(Value::String(s)) => coerce_amount(Some(s)),
        Some(Value::Bool(true)) => 1.0,
        _ => 0.0,
    }
}

/// Strict parse for a named field: blank is zero, garbage and negatives are errors
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed.parse().map_err(|_| TaxError::InvalidNumber {
        field: field.to_string(),
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(TaxError::InvalidNumber {
            field: field.to_string(),
            raw: raw.to_string(),
        });
    }
    if value < 0.0 {
        return Err(TaxError::NegativeAmount {
            field: field.to_string(),
            value,
        });
    }
    Ok(value)
}
