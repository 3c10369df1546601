//! Field extraction from the vendor's product and warranty responses.
//!
//! Both endpoints return loosely-structured JSON, so everything here works on
//! [`serde_json::Value`] and treats missing fields as data, not as errors to
//! propagate.

use serde_json::Value;

use crate::error::ExtractError;

const TYPE_MARKER: &str = "Type";

/// Coverage state read from a warranty response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coverage {
    Active,
    Expired,
    NoInfo,
}

fn first_record(products: &Value) -> Result<&Value, ExtractError> {
    products
        .as_array()
        .ok_or(ExtractError::NotAnArray)?
        .first()
        .ok_or(ExtractError::Empty)
}

/// A product lookup names a real unit when it returns a non-empty array whose
/// first record carries an identifier.
pub fn is_known_product(products: &Value) -> bool {
    first_record(products)
        .ok()
        .and_then(Value::as_object)
        .map(|record| {
            record
                .iter()
                .any(|(key, value)| key.eq_ignore_ascii_case("id") && !value.is_null())
        })
        .unwrap_or(false)
}

/// The serial the vendor reports for the first product record, if any.
pub fn product_serial(products: &Value) -> Option<&str> {
    first_record(products).ok()?.get("Serial")?.as_str()
}

/// Pull the machine type out of the first record's `Name`, e.g.
/// `"ThinkPad T14 - Type 20S0"` yields `"20S0"`.
pub fn machine_type(products: &Value) -> Result<String, ExtractError> {
    let name = first_record(products)?
        .get("Name")
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingName)?;
    let start = name.rfind(TYPE_MARKER).ok_or(ExtractError::TypeNotFound)?;
    name[start..]
        .split_whitespace()
        .nth(1)
        .map(str::to_owned)
        .ok_or(ExtractError::MissingToken)
}

/// Read `data.baseWarranties` from a warranty response. Returns `None` when the
/// response carries no usable `data` object, or when `remainingDays` is present
/// but not a number. Numeric strings are accepted; a missing value counts as 0.
pub fn coverage(response: &Value) -> Option<Coverage> {
    let data = response.as_object()?.get("data").filter(|d| is_truthy(d))?;
    let first = data
        .get("baseWarranties")
        .and_then(Value::as_array)
        .and_then(|warranties| warranties.first());
    let Some(warranty) = first else {
        return Some(Coverage::NoInfo);
    };
    let remaining = match warranty.get("remainingDays") {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64()?,
        Some(Value::String(s)) => s.trim().parse::<f64>().ok()?,
        Some(_) => return None,
    };
    if remaining > 0.0 {
        Some(Coverage::Active)
    } else {
        Some(Coverage::Expired)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
