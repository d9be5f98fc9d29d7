//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{bad_response, DataAccessError};
use crate::types::{FieldType, FieldValue};
use std::result::Result;

/// Convert a single result cell to its canonical string form.
///
/// `field_type` is the declared type of the cell's column. The conversions are:
///
/// | declared type | output |
/// | ------------- | ------ |
/// | `Integer` | base-10 digits, no grouping (`60` becomes `"60"`) |
/// | `Float` | scientific notation, shortest exact mantissa and a signed exponent of at least two digits (`60.5` becomes `"6.05E+01"`); `NaN`, `+Inf`, `-Inf` for non-finite values |
/// | `String` | the string unchanged |
/// | anything else | the default textual form of the value (see [`FieldValue`]'s `Display`) |
///
/// `NULL` cells and repeated (array) cells always take the default textual form.
///
/// A cell whose decoded value does not match a declared `String`, `Integer` or `Float`
/// column returns a [`BadResponse`](crate::DataAccessErrorCode::BadResponse) error.
pub fn parse_to_string(field_type: FieldType, value: &FieldValue) -> Result<String, DataAccessError> {
    if let FieldValue::Null | FieldValue::Array(_) = value {
        return Ok(value.to_string());
    }
    match field_type {
        FieldType::Integer => match value {
            FieldValue::Integer(i) => Ok(i.to_string()),
            _ => Err(mismatch(field_type, value)),
        },
        FieldType::Float => match value {
            FieldValue::Float(f) => Ok(format_float(*f)),
            _ => Err(mismatch(field_type, value)),
        },
        FieldType::String => match value {
            FieldValue::String(s) => Ok(s.clone()),
            _ => Err(mismatch(field_type, value)),
        },
        _ => Ok(value.to_string()),
    }
}

fn mismatch(field_type: FieldType, value: &FieldValue) -> DataAccessError {
    bad_response!(
        "cell value {:?} does not match declared column type {:?}",
        value,
        field_type
    )
}

/// Format a float as `d.dddE±XX`.
///
/// The mantissa has the fewest digits that still parse back to the same value.
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "NaN".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    // Rust gives "6.05E1"; widen the exponent to a sign and two digits.
    let s = format!("{:E}", f);
    let Some((mantissa, exp)) = s.split_once('E') else {
        return s;
    };
    let (sign, digits) = match exp.strip_prefix('-') {
        Some(d) => ('-', d),
        None => ('+', exp),
    };
    format!("{}E{}{:0>2}", mantissa, sign, digits)
}
