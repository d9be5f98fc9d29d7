//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Column types and typed cell values returned by BigQuery queries.

use base64::prelude::{Engine as _, BASE64_STANDARD};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde_json::Value as JsonValue;
use std::fmt;
use std::result::Result;
use std::str::FromStr;

use crate::error::{bad_response, DataAccessError};
use crate::job::TableFieldSchemaWire;

/// Declared type of a result column, as reported in the query schema.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FieldType {
    // UTF-8 text.
    String,

    // Uninterpreted sequence of bytes. Sent base64-encoded on the wire.
    Bytes,

    // Signed 64-bit integer (INTEGER / INT64).
    Integer,

    // IEEE-754 64-bit floating point (FLOAT / FLOAT64).
    Float,

    // true or false (BOOLEAN / BOOL).
    Boolean,

    // Absolute point in time with microsecond precision.
    Timestamp,

    // Nested record with its own schema (RECORD / STRUCT).
    Record,

    // Calendar date without a time zone.
    Date,

    // Time of day without a date or time zone.
    Time,

    // Calendar date and time of day without a time zone.
    DateTime,

    // Exact decimal with 38 digits of precision and 9 of scale.
    Numeric,

    // Exact decimal with up to 76 digits of precision.
    BigNumeric,

    // Geographic value in WKT form.
    Geography,

    // JSON document.
    Json,

    // Duration between two points in time.
    Interval,
}

impl FieldType {
    /// Parse a schema type name, accepting both the legacy and standard SQL spellings.
    pub fn from_type_name(name: &str) -> Result<FieldType, DataAccessError> {
        let ft = match name.to_ascii_uppercase().as_str() {
            "STRING" => FieldType::String,
            "BYTES" => FieldType::Bytes,
            "INTEGER" | "INT64" => FieldType::Integer,
            "FLOAT" | "FLOAT64" => FieldType::Float,
            "BOOLEAN" | "BOOL" => FieldType::Boolean,
            "TIMESTAMP" => FieldType::Timestamp,
            "RECORD" | "STRUCT" => FieldType::Record,
            "DATE" => FieldType::Date,
            "TIME" => FieldType::Time,
            "DATETIME" => FieldType::DateTime,
            "NUMERIC" => FieldType::Numeric,
            "BIGNUMERIC" => FieldType::BigNumeric,
            "GEOGRAPHY" => FieldType::Geography,
            "JSON" => FieldType::Json,
            "INTERVAL" => FieldType::Interval,
            _ => {
                return Err(bad_response!("unrecognized field type '{}' in schema", name));
            }
        };
        Ok(ft)
    }
}

/// One column of a query result schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    /// True for `REPEATED` columns; each cell is then an [`FieldValue::Array`].
    pub repeated: bool,
    /// Sub-fields of a [`FieldType::Record`] column. Empty for all other types.
    pub fields: Vec<FieldSchema>,
}

impl FieldSchema {
    pub fn new(name: &str, field_type: FieldType) -> FieldSchema {
        FieldSchema {
            name: name.to_string(),
            field_type,
            repeated: false,
            fields: Vec::new(),
        }
    }

    pub(crate) fn from_wire(w: &TableFieldSchemaWire) -> Result<FieldSchema, DataAccessError> {
        let mut fields = Vec::with_capacity(w.fields.len());
        for f in &w.fields {
            fields.push(FieldSchema::from_wire(f)?);
        }
        Ok(FieldSchema {
            name: w.name.clone(),
            field_type: FieldType::from_type_name(&w.field_type)?,
            repeated: w.mode.as_deref() == Some("REPEATED"),
            fields,
        })
    }

    /// Decode one cell of this column from its JSON representation.
    ///
    /// BigQuery returns every scalar as a JSON string, records as `{"f": [...]}` and
    /// repeated values as `[{"v": ...}, ...]`.
    pub(crate) fn decode(&self, v: &JsonValue) -> Result<FieldValue, DataAccessError> {
        if v.is_null() {
            return Ok(FieldValue::Null);
        }
        if !self.repeated {
            return self.decode_single(v);
        }
        let JsonValue::Array(items) = v else {
            return Err(bad_response!(
                "expected array for repeated field '{}', got {}",
                self.name,
                v
            ));
        };
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            values.push(self.decode_single(cell_value(item))?);
        }
        Ok(FieldValue::Array(values))
    }

    fn decode_single(&self, v: &JsonValue) -> Result<FieldValue, DataAccessError> {
        if v.is_null() {
            return Ok(FieldValue::Null);
        }
        if self.field_type == FieldType::Record {
            let cells = v.get("f").and_then(|f| f.as_array()).ok_or_else(|| {
                bad_response!("expected record for field '{}', got {}", self.name, v)
            })?;
            if cells.len() != self.fields.len() {
                return Err(bad_response!(
                    "record field '{}' has {} values for {} sub-fields",
                    self.name,
                    cells.len(),
                    self.fields.len()
                ));
            }
            let mut rec = Vec::with_capacity(cells.len());
            for (sub, cell) in self.fields.iter().zip(cells) {
                rec.push((sub.name.clone(), sub.decode(cell_value(cell))?));
            }
            return Ok(FieldValue::Record(rec));
        }
        let Some(s) = v.as_str() else {
            return Err(bad_response!(
                "expected string value for field '{}', got {}",
                self.name,
                v
            ));
        };
        self.parse_scalar(s).map_err(|e| {
            bad_response!(
                "can't decode value '{}' of field '{}' as {:?}: {}",
                s,
                self.name,
                self.field_type,
                e
            )
        })
    }

    fn parse_scalar(&self, s: &str) -> Result<FieldValue, Box<dyn std::error::Error>> {
        let fv = match self.field_type {
            FieldType::String => FieldValue::String(s.to_string()),
            FieldType::Bytes => FieldValue::Bytes(BASE64_STANDARD.decode(s)?),
            FieldType::Integer => FieldValue::Integer(s.parse::<i64>()?),
            FieldType::Float => FieldValue::Float(s.parse::<f64>()?),
            FieldType::Boolean => FieldValue::Boolean(s.to_ascii_lowercase().parse::<bool>()?),
            FieldType::Timestamp => FieldValue::Timestamp(parse_timestamp(s)?),
            FieldType::Date => FieldValue::Date(NaiveDate::parse_from_str(s, "%Y-%m-%d")?),
            FieldType::Time => FieldValue::Time(NaiveTime::parse_from_str(s, "%H:%M:%S%.f")?),
            FieldType::DateTime => {
                let fmt = if s.contains('T') {
                    "%Y-%m-%dT%H:%M:%S%.f"
                } else {
                    "%Y-%m-%d %H:%M:%S%.f"
                };
                FieldValue::DateTime(NaiveDateTime::parse_from_str(s, fmt)?)
            }
            FieldType::Numeric => FieldValue::Numeric(BigDecimal::from_str(s)?),
            FieldType::BigNumeric => FieldValue::BigNumeric(BigDecimal::from_str(s)?),
            FieldType::Geography => FieldValue::Geography(s.to_string()),
            FieldType::Json => FieldValue::Json(s.to_string()),
            FieldType::Interval => FieldValue::Interval(s.to_string()),
            FieldType::Record => return Err("record value given as a string".into()),
        };
        Ok(fv)
    }
}

// Unwrap the {"v": ...} envelope used for record and array members.
fn cell_value(cell: &JsonValue) -> &JsonValue {
    cell.get("v").unwrap_or(&JsonValue::Null)
}

// Timestamps arrive as integer microseconds when useInt64Timestamp is set,
// otherwise as floating point seconds ("1.6094592E9").
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    let micros = if s.contains(['.', 'e', 'E']) {
        (s.parse::<f64>()? * 1_000_000.0).round() as i64
    } else {
        s.parse::<i64>()?
    };
    DateTime::<Utc>::from_timestamp_micros(micros)
        .ok_or_else(|| format!("timestamp {} out of range", micros).into())
}

/// A single typed cell of a query result.
///
/// Values are decoded according to the declared [`FieldType`] of their column.
/// The [`Display`](fmt::Display) implementation gives the default textual form
/// of each value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    String(String),
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Numeric(BigDecimal),
    BigNumeric(BigDecimal),
    Geography(String),
    Json(String),
    Interval(String),
    Record(Vec<(String, FieldValue)>),
    Array(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
    pub fn as_str(&self) -> Option<&str> {
        if let FieldValue::String(s) = self {
            return Some(s);
        }
        None
    }
    pub fn as_i64(&self) -> Option<i64> {
        if let FieldValue::Integer(i) = self {
            return Some(*i);
        }
        None
    }
    pub fn as_f64(&self) -> Option<f64> {
        if let FieldValue::Float(f) = self {
            return Some(*f);
        }
        None
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "NULL"),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Bytes(b) => write!(f, "{}", BASE64_STANDARD.encode(b)),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(d) => write!(f, "{}", d),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Timestamp(t) => {
                write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            FieldValue::Numeric(n) | FieldValue::BigNumeric(n) => write!(f, "{}", n),
            FieldValue::Geography(s) | FieldValue::Json(s) | FieldValue::Interval(s) => {
                write!(f, "{}", s)
            }
            FieldValue::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", name, v)?;
                }
                write!(f, "}}")
            }
            FieldValue::Array(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, "]")
            }
        }
    }
}
