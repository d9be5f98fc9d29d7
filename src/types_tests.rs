//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::DataAccessErrorCode;
use crate::job::TableSchemaWire;
use crate::types::{FieldSchema, FieldType, FieldValue};
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use serde_json::json;
use std::error::Error;
use std::result::Result;
use std::str::FromStr;

fn decode(ft: FieldType, v: serde_json::Value) -> Result<FieldValue, Box<dyn Error>> {
    Ok(FieldSchema::new("f", ft).decode(&v)?)
}

#[test]
fn test_type_names() -> Result<(), Box<dyn Error>> {
    assert_eq!(FieldType::from_type_name("INTEGER")?, FieldType::Integer);
    assert_eq!(FieldType::from_type_name("INT64")?, FieldType::Integer);
    assert_eq!(FieldType::from_type_name("FLOAT64")?, FieldType::Float);
    assert_eq!(FieldType::from_type_name("BOOL")?, FieldType::Boolean);
    assert_eq!(FieldType::from_type_name("STRUCT")?, FieldType::Record);
    assert_eq!(FieldType::from_type_name("bignumeric")?, FieldType::BigNumeric);
    let err = FieldType::from_type_name("BLOB").unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::BadResponse);
    Ok(())
}

#[test]
fn test_decode_scalars() -> Result<(), Box<dyn Error>> {
    assert_eq!(decode(FieldType::Integer, json!("32"))?, FieldValue::Integer(32));
    assert_eq!(decode(FieldType::Float, json!("60.5"))?, FieldValue::Float(60.5));
    assert_eq!(
        decode(FieldType::Float, json!("-Infinity"))?,
        FieldValue::Float(f64::NEG_INFINITY)
    );
    assert!(decode(FieldType::Float, json!("NaN"))?
        .as_f64()
        .ok_or("not a float")?
        .is_nan());
    assert_eq!(decode(FieldType::Boolean, json!("true"))?, FieldValue::Boolean(true));
    assert_eq!(
        decode(FieldType::String, json!("aa"))?,
        FieldValue::String("aa".to_string())
    );
    assert_eq!(
        decode(FieldType::Bytes, json!("aGVsbG8="))?,
        FieldValue::Bytes(b"hello".to_vec())
    );
    assert_eq!(
        decode(FieldType::Numeric, json!("123.450"))?,
        FieldValue::Numeric(BigDecimal::from_str("123.450")?)
    );
    assert_eq!(decode(FieldType::Integer, json!(null))?, FieldValue::Null);
    Ok(())
}

#[test]
fn test_decode_times() -> Result<(), Box<dyn Error>> {
    let want = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single().ok_or("bad time")?;
    assert_eq!(
        decode(FieldType::Timestamp, json!("1609459200000000"))?,
        FieldValue::Timestamp(want)
    );
    assert_eq!(
        decode(FieldType::Timestamp, json!("1.6094592E9"))?,
        FieldValue::Timestamp(want)
    );
    assert_eq!(
        decode(FieldType::Date, json!("2024-01-02"))?,
        FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).ok_or("bad date")?)
    );
    let t = NaiveTime::from_hms_micro_opt(3, 4, 5, 123456).ok_or("bad time")?;
    assert_eq!(decode(FieldType::Time, json!("03:04:05.123456"))?, FieldValue::Time(t));
    let dt = decode(FieldType::DateTime, json!("2024-01-02T03:04:05"))?;
    assert_eq!(dt.to_string(), "2024-01-02T03:04:05");
    let dt = decode(FieldType::DateTime, json!("2024-01-02 03:04:05.5"))?;
    assert_eq!(dt.to_string(), "2024-01-02T03:04:05.500");
    Ok(())
}

#[test]
fn test_decode_record_and_repeated() -> Result<(), Box<dyn Error>> {
    let schema: TableSchemaWire = serde_json::from_value(json!({
        "fields": [
            {"name": "tags", "type": "STRING", "mode": "REPEATED"},
            {"name": "addr", "type": "RECORD", "fields": [
                {"name": "city", "type": "STRING"},
                {"name": "zip", "type": "INTEGER"}
            ]}
        ]
    }))?;
    let tags = FieldSchema::from_wire(&schema.fields[0])?;
    let addr = FieldSchema::from_wire(&schema.fields[1])?;
    assert!(tags.repeated);
    assert_eq!(addr.fields.len(), 2);

    let v = tags.decode(&json!([{"v": "a"}, {"v": "b"}]))?;
    assert_eq!(
        v,
        FieldValue::Array(vec![
            FieldValue::String("a".to_string()),
            FieldValue::String("b".to_string())
        ])
    );
    assert_eq!(v.to_string(), "[a, b]");

    let v = addr.decode(&json!({"f": [{"v": "Austin"}, {"v": "78701"}]}))?;
    assert_eq!(v.to_string(), "{city: Austin, zip: 78701}");
    Ok(())
}

#[test]
fn test_decode_errors() {
    let err = decode(FieldType::Integer, json!("abc")).unwrap_err();
    assert!(err.to_string().contains("abc"));
    let err = FieldSchema::new("n", FieldType::Integer)
        .decode(&json!(12))
        .unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::BadResponse);
    let err = FieldSchema::new("r", FieldType::Record)
        .decode(&json!("x"))
        .unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::BadResponse);
}

#[test]
fn test_display() -> Result<(), Box<dyn Error>> {
    assert_eq!(FieldValue::Null.to_string(), "NULL");
    let ts = Utc.timestamp_micros(1704164645123456).single().ok_or("bad ts")?;
    assert_eq!(
        FieldValue::Timestamp(ts).to_string(),
        "2024-01-02T03:04:05.123456Z"
    );
    assert_eq!(FieldValue::Boolean(false).to_string(), "false");
    Ok(())
}
