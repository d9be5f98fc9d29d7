//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Helpers for the BigQuery REST encoding of 64-bit integers.
//!
//! The service sends every int64 as a JSON string (`"totalBytesProcessed": "60"`),
//! but emulators and older endpoints sometimes send plain numbers. These accept both.

use serde::{Deserialize as _, Deserializer};
use serde_derive::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrInt {
    Str(String),
    Int(i64),
}

fn to_i64<E: serde::de::Error>(v: StringOrInt) -> Result<i64, E> {
    match v {
        StringOrInt::Int(i) => Ok(i),
        StringOrInt::Str(s) => s
            .parse::<i64>()
            .map_err(|e| E::custom(format!("invalid int64 value '{}': {}", s, e))),
    }
}

pub(crate) fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<StringOrInt>::deserialize(deserializer)? {
        Some(v) => Ok(Some(to_i64(v)?)),
        None => Ok(None),
    }
}
