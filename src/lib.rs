//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Cloud Data Access
//!
//! Thin Rust wrappers over two managed cloud data services:
//! - a **key-value** wrapper over [Amazon DynamoDB](https://aws.amazon.com/dynamodb/): create
//!   tables, list table names, and get/set string values;
//! - a **query** wrapper over [Google BigQuery](https://cloud.google.com/bigquery): run SQL,
//!   retrieve results as strings or typed values, copy results into destination tables, and
//!   submit jobs without waiting for them.
//!
//! This crate supplies and uses Rust `async` methods throughout, using the [tokio](https://crates.io/crates/tokio) runtime. There is currently no blocking support.
//!
//! The general flow for an application is:
//! - Create a [`BigQueryBuilder`] or [`KvHandleBuilder`] with all needed parameters
//! - Build a [`BigQuery`] or [`KvHandle`] from it, to be used throughout the application, across all threads
//! - Run queries with [`BigQuery::query()`], [`BigQuery::execute()`] and [`BigQuery::execute_async()`]
//!   (or the equivalent [`QueryRequest`] methods), and read or write values with [`KvHandle::get()`] and [`KvHandle::set()`]
//!
//! ## Simple Example
//! The following code runs a query and prints every row, each cell converted to a string:
//! ```no_run
//! use cloud_data_access::BigQuery;
//! use std::error::Error;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn Error>> {
//!     let bq = BigQuery::builder()
//!         .from_environment()?
//!         .build().await?;
//!     let result = bq.query("SELECT id, name, age FROM people.adults", vec![]).await?;
//!     println!("{:?}", result.columns());
//!     for row in result.rows() {
//!         println!("{:?}", row);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Query options
//!
//! Each query takes a list of [`QueryOption`]s: legacy SQL, dry run, a destination table
//! with its create and write dispositions, and a [`JobStatistics`] struct to fill once the
//! job has finished. See the [`query_option`] module for details.
//!
//! ## Result values
//!
//! [`BigQuery::query()`] converts each cell with [`parse_to_string()`]: integers in base 10,
//! floats in scientific notation (`6.05E+01`), strings unchanged, and every other type in the
//! default textual form of its [`FieldValue`](types::FieldValue). Use [`QueryRequest::read()`]
//! to get the typed values instead.
//!
//! ## Configuring the handles
//!
//! Both builders can be filled from the environment with `from_environment()`; see
//! [`BigQueryBuilder::from_environment()`] and [`KvHandleBuilder::from_environment()`] for
//! the variables read. BigQuery credentials default to
//! [application default credentials](https://cloud.google.com/docs/authentication/application-default-credentials);
//! DynamoDB credentials and region default to the standard AWS configuration chain.
//!
//! ## Logging
//!
//! The crate logs with [tracing](https://crates.io/crates/tracing): handle creation at
//! `debug` level, individual requests at `trace` level. Errors are returned, never logged.
//!
//! ## License
//!
//! Copyright (C) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//!
//! This library is licensed under the Universal Permissive License 1.0.
//!

pub(crate) mod bigquery_builder;
pub use crate::bigquery_builder::{BigQueryBuilder, BigQueryMode};

pub(crate) mod bigquery;
pub use crate::bigquery::BigQuery;

pub(crate) mod error;
pub use crate::error::{DataAccessError, DataAccessErrorCode};

pub(crate) mod job;
pub use crate::job::{JobReference, JobState, JobStatistics, JobStatus, TableReference};

pub(crate) mod kv_builder;
pub use crate::kv_builder::{
    CreateTableRequest, CreateTableRequestBuilder, CreateTableRequestBuilderError, KvHandleBuilder,
};

pub(crate) mod kv;
pub use crate::kv::KvHandle;

pub mod query_option;
pub use crate::query_option::{CreateDisposition, QueryConfig, QueryOption, WriteDisposition};

#[cfg(test)]
pub(crate) mod query_option_tests;
pub(crate) mod query_request;
pub use crate::query_request::{QueryRequest, QueryResult};

pub(crate) mod row_iter;
pub use crate::row_iter::RowIterator;

pub(crate) mod serde_helpers;
pub(crate) mod stringify;
pub use crate::stringify::{format_float, parse_to_string};


pub mod types;

#[cfg(test)]
pub(crate) mod types_tests;
