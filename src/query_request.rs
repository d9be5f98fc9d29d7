//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::bigquery::BigQuery;
use crate::error::{ia_err, DataAccessError};
use crate::job::JobReference;
use crate::query_option::{QueryConfig, QueryOption};
use crate::row_iter::RowIterator;
use crate::stringify::parse_to_string;

use std::result::Result;
use tracing::{debug, trace};

/// Encapsulates a single SQL query run through a [`BigQuery`] handle.
///
/// The query text is standard SQL unless [`QueryOption::legacy_sql()`] is given.
///
/// ## Simple Example
/// Here is a simple example of running a query and printing every row as strings:
///
/// ```no_run
/// # use cloud_data_access::{BigQuery, QueryRequest};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bq = BigQuery::new("my-project").await?;
/// let result = QueryRequest::new("SELECT id, name, age FROM people.adults")
///     .query(&bq)
///     .await?;
/// println!("{:?}", result.columns());
/// for row in result.rows() {
///     println!("{:?}", row);
/// }
/// # Ok(())
/// # }
/// ```
///
/// The same operations are available directly on the handle as
/// [`BigQuery::execute()`], [`BigQuery::query()`] and [`BigQuery::execute_async()`].
#[derive(Default, Debug)]
pub struct QueryRequest<'a> {
    pub(crate) sql: String,
    pub(crate) options: Vec<QueryOption<'a>>,
}

/// Struct representing the rows of a completed query, every cell converted to a string.
///
/// This struct is returned from a [`QueryRequest::query()`] call.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl QueryResult {
    /// The column names, in result order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    /// The rows, in the order the service returned them. Each row has one cell per column.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
    /// Take ownership of the columns and rows.
    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.columns, self.rows)
    }
}

impl<'a> QueryRequest<'a> {
    /// Create a new `QueryRequest` from a SQL statement.
    pub fn new(sql: &str) -> QueryRequest<'a> {
        QueryRequest {
            sql: sql.to_string(),
            ..Default::default()
        }
    }

    /// Add one option to the query. Options are applied in the order they are added.
    pub fn option(mut self, opt: QueryOption<'a>) -> QueryRequest<'a> {
        self.options.push(opt);
        self
    }

    /// Add several options to the query.
    pub fn options(mut self, opts: Vec<QueryOption<'a>>) -> QueryRequest<'a> {
        self.options.extend(opts);
        self
    }

    /// Run the query to completion, discarding its rows.
    pub async fn execute(self, bq: &BigQuery) -> Result<(), DataAccessError> {
        self.run(bq).await?;
        Ok(())
    }

    /// Run the query to completion and collect every row as strings.
    ///
    /// Either every row is returned or an error is; partial results are never returned.
    pub async fn query(self, bq: &BigQuery) -> Result<QueryResult, DataAccessError> {
        let mut iter = self.read(bq).await?;
        let mut rows = Vec::new();
        while let Some(values) = iter.next().await? {
            let schema = iter.schema().unwrap_or_default();
            let mut row = Vec::with_capacity(values.len());
            for (field, value) in schema.iter().zip(values.iter()) {
                row.push(parse_to_string(field.field_type, value)?);
            }
            rows.push(row);
        }
        let columns = match iter.schema() {
            Some(s) => s.iter().map(|f| f.name.clone()).collect(),
            None => Vec::new(),
        };
        trace!("query returned {} rows", rows.len());
        Ok(QueryResult { columns, rows })
    }

    /// Run the query to completion and return an iterator over its typed rows.
    ///
    /// A dry run returns an iterator with no rows.
    pub async fn read(self, bq: &BigQuery) -> Result<RowIterator, DataAccessError> {
        match self.run(bq).await? {
            Some(jr) => Ok(RowIterator::new(bq, jr)),
            None => Ok(RowIterator::empty()),
        }
    }

    /// Submit the query and return its job id without waiting for completion.
    pub async fn execute_async(self, bq: &BigQuery) -> Result<String, DataAccessError> {
        self.validate()?;
        let config = QueryConfig::from_options(self.options).await?;
        let (jc, sink) = config.into_job_configuration(&self.sql);
        let (jr, job) = bq.insert_job(jc).await?;
        if let Some(e) = job.error() {
            return Err(e);
        }
        if let Some(s) = sink {
            *s = job.statistics();
        }
        debug!("submitted job {}", jr.job_id);
        Ok(jr.job_id)
    }

    fn validate(&self) -> Result<(), DataAccessError> {
        if self.sql.trim().is_empty() {
            return ia_err!("query statement must be non-empty");
        }
        Ok(())
    }

    // Insert the job and wait for it. Returns None for a dry run, which has no results.
    async fn run(self, bq: &BigQuery) -> Result<Option<JobReference>, DataAccessError> {
        self.validate()?;
        let config = QueryConfig::from_options(self.options).await?;
        let dry_run = config.dry_run();
        let (jc, sink) = config.into_job_configuration(&self.sql);
        let (jr, mut job) = bq.insert_job(jc).await?;
        if !dry_run && !job.is_done() {
            job = bq.wait_for_completion(&jr).await?;
        }
        if let Some(e) = job.error() {
            return Err(e);
        }
        if let Some(s) = sink {
            *s = job.statistics();
        }
        if dry_run {
            debug!("dry run of job {} complete", jr.job_id);
            return Ok(None);
        }
        debug!("job {} complete", jr.job_id);
        Ok(Some(jr))
    }
}
