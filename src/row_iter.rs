//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::bigquery::BigQuery;
use crate::error::{bad_response, DataAccessError, DataAccessErrorCode};
use crate::job::{JobReference, RowWire};
use crate::types::{FieldSchema, FieldValue};

use std::result::Result;
use tracing::trace;

/// Walks the rows of a completed query, one page of results at a time.
///
/// Returned from [`QueryRequest::read()`](crate::QueryRequest::read()). Pages are fetched
/// lazily as [`next()`](RowIterator::next()) is called.
///
/// ```no_run
/// # use cloud_data_access::{BigQuery, QueryRequest};
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let bq = BigQuery::new("my-project").await?;
/// let mut iter = QueryRequest::new("SELECT id, name FROM people.adults")
///     .read(&bq)
///     .await?;
/// while let Some(row) = iter.next().await? {
///     println!("{:?}", row);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RowIterator {
    bq: Option<BigQuery>,
    job: JobReference,
    schema: Option<Vec<FieldSchema>>,
    rows: std::vec::IntoIter<RowWire>,
    page_token: Option<String>,
    total_rows: Option<i64>,
    fetched: bool,
}

impl RowIterator {
    pub(crate) fn new(bq: &BigQuery, job: JobReference) -> RowIterator {
        RowIterator {
            bq: Some(bq.clone()),
            job,
            schema: None,
            rows: Vec::new().into_iter(),
            page_token: None,
            total_rows: None,
            fetched: false,
        }
    }

    // An iterator over nothing, for dry runs.
    pub(crate) fn empty() -> RowIterator {
        RowIterator {
            bq: None,
            job: JobReference::default(),
            schema: Some(Vec::new()),
            rows: Vec::new().into_iter(),
            page_token: None,
            total_rows: Some(0),
            fetched: true,
        }
    }

    /// Get the next row, or `None` once every row has been returned.
    ///
    /// A failure to fetch a page of results returns a
    /// [`RowIteration`](DataAccessErrorCode::RowIteration) error.
    pub async fn next(&mut self) -> Result<Option<Vec<FieldValue>>, DataAccessError> {
        loop {
            if let Some(row) = self.rows.next() {
                return self.decode(row).map(Some);
            }
            if self.fetched && self.page_token.is_none() {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// The schema of the result. This is `None` until the first row has been requested.
    pub fn schema(&self) -> Option<&[FieldSchema]> {
        self.schema.as_deref()
    }

    /// The total number of rows in the result, as reported by the service.
    pub fn total_rows(&self) -> Option<i64> {
        self.total_rows
    }

    /// The id of the job whose results are being read.
    pub fn job_id(&self) -> &str {
        &self.job.job_id
    }

    async fn fetch_page(&mut self) -> Result<(), DataAccessError> {
        let Some(bq) = &self.bq else {
            self.page_token = None;
            self.fetched = true;
            return Ok(());
        };
        trace!(
            "fetching result page of job {} (token={:?})",
            self.job.job_id,
            self.page_token
        );
        let page = bq
            .get_query_results(&self.job, self.page_token.as_deref(), None)
            .await
            .map_err(|e| e.with_code(DataAccessErrorCode::RowIteration))?;
        if !page.job_complete {
            // still running: the next call long-polls again
            return Ok(());
        }
        if self.schema.is_none() {
            let mut schema = Vec::new();
            if let Some(s) = &page.schema {
                for f in &s.fields {
                    schema.push(FieldSchema::from_wire(f)?);
                }
            }
            self.schema = Some(schema);
        }
        if page.total_rows.is_some() {
            self.total_rows = page.total_rows;
        }
        self.page_token = page.page_token.filter(|t| !t.is_empty());
        self.rows = page.rows.into_iter();
        self.fetched = true;
        Ok(())
    }

    fn decode(&self, row: RowWire) -> Result<Vec<FieldValue>, DataAccessError> {
        let schema = self.schema.as_deref().unwrap_or_default();
        if row.f.len() != schema.len() {
            return Err(bad_response!(
                "row has {} cells but schema has {} fields",
                row.f.len(),
                schema.len()
            ));
        }
        let mut values = Vec::with_capacity(schema.len());
        for (field, cell) in schema.iter().zip(row.f.iter()) {
            values.push(field.decode(&cell.v)?);
        }
        Ok(values)
    }
}
