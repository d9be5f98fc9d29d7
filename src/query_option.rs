//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Options that configure a single query.
//!
//! A query is configured by a list of [`QueryOption`]s. They are applied in order over
//! the defaults of [`QueryConfig`], each option setting exactly one field; a repeated
//! option overwrites the earlier value. Applying an option may fail, and the first failure
//! aborts the query before anything is sent to the service.
//!
//! ```no_run
//! use cloud_data_access::{BigQuery, JobStatistics, QueryOption};
//! # #[tokio::main]
//! # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bq = BigQuery::new("my-project").await?;
//! let mut stats = JobStatistics::default();
//! bq.execute(
//!     "SELECT name, age FROM people.adults",
//!     vec![
//!         QueryOption::destination_table(&bq, "reports", "adults_copy"),
//!         QueryOption::write_append(),
//!         QueryOption::job_statistics(&mut stats),
//!     ],
//! )
//! .await?;
//! println!("bytes processed: {:?}", stats.total_bytes_processed);
//! # Ok(())
//! # }
//! ```

use crate::bigquery::BigQuery;
use crate::error::{DataAccessError, DataAccessErrorCode};
use crate::job::{JobConfigurationWire, JobStatistics, QueryConfigurationWire, TableReference};
use std::result::Result;
use tracing::trace;

/// Whether the destination table may be created by the query.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub enum CreateDisposition {
    /// Create the destination table if it does not exist.
    #[default]
    CreateIfNeeded,
    /// Fail the query if the destination table does not exist.
    CreateNever,
}

impl CreateDisposition {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            CreateDisposition::CreateIfNeeded => "CREATE_IF_NEEDED",
            CreateDisposition::CreateNever => "CREATE_NEVER",
        }
    }
}

/// How query results interact with existing rows of the destination table.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq)]
pub enum WriteDisposition {
    /// Replace the table contents with the query results.
    #[default]
    WriteTruncate,
    /// Append the query results to the table.
    WriteAppend,
    /// Fail the query if the table already contains data.
    WriteEmpty,
}

impl WriteDisposition {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            WriteDisposition::WriteTruncate => "WRITE_TRUNCATE",
            WriteDisposition::WriteAppend => "WRITE_APPEND",
            WriteDisposition::WriteEmpty => "WRITE_EMPTY",
        }
    }
}

/// A single query setting. See the [module documentation](crate::query_option) for how
/// options are combined.
#[derive(Debug)]
pub enum QueryOption<'a> {
    /// Interpret the query text with the legacy SQL dialect.
    LegacySql,
    /// Validate the query and estimate its cost without running it.
    ///
    /// No rows are read or written. Statistics are still reported through a
    /// [`QueryOption::JobStatistics`] sink.
    DryRun,
    /// Whether the destination table may be created. Only sent with a destination table.
    CreateDisposition(CreateDisposition),
    /// How results are written into the destination table. Only sent with a destination table.
    WriteDisposition(WriteDisposition),
    /// Write the query results to `dataset_id.table_id` in the project of `target`.
    ///
    /// The dataset is looked up through `target` when the option is applied, and the
    /// option fails with [`OptionFailed`](DataAccessErrorCode::OptionFailed) if it
    /// cannot be found.
    DestinationTable {
        target: &'a BigQuery,
        dataset_id: String,
        table_id: String,
    },
    /// Fill the given struct with the job's statistics once it has finished.
    JobStatistics(&'a mut JobStatistics),
}

impl<'a> QueryOption<'a> {
    /// Use the legacy SQL dialect instead of standard SQL.
    pub fn legacy_sql() -> QueryOption<'a> {
        QueryOption::LegacySql
    }
    /// Validate and estimate the query without running it.
    pub fn dry_run() -> QueryOption<'a> {
        QueryOption::DryRun
    }
    /// Create the destination table when it does not exist. This is the default.
    pub fn create_if_needed() -> QueryOption<'a> {
        QueryOption::CreateDisposition(CreateDisposition::CreateIfNeeded)
    }
    /// Fail when the destination table does not exist.
    pub fn create_never() -> QueryOption<'a> {
        QueryOption::CreateDisposition(CreateDisposition::CreateNever)
    }
    /// Replace the destination table contents. This is the default.
    pub fn write_truncate() -> QueryOption<'a> {
        QueryOption::WriteDisposition(WriteDisposition::WriteTruncate)
    }
    /// Append results to the destination table.
    pub fn write_append() -> QueryOption<'a> {
        QueryOption::WriteDisposition(WriteDisposition::WriteAppend)
    }
    /// Write results only if the destination table is empty.
    pub fn write_empty() -> QueryOption<'a> {
        QueryOption::WriteDisposition(WriteDisposition::WriteEmpty)
    }
    /// Write results to `dataset_id.table_id` in the project of `target`, which may
    /// differ from the project running the query.
    pub fn destination_table(target: &'a BigQuery, dataset_id: &str, table_id: &str) -> QueryOption<'a> {
        QueryOption::DestinationTable {
            target,
            dataset_id: dataset_id.to_string(),
            table_id: table_id.to_string(),
        }
    }
    /// Fill `sink` with the job's statistics.
    pub fn job_statistics(sink: &'a mut JobStatistics) -> QueryOption<'a> {
        QueryOption::JobStatistics(sink)
    }
}

/// The settings of a single query, built from a list of [`QueryOption`]s.
#[derive(Debug, Default)]
pub struct QueryConfig<'a> {
    pub(crate) legacy_sql: bool,
    pub(crate) dry_run: bool,
    pub(crate) create_disposition: CreateDisposition,
    pub(crate) write_disposition: WriteDisposition,
    pub(crate) destination: Option<TableReference>,
    pub(crate) statistics: Option<&'a mut JobStatistics>,
}

impl<'a> QueryConfig<'a> {
    /// Apply `options` in order over the default settings.
    ///
    /// Returns the error of the first option that fails.
    pub async fn from_options(options: Vec<QueryOption<'a>>) -> Result<QueryConfig<'a>, DataAccessError> {
        let mut config = QueryConfig::default();
        for opt in options {
            config.apply(opt).await?;
        }
        Ok(config)
    }

    async fn apply(&mut self, opt: QueryOption<'a>) -> Result<(), DataAccessError> {
        match opt {
            QueryOption::LegacySql => self.legacy_sql = true,
            QueryOption::DryRun => self.dry_run = true,
            QueryOption::CreateDisposition(cd) => self.create_disposition = cd,
            QueryOption::WriteDisposition(wd) => self.write_disposition = wd,
            QueryOption::JobStatistics(sink) => self.statistics = Some(sink),
            QueryOption::DestinationTable {
                target,
                dataset_id,
                table_id,
            } => {
                trace!(
                    "resolving destination dataset {}.{}",
                    target.project_id(),
                    dataset_id
                );
                target.get_dataset(&dataset_id).await.map_err(|e| {
                    DataAccessError::new(
                        DataAccessErrorCode::OptionFailed,
                        &format!(
                            "destination table {}.{}.{}: {}",
                            target.project_id(),
                            dataset_id,
                            table_id,
                            e.message
                        ),
                    )
                })?;
                self.destination = Some(TableReference {
                    project_id: target.project_id().to_string(),
                    dataset_id,
                    table_id,
                });
            }
        }
        Ok(())
    }

    pub fn legacy_sql(&self) -> bool {
        self.legacy_sql
    }
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }
    pub fn create_disposition(&self) -> CreateDisposition {
        self.create_disposition
    }
    pub fn write_disposition(&self) -> WriteDisposition {
        self.write_disposition
    }
    pub fn destination(&self) -> Option<&TableReference> {
        self.destination.as_ref()
    }
    pub fn has_statistics_sink(&self) -> bool {
        self.statistics.is_some()
    }

    // Consume the config into the job configuration payload, handing back the statistics sink.
    pub(crate) fn into_job_configuration(
        self,
        sql: &str,
    ) -> (JobConfigurationWire, Option<&'a mut JobStatistics>) {
        let (create_disposition, write_disposition) = match self.destination {
            Some(_) => (
                Some(self.create_disposition.as_str()),
                Some(self.write_disposition.as_str()),
            ),
            None => (None, None),
        };
        let jc = JobConfigurationWire {
            query: QueryConfigurationWire {
                query: sql.to_string(),
                use_legacy_sql: self.legacy_sql,
                destination_table: self.destination,
                create_disposition,
                write_disposition,
            },
            dry_run: self.dry_run,
        };
        (jc, self.statistics)
    }
}
