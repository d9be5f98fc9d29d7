//
// Copyright (c) 2024 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Query jobs: references, state and statistics, plus the BigQuery REST v2
//! payloads used to submit and inspect them.

use serde_derive::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::DataAccessError;
use crate::serde_helpers::opt_i64;

/// Identifies a query job.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Identifies a table, possibly in another project than the one running the query.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReference {
    pub project_id: String,
    pub dataset_id: String,
    pub table_id: String,
}

/// Lifecycle state of a job.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobState {
    #[default]
    Pending,
    Running,
    Done,
}

/// Statistics reported by the service for a query job.
///
/// Times are milliseconds since the epoch (Jan 1 1970). Fields the service did not
/// report are `None`; a dry run, for example, only reports the bytes it would process.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct JobStatistics {
    pub creation_time: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub total_bytes_processed: Option<i64>,
    pub total_bytes_billed: Option<i64>,
    pub cache_hit: Option<bool>,
    pub statement_type: Option<String>,
    pub num_dml_affected_rows: Option<i64>,
}

impl JobStatistics {
    pub(crate) fn from_wire(w: &JobStatisticsWire) -> JobStatistics {
        let mut s = JobStatistics {
            creation_time: w.creation_time,
            start_time: w.start_time,
            end_time: w.end_time,
            total_bytes_processed: w.total_bytes_processed,
            ..Default::default()
        };
        if let Some(q) = &w.query {
            if q.total_bytes_processed.is_some() {
                s.total_bytes_processed = q.total_bytes_processed;
            }
            s.total_bytes_billed = q.total_bytes_billed;
            s.cache_hit = q.cache_hit;
            s.statement_type = q.statement_type.clone();
            s.num_dml_affected_rows = q.num_dml_affected_rows;
        }
        s
    }
}

/// Current status of a previously submitted job, returned from
/// [`BigQuery::job_status()`](crate::BigQuery::job_status()).
#[derive(Default, Debug, Clone)]
pub struct JobStatus {
    pub(crate) job_id: String,
    pub(crate) state: JobState,
    pub(crate) error: Option<DataAccessError>,
    pub(crate) statistics: JobStatistics,
}

impl JobStatus {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }
    pub fn state(&self) -> JobState {
        self.state
    }
    /// True once the job has finished, whether or not it succeeded.
    pub fn done(&self) -> bool {
        self.state == JobState::Done
    }
    /// The error the job finished with, if any.
    pub fn error(&self) -> Option<&DataAccessError> {
        self.error.as_ref()
    }
    pub fn statistics(&self) -> &JobStatistics {
        &self.statistics
    }

    pub(crate) fn from_wire(job_id: &str, w: &JobWire) -> JobStatus {
        JobStatus {
            job_id: job_id.to_string(),
            state: w.state(),
            error: w.error(),
            statistics: w.statistics(),
        }
    }
}

// ---- REST v2 wire models ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobInsert {
    pub(crate) job_reference: JobReference,
    pub(crate) configuration: JobConfigurationWire,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobConfigurationWire {
    pub(crate) query: QueryConfigurationWire,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub(crate) dry_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryConfigurationWire {
    pub(crate) query: String,
    pub(crate) use_legacy_sql: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) destination_table: Option<TableReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) create_disposition: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) write_disposition: Option<&'static str>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ErrorProto {
    #[serde(default)]
    pub(crate) reason: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

impl ErrorProto {
    pub(crate) fn to_error(&self, status: u16) -> DataAccessError {
        DataAccessError::from_reason(
            self.reason.as_deref().unwrap_or(""),
            status,
            self.message.as_deref().unwrap_or("unknown error"),
        )
    }
}

// {"error": {"code": 404, "message": "...", "errors": [{"reason": "notFound", ...}]}}
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) errors: Vec<ErrorProto>,
}

impl ErrorResponse {
    pub(crate) fn to_error(&self, status: u16) -> DataAccessError {
        let reason = self
            .error
            .errors
            .first()
            .and_then(|e| e.reason.as_deref())
            .unwrap_or("");
        let msg = self.error.message.as_deref().unwrap_or("unknown error");
        DataAccessError::from_reason(reason, status, msg)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStatusWire {
    #[serde(default)]
    pub(crate) state: Option<JobState>,
    #[serde(default)]
    pub(crate) error_result: Option<ErrorProto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryStatisticsWire {
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) total_bytes_processed: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) total_bytes_billed: Option<i64>,
    #[serde(default)]
    pub(crate) cache_hit: Option<bool>,
    #[serde(default)]
    pub(crate) statement_type: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) num_dml_affected_rows: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStatisticsWire {
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) creation_time: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) start_time: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) end_time: Option<i64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) total_bytes_processed: Option<i64>,
    #[serde(default)]
    pub(crate) query: Option<QueryStatisticsWire>,
}

// Response of jobs.insert and jobs.get.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobWire {
    #[serde(default)]
    pub(crate) job_reference: Option<JobReference>,
    #[serde(default)]
    pub(crate) status: Option<JobStatusWire>,
    #[serde(default)]
    pub(crate) statistics: Option<JobStatisticsWire>,
}

impl JobWire {
    pub(crate) fn state(&self) -> JobState {
        self.status
            .as_ref()
            .and_then(|s| s.state)
            .unwrap_or_default()
    }

    pub(crate) fn is_done(&self) -> bool {
        self.state() == JobState::Done
    }

    // A failed job carries its error in status.errorResult; only the reason decides the code.
    pub(crate) fn error(&self) -> Option<DataAccessError> {
        let e = self.status.as_ref()?.error_result.as_ref()?;
        Some(e.to_error(0))
    }

    pub(crate) fn statistics(&self) -> JobStatistics {
        self.statistics
            .as_ref()
            .map(JobStatistics::from_wire)
            .unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TableFieldSchemaWire {
    pub(crate) name: String,
    #[serde(rename = "type")]
    pub(crate) field_type: String,
    #[serde(default)]
    pub(crate) mode: Option<String>,
    #[serde(default)]
    pub(crate) fields: Vec<TableFieldSchemaWire>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TableSchemaWire {
    #[serde(default)]
    pub(crate) fields: Vec<TableFieldSchemaWire>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CellWire {
    #[serde(default)]
    pub(crate) v: JsonValue,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RowWire {
    #[serde(default)]
    pub(crate) f: Vec<CellWire>,
}

// Response of jobs.getQueryResults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryResultsWire {
    #[serde(default)]
    pub(crate) job_complete: bool,
    #[serde(default)]
    pub(crate) schema: Option<TableSchemaWire>,
    #[serde(default)]
    pub(crate) rows: Vec<RowWire>,
    #[serde(default)]
    pub(crate) page_token: Option<String>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub(crate) total_rows: Option<i64>,
}
