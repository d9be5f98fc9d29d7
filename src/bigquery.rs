//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::bigquery_builder::{AuthProvider, BigQueryBuilder, BigQueryMode};
use crate::error::{ia_err, user_agent, DataAccessError};
use crate::job::{
    ErrorResponse, JobConfigurationWire, JobInsert, JobReference, JobStatus, JobWire,
    QueryResultsWire,
};
use crate::query_option::QueryOption;
use crate::query_request::{QueryRequest, QueryResult};

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::result::Result;
use std::sync::Arc;
use tracing::{debug, trace};
use url::Url;

const BIGQUERY_SCOPE: &str = "https://www.googleapis.com/auth/bigquery";

// Server-side wait of each getQueryResults long poll.
const POLL_TIMEOUT_MS: u64 = 10_000;

/// **The BigQuery handle**.
///
/// This should be created once and used throughout the application lifetime, across all
/// threads.
///
/// Note: there is no need to enclose this struct in an `Rc` or [`Arc`], as it uses an
/// [`Arc`] internally, so calling `.clone()` on this struct will always return the
/// same underlying handle.
#[derive(Clone, Debug)]
pub struct BigQuery {
    // Use an inner Arc so cloning keeps the same contents
    pub(crate) inner: Arc<BigQueryRef>,
}

#[derive(Debug)]
pub(crate) struct BigQueryRef {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) project_id: String,
    pub(crate) location: Option<String>,
    pub(crate) mode: BigQueryMode,
    auth: AuthProvider,
}

impl BigQuery {
    /// Create a new [`BigQueryBuilder`].
    pub fn builder() -> BigQueryBuilder {
        BigQueryBuilder::new()
    }

    /// Create a handle running queries in `project_id`, authenticated with application
    /// default credentials.
    pub async fn new(project_id: &str) -> Result<BigQuery, DataAccessError> {
        BigQueryBuilder::new().project_id(project_id)?.build().await
    }

    // Create the new handle based on builder configuration
    pub(crate) async fn from_builder(mut builder: BigQueryBuilder) -> Result<BigQuery, DataAccessError> {
        if let AuthProvider::ApplicationDefault = builder.auth {
            builder.auth = AuthProvider::Provider(gcp_auth::provider().await?);
        }
        let project_id = match (&builder.project_id, &builder.auth) {
            (Some(p), _) => p.clone(),
            (None, AuthProvider::Provider(p)) => p.project_id().await?.to_string(),
            (None, _) => {
                if builder.from_environment {
                    return ia_err!("can't determine BigQuery project: set GOOGLE_CLOUD_PROJECT");
                }
                return ia_err!(
                    "can't determine BigQuery project: call BigQueryBuilder::project_id()"
                );
            }
        };
        let client = {
            if let Some(c) = &builder.client {
                c.clone()
            } else {
                let mut cb = reqwest::Client::builder();
                if let Some(t) = builder.timeout {
                    cb = cb.timeout(t).connect_timeout(t);
                }
                cb.build()?
            }
        };
        let base_url = builder.base_url()?;
        debug!(
            "Creating new BigQuery handle: project={}, {:?}, {:?}, endpoint={}",
            project_id, builder.mode, builder.auth, base_url
        );
        Ok(BigQuery {
            inner: Arc::new(BigQueryRef {
                client,
                base_url,
                project_id,
                location: builder.location,
                mode: builder.mode,
                auth: builder.auth,
            }),
        })
    }

    /// The project this handle runs queries in.
    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    /// Run a query, discarding any rows it returns.
    ///
    /// Returns once the query has completed. Fails if the service rejects the query, for
    /// example for a syntax error, missing permissions or a violated create/write disposition.
    pub async fn execute(&self, sql: &str, options: Vec<QueryOption<'_>>) -> Result<(), DataAccessError> {
        QueryRequest::new(sql).options(options).execute(self).await
    }

    /// Run a query and return all of its rows, every cell converted to a string.
    ///
    /// See [`parse_to_string()`](crate::parse_to_string()) for the conversion rules. A dry run
    /// returns an empty result.
    pub async fn query(
        &self,
        sql: &str,
        options: Vec<QueryOption<'_>>,
    ) -> Result<QueryResult, DataAccessError> {
        QueryRequest::new(sql).options(options).query(self).await
    }

    /// Submit a query and return its job id without waiting for it to complete.
    ///
    /// Use [`job_status()`](BigQuery::job_status()) to follow the job.
    pub async fn execute_async(
        &self,
        sql: &str,
        options: Vec<QueryOption<'_>>,
    ) -> Result<String, DataAccessError> {
        QueryRequest::new(sql).options(options).execute_async(self).await
    }

    /// Get the current state of a previously submitted job.
    pub async fn job_status(&self, job_id: &str) -> Result<JobStatus, DataAccessError> {
        if job_id.is_empty() {
            return ia_err!("job id must be non-empty");
        }
        let jr = self.job_reference(job_id);
        let job = self.get_job(&jr).await?;
        Ok(JobStatus::from_wire(job_id, &job))
    }

    pub(crate) fn job_reference(&self, job_id: &str) -> JobReference {
        JobReference {
            project_id: self.inner.project_id.clone(),
            job_id: job_id.to_string(),
            location: self.inner.location.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<Url, DataAccessError> {
        Ok(self.inner.base_url.join(path)?)
    }

    async fn headers(&self) -> Result<HeaderMap, DataAccessError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(user_agent()));
        if self.inner.mode == BigQueryMode::Emulator {
            return Ok(headers);
        }
        let token = match &self.inner.auth {
            AuthProvider::Provider(p) => Some(p.token(&[BIGQUERY_SCOPE]).await?.as_str().to_string()),
            AuthProvider::Token(t) => Some(t.clone()),
            AuthProvider::ApplicationDefault | AuthProvider::None => None,
        };
        if let Some(t) = token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", t))?);
        }
        Ok(headers)
    }

    // Send a request and decode its json response. Service errors are mapped from the
    // standard {"error": {...}} body.
    async fn send<T: DeserializeOwned>(&self, rb: RequestBuilder) -> Result<T, DataAccessError> {
        let rb = rb.headers(self.headers().await?);
        let resp = rb.send().await?;
        let status = resp.status();
        trace!("response status: {}", status);
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }
        let body = resp.text().await?;
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(er) => Err(er.to_error(status.as_u16())),
            Err(_) => Err(DataAccessError::from_reason("", status.as_u16(), &body)),
        }
    }

    /// Look up a dataset of this handle's project. Fails if it does not exist.
    pub(crate) async fn get_dataset(&self, dataset_id: &str) -> Result<(), DataAccessError> {
        if dataset_id.is_empty() {
            return ia_err!("dataset id must be non-empty");
        }
        let url = self.url(&format!(
            "projects/{}/datasets/{}",
            self.inner.project_id, dataset_id
        ))?;
        trace!("GET {}", url);
        let _: serde_json::Value = self
            .send(self.inner.client.request(Method::GET, url))
            .await?;
        Ok(())
    }

    pub(crate) async fn insert_job(
        &self,
        configuration: JobConfigurationWire,
    ) -> Result<(JobReference, JobWire), DataAccessError> {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        let job_id = format!("job_{}", suffix);
        let body = JobInsert {
            job_reference: self.job_reference(&job_id),
            configuration,
        };
        let url = self.url(&format!("projects/{}/jobs", self.inner.project_id))?;
        debug!("inserting query job {} (dry_run={})", job_id, body.configuration.dry_run);
        let job: JobWire = self
            .send(self.inner.client.request(Method::POST, url).json(&body))
            .await?;
        let jr = match &job.job_reference {
            Some(jr) => jr.clone(),
            None => body.job_reference,
        };
        Ok((jr, job))
    }

    pub(crate) async fn get_job(&self, jr: &JobReference) -> Result<JobWire, DataAccessError> {
        let mut url = self.url(&format!("projects/{}/jobs/{}", jr.project_id, jr.job_id))?;
        if let Some(loc) = &jr.location {
            url.query_pairs_mut().append_pair("location", loc);
        }
        trace!("GET {}", url);
        self.send(self.inner.client.request(Method::GET, url)).await
    }

    pub(crate) async fn get_query_results(
        &self,
        jr: &JobReference,
        page_token: Option<&str>,
        max_results: Option<u32>,
    ) -> Result<QueryResultsWire, DataAccessError> {
        let mut url = self.url(&format!("projects/{}/queries/{}", jr.project_id, jr.job_id))?;
        {
            let mut q = url.query_pairs_mut();
            if let Some(pt) = page_token {
                q.append_pair("pageToken", pt);
            }
            if let Some(mr) = max_results {
                q.append_pair("maxResults", &mr.to_string());
            }
            if let Some(loc) = &jr.location {
                q.append_pair("location", loc);
            }
            q.append_pair("timeoutMs", &POLL_TIMEOUT_MS.to_string());
            q.append_pair("formatOptions.useInt64Timestamp", "true");
        }
        trace!("GET {}", url);
        self.send(self.inner.client.request(Method::GET, url)).await
    }

    /// Wait for a job to finish, returning its final state.
    ///
    /// Each getQueryResults call blocks on the server for up to its timeout, so this loop
    /// does not spin.
    pub(crate) async fn wait_for_completion(&self, jr: &JobReference) -> Result<JobWire, DataAccessError> {
        loop {
            let qr = self.get_query_results(jr, None, Some(0)).await?;
            if qr.job_complete {
                break;
            }
            trace!("job {} not complete yet", jr.job_id);
        }
        self.get_job(jr).await
    }
}
