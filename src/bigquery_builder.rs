//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`BigQuery`](crate::BigQuery) handle
//!

use std::default::Default;
use std::env;
use std::fmt;
use std::result::Result;
use std::sync::Arc;
use std::time::Duration;

use crate::bigquery::BigQuery;
use crate::error::{ia_err, DataAccessError};
use gcp_auth::TokenProvider;
use reqwest::Client;
use url::Url;

pub(crate) const DEFAULT_BIGQUERY_ENDPOINT: &str = "https://bigquery.googleapis.com";

/// Builder used to set all the parameters to create a [`BigQuery`] handle.
#[derive(Default, Debug, Clone)]
pub struct BigQueryBuilder {
    pub(crate) project_id: Option<String>,
    pub(crate) endpoint: Option<String>,
    pub(crate) location: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) mode: BigQueryMode,
    pub(crate) client: Option<Client>,
    pub(crate) auth: AuthProvider,
    // For error messaging
    pub(crate) from_environment: bool,
}

/// Where the [`BigQuery`] handle sends its requests.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum BigQueryMode {
    /// Connect to the Google BigQuery service.
    #[default]
    Cloud,
    /// Connect to a local BigQuery emulator. No credentials are sent.
    Emulator,
}

#[derive(Default, Clone)]
pub(crate) enum AuthProvider {
    // Application default credentials, resolved when the handle is built
    #[default]
    ApplicationDefault,
    Provider(Arc<dyn TokenProvider>),
    Token(String),
    None,
}

impl fmt::Debug for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthProvider::ApplicationDefault => write!(f, "ApplicationDefault"),
            AuthProvider::Provider(_) => write!(f, "Provider"),
            AuthProvider::Token(_) => write!(f, "Token(****)"),
            AuthProvider::None => write!(f, "None"),
        }
    }
}

impl BigQueryBuilder {
    /// Create a new BigQueryBuilder struct.
    ///
    /// By default the handle connects to the Google BigQuery service, authenticating with
    /// application default credentials. Consider calling
    /// [`from_environment()`](BigQueryBuilder::from_environment()) to collect parameters from
    /// the local environment.
    pub fn new() -> Self {
        BigQueryBuilder {
            ..Default::default()
        }
    }
    /// Build a new [`BigQuery`] handle.
    ///
    /// If no project was given, the project associated with the application default
    /// credentials is used.
    pub async fn build(self) -> Result<BigQuery, DataAccessError> {
        BigQuery::from_builder(self).await
    }
    /// Gather configuration settings from the current environment.
    ///
    /// The values can be overridden in code if this method is called first and other
    /// methods are called afterwards.
    ///
    /// The following environment variables are used:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `GOOGLE_CLOUD_PROJECT` | The project that runs queries. See [`BigQueryBuilder::project_id()`]. |
    /// | `BIGQUERY_ENDPOINT` | The service URL. See [`BigQueryBuilder::endpoint()`]. |
    /// | `BIGQUERY_EMULATOR_HOST` | `host:port` of a local emulator. See [`BigQueryBuilder::emulator()`]. |
    /// | `BIGQUERY_LOCATION` | The location jobs run in. See [`BigQueryBuilder::location()`]. |
    /// | `BIGQUERY_ACCESS_TOKEN` | A bearer token to use instead of application default credentials. |
    ///
    pub fn from_environment(mut self) -> Result<Self, DataAccessError> {
        self.from_environment = true;
        if let Ok(val) = env::var("GOOGLE_CLOUD_PROJECT") {
            self = self.project_id(&val)?;
        }
        if let Ok(val) = env::var("BIGQUERY_ENDPOINT") {
            self = self.endpoint(&val)?;
        }
        if let Ok(val) = env::var("BIGQUERY_EMULATOR_HOST") {
            self = self.emulator(&val)?;
        }
        if let Ok(val) = env::var("BIGQUERY_LOCATION") {
            self = self.location(&val)?;
        }
        if let Ok(val) = env::var("BIGQUERY_ACCESS_TOKEN") {
            self = self.bearer_token(&val)?;
        }
        Ok(self)
    }
    /// Set the project that runs queries and owns the jobs.
    pub fn project_id(mut self, project_id: &str) -> Result<Self, DataAccessError> {
        if project_id.is_empty() {
            return ia_err!("project id must be non-empty");
        }
        self.project_id = Some(project_id.to_string());
        Ok(self)
    }
    /// Set a specific service URL to use.
    ///
    /// Only the scheme, host and port are significant; the REST path is added internally.
    /// Examples:
    /// ```text
    ///     https://bigquery.googleapis.com
    ///     http://localhost:9050
    /// ```
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, DataAccessError> {
        let u = Url::parse(endpoint)?;
        if u.scheme() != "http" && u.scheme() != "https" {
            return ia_err!("endpoint '{}' must be an http or https url", endpoint);
        }
        if u.host_str().is_none() {
            return ia_err!("endpoint '{}' has no host", endpoint);
        }
        self.endpoint = Some(endpoint.trim_end_matches('/').to_string());
        Ok(self)
    }
    /// Connect to a local BigQuery emulator at `host`, given as `host:port` or as a URL.
    ///
    /// Calling this method sets the mode to [`BigQueryMode::Emulator`], which sends no credentials.
    pub fn emulator(mut self, host: &str) -> Result<Self, DataAccessError> {
        if host.starts_with("http://") || host.starts_with("https://") {
            self = self.endpoint(host)?;
        } else {
            self = self.endpoint(&format!("http://{}", host))?;
        }
        self.mode = BigQueryMode::Emulator;
        self.auth = AuthProvider::None;
        Ok(self)
    }
    /// Authenticate every request with a fixed OAuth2 bearer token.
    pub fn bearer_token(mut self, token: &str) -> Result<Self, DataAccessError> {
        if token.is_empty() {
            return ia_err!("bearer token must be non-empty");
        }
        self.auth = AuthProvider::Token(token.to_string());
        Ok(self)
    }
    /// Authenticate with tokens from the given [`gcp_auth::TokenProvider`].
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Result<Self, DataAccessError> {
        self.auth = AuthProvider::Provider(provider);
        Ok(self)
    }
    /// Set the location (`US`, `EU`, `us-central1`, ...) jobs are created in.
    ///
    /// If not set, the service picks the location from the datasets the query references.
    pub fn location(mut self, location: &str) -> Result<Self, DataAccessError> {
        self.location = Some(location.to_string());
        Ok(self)
    }
    /// Specify a [`reqwest::Client`] to use for all http/s connections.
    ///
    /// By default, the [`BigQuery`] handle creates an internal [`reqwest::Client`]. If your
    /// application already has one, you can pass it here to share its connection pool.
    pub fn reqwest_client(mut self, client: &Client) -> Result<Self, DataAccessError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Specify the http timeout of each request sent to the service.
    ///
    /// There is no default; requests wait as long as the service takes.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self, DataAccessError> {
        if timeout.is_zero() {
            return ia_err!("timeout must be greater than zero");
        }
        self.timeout = Some(timeout);
        Ok(self)
    }

    // normalize endpoint to "{scheme}://{host}[:port]/bigquery/v2/"
    pub(crate) fn base_url(&self) -> Result<Url, DataAccessError> {
        let ep = self
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_BIGQUERY_ENDPOINT)
            .trim_end_matches('/');
        let ep = ep.strip_suffix("/bigquery/v2").unwrap_or(ep);
        Ok(Url::parse(&format!("{}/bigquery/v2/", ep))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let b = BigQueryBuilder::new();
        assert_eq!(
            b.base_url().unwrap().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/"
        );
        let b = BigQueryBuilder::new().endpoint("http://localhost:9050/").unwrap();
        assert_eq!(b.base_url().unwrap().as_str(), "http://localhost:9050/bigquery/v2/");
        let b = BigQueryBuilder::new()
            .endpoint("http://localhost:9050/bigquery/v2")
            .unwrap();
        assert_eq!(b.base_url().unwrap().as_str(), "http://localhost:9050/bigquery/v2/");
    }

    #[test]
    fn test_emulator_mode() {
        let b = BigQueryBuilder::new().emulator("localhost:9050").unwrap();
        assert_eq!(b.mode, BigQueryMode::Emulator);
        assert!(matches!(b.auth, AuthProvider::None));
        assert_eq!(b.endpoint.as_deref(), Some("http://localhost:9050"));
    }

    #[test]
    fn test_invalid_settings() {
        assert!(BigQueryBuilder::new().endpoint("ftp://x").is_err());
        assert!(BigQueryBuilder::new().endpoint("not a url").is_err());
        assert!(BigQueryBuilder::new().project_id("").is_err());
        assert!(BigQueryBuilder::new().bearer_token("").is_err());
        assert!(BigQueryBuilder::new().timeout(Duration::ZERO).is_err());
    }

    #[test]
    fn test_token_is_hidden() {
        let b = BigQueryBuilder::new().bearer_token("secret").unwrap();
        assert!(!format!("{:?}", b).contains("secret"));
    }
}
