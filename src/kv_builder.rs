//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
//! Builder for creating a [`KvHandle`](crate::KvHandle)
//!

use std::env;
use std::result::Result;

use crate::error::{ia_err, ia_error, DataAccessError};
use crate::kv::KvHandle;
use aws_config::SdkConfig;
use aws_sdk_dynamodb::config::Credentials;
use aws_sdk_dynamodb::Client;
use derive_builder::Builder;

pub(crate) const DEFAULT_TABLE_NAME: &str = "default_table";
pub(crate) const DEFAULT_KEY_NAME: &str = "key";
pub(crate) const DEFAULT_VALUE_NAME: &str = "value";

/// Builder used to set all the parameters to create a [`KvHandle`].
///
/// With no settings at all, the handle uses the standard AWS configuration chain
/// (environment, shared config files, instance metadata) for region and credentials.
#[derive(Debug, Clone)]
pub struct KvHandleBuilder {
    pub(crate) endpoint: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) credentials: Option<Credentials>,
    pub(crate) sdk_config: Option<SdkConfig>,
    pub(crate) client: Option<Client>,
    pub(crate) default_table: String,
    pub(crate) key_name: String,
    pub(crate) value_name: String,
}

impl Default for KvHandleBuilder {
    fn default() -> Self {
        KvHandleBuilder {
            endpoint: None,
            region: None,
            credentials: None,
            sdk_config: None,
            client: None,
            default_table: DEFAULT_TABLE_NAME.to_string(),
            key_name: DEFAULT_KEY_NAME.to_string(),
            value_name: DEFAULT_VALUE_NAME.to_string(),
        }
    }
}

impl KvHandleBuilder {
    /// Create a new KvHandleBuilder struct.
    pub fn new() -> Self {
        KvHandleBuilder::default()
    }
    /// Build a new [`KvHandle`].
    pub async fn build(self) -> Result<KvHandle, DataAccessError> {
        KvHandle::from_builder(self).await
    }
    /// Gather configuration settings from the current environment.
    ///
    /// The standard AWS variables (`AWS_REGION`, `AWS_ACCESS_KEY_ID`, ...) are always honored
    /// when the handle is built. In addition, the following are read here:
    ///
    /// | variable | description |
    /// | -------- | ----------- |
    /// | `DATA_ACCESS_KV_ENDPOINT` | Service URL, for example a local DynamoDB. See [`KvHandleBuilder::endpoint()`]. |
    /// | `DATA_ACCESS_KV_REGION` | AWS region. See [`KvHandleBuilder::region()`]. |
    /// | `DATA_ACCESS_KV_TABLE` | Default table. See [`KvHandleBuilder::default_table()`]. |
    /// | `DATA_ACCESS_KV_KEY` | Key attribute name. See [`KvHandleBuilder::key_name()`]. |
    /// | `DATA_ACCESS_KV_VALUE` | Value attribute name. See [`KvHandleBuilder::value_name()`]. |
    ///
    pub fn from_environment(mut self) -> Result<Self, DataAccessError> {
        if let Ok(val) = env::var("DATA_ACCESS_KV_ENDPOINT") {
            self = self.endpoint(&val)?;
        }
        if let Ok(val) = env::var("DATA_ACCESS_KV_REGION") {
            self = self.region(&val)?;
        }
        if let Ok(val) = env::var("DATA_ACCESS_KV_TABLE") {
            self = self.default_table(&val)?;
        }
        if let Ok(val) = env::var("DATA_ACCESS_KV_KEY") {
            self = self.key_name(&val)?;
        }
        if let Ok(val) = env::var("DATA_ACCESS_KV_VALUE") {
            self = self.value_name(&val)?;
        }
        Ok(self)
    }
    /// Send requests to a specific URL instead of the regional AWS endpoint.
    ///
    /// Typically used with a local DynamoDB, such as `http://localhost:8000`.
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, DataAccessError> {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return ia_err!("endpoint '{}' must start with http:// or https://", endpoint);
        }
        self.endpoint = Some(endpoint.to_string());
        Ok(self)
    }
    /// Set the AWS region, such as `us-east-1`.
    pub fn region(mut self, region: &str) -> Result<Self, DataAccessError> {
        if region.is_empty() {
            return ia_err!("region must be non-empty");
        }
        self.region = Some(region.to_string());
        Ok(self)
    }
    /// Use a fixed access key and secret key.
    ///
    /// When both the region and static credentials are given, the handle is configured
    /// without consulting the AWS configuration chain.
    pub fn static_credentials(mut self, access_key_id: &str, secret_access_key: &str) -> Result<Self, DataAccessError> {
        if access_key_id.is_empty() || secret_access_key.is_empty() {
            return ia_err!("access key id and secret access key must be non-empty");
        }
        self.credentials = Some(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "cloud-data-access",
        ));
        Ok(self)
    }
    /// Start from an already loaded [`SdkConfig`]. Region, credentials and endpoint given
    /// to this builder override its values.
    pub fn sdk_config(mut self, config: &SdkConfig) -> Result<Self, DataAccessError> {
        self.sdk_config = Some(config.clone());
        Ok(self)
    }
    /// Use an existing DynamoDB [`Client`] as is. All connection settings of this builder
    /// are then ignored.
    pub fn client(mut self, client: &Client) -> Result<Self, DataAccessError> {
        self.client = Some(client.clone());
        Ok(self)
    }
    /// Set the table used by [`KvHandle::get()`], [`KvHandle::set()`] and
    /// [`KvHandle::create_default_table()`]. Defaults to `default_table`.
    pub fn default_table(mut self, table_name: &str) -> Result<Self, DataAccessError> {
        if table_name.is_empty() {
            return ia_err!("default table name must be non-empty");
        }
        self.default_table = table_name.to_string();
        Ok(self)
    }
    /// Set the name of the key attribute. Defaults to `key`.
    pub fn key_name(mut self, name: &str) -> Result<Self, DataAccessError> {
        if name.is_empty() {
            return ia_err!("key attribute name must be non-empty");
        }
        self.key_name = name.to_string();
        Ok(self)
    }
    /// Set the name of the value attribute. Defaults to `value`.
    pub fn value_name(mut self, name: &str) -> Result<Self, DataAccessError> {
        if name.is_empty() {
            return ia_err!("value attribute name must be non-empty");
        }
        self.value_name = name.to_string();
        Ok(self)
    }
}

/// Parameters for creating a table keyed by a single string attribute.
///
/// ```
/// use cloud_data_access::CreateTableRequestBuilder;
/// let req = CreateTableRequestBuilder::default()
///     .table_name("users")
///     .key_name("id")
///     .read_capacity_units(10)
///     .build()
///     .unwrap();
/// assert_eq!(req.write_capacity_units, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct CreateTableRequest {
    pub table_name: String,
    /// Name of the string hash key attribute.
    pub key_name: String,
    #[builder(default = "5")]
    pub read_capacity_units: i64,
    #[builder(default = "5")]
    pub write_capacity_units: i64,
}

impl CreateTableRequest {
    /// A request with the default throughput of 5 read and 5 write units.
    pub fn new(table_name: &str, key_name: &str) -> CreateTableRequest {
        CreateTableRequest {
            table_name: table_name.to_string(),
            key_name: key_name.to_string(),
            read_capacity_units: 5,
            write_capacity_units: 5,
        }
    }
}

impl CreateTableRequestBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(t) = &self.table_name {
            if t.is_empty() {
                return Err("table name must be non-empty".to_string());
            }
        }
        if let Some(k) = &self.key_name {
            if k.is_empty() {
                return Err("key name must be non-empty".to_string());
            }
        }
        for units in [self.read_capacity_units, self.write_capacity_units].into_iter().flatten() {
            if units < 1 {
                return Err("capacity units must be at least 1".to_string());
            }
        }
        Ok(())
    }
}

impl From<CreateTableRequestBuilderError> for DataAccessError {
    fn from(e: CreateTableRequestBuilderError) -> Self {
        ia_error!("invalid create table request: {}", e)
    }
}
