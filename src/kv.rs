//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::error::{bad_response, ia_err, DataAccessError};
use crate::kv_builder::{CreateTableRequest, KvHandleBuilder};

use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::{Builder as ConfigBuilder, Region};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};
use aws_sdk_dynamodb::Client;
use std::result::Result;
use std::sync::Arc;
use tracing::{debug, trace};

/// **The key-value handle**.
///
/// Stores string values under string keys in DynamoDB tables. Items are written with two
/// attributes, the key and the value, whose names are fixed when the handle is built
/// (`key` and `value` by default). Unless configured otherwise, `get` and `set` use the
/// table named `default_table`.
///
/// Cloning this struct is cheap and returns a handle sharing the same underlying client.
///
/// ```no_run
/// # use cloud_data_access::KvHandle;
/// # #[tokio::main]
/// # pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let kv = KvHandle::builder()
///     .region("us-east-1")?
///     .default_table("settings")?
///     .build()
///     .await?;
/// kv.set("color", "blue").await?;
/// assert_eq!(kv.get("color").await?.as_deref(), Some("blue"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct KvHandle {
    pub(crate) inner: Arc<KvHandleRef>,
}

#[derive(Debug)]
pub(crate) struct KvHandleRef {
    client: Client,
    default_table: String,
    key_name: String,
    value_name: String,
}

impl KvHandle {
    /// Create a new [`KvHandleBuilder`].
    pub fn builder() -> KvHandleBuilder {
        KvHandleBuilder::new()
    }

    pub(crate) async fn from_builder(b: KvHandleBuilder) -> Result<KvHandle, DataAccessError> {
        let client = match b.client {
            Some(c) => c,
            None => {
                let mut cb = match (&b.sdk_config, &b.region, &b.credentials) {
                    (Some(cfg), _, _) => ConfigBuilder::from(cfg),
                    // Fully specified: skip the default provider chain, which may probe
                    // instance metadata.
                    (None, Some(_), Some(_)) => {
                        ConfigBuilder::new().behavior_version(BehaviorVersion::latest())
                    }
                    (None, _, _) => {
                        ConfigBuilder::from(&aws_config::load_defaults(BehaviorVersion::latest()).await)
                    }
                };
                if let Some(r) = &b.region {
                    cb = cb.region(Region::new(r.clone()));
                }
                if let Some(c) = &b.credentials {
                    cb = cb.credentials_provider(c.clone());
                }
                if let Some(ep) = &b.endpoint {
                    cb = cb.endpoint_url(ep);
                }
                Client::from_conf(cb.build())
            }
        };
        debug!(
            "Creating new KvHandle: region={:?}, endpoint={:?}, table={}, key={}, value={}",
            b.region, b.endpoint, b.default_table, b.key_name, b.value_name
        );
        Ok(KvHandle {
            inner: Arc::new(KvHandleRef {
                client,
                default_table: b.default_table,
                key_name: b.key_name,
                value_name: b.value_name,
            }),
        })
    }

    /// The underlying DynamoDB client, for operations this handle does not cover.
    pub fn client(&self) -> &Client {
        &self.inner.client
    }

    /// The table used by [`get()`](KvHandle::get), [`set()`](KvHandle::set) and
    /// [`create_default_table()`](KvHandle::create_default_table).
    pub fn default_table(&self) -> &str {
        &self.inner.default_table
    }

    /// Create the default table, keyed by the configured key attribute.
    pub async fn create_default_table(&self) -> Result<(), DataAccessError> {
        self.create_table(&self.inner.default_table, &self.inner.key_name)
            .await
    }

    /// Create a table with a single string hash key and 5 read / 5 write capacity units.
    ///
    /// Returns once the service has accepted the request; the table may still be in the
    /// `CREATING` state.
    pub async fn create_table(&self, table_name: &str, key_name: &str) -> Result<(), DataAccessError> {
        self.create_table_with(&CreateTableRequest::new(table_name, key_name))
            .await
    }

    /// Create a table as described by `req`.
    pub async fn create_table_with(&self, req: &CreateTableRequest) -> Result<(), DataAccessError> {
        if req.table_name.is_empty() || req.key_name.is_empty() {
            return ia_err!("table name and key name must be non-empty");
        }
        let ad = AttributeDefinition::builder()
            .attribute_name(&req.key_name)
            .attribute_type(ScalarAttributeType::S)
            .build()?;
        let ks = KeySchemaElement::builder()
            .attribute_name(&req.key_name)
            .key_type(KeyType::Hash)
            .build()?;
        let pt = ProvisionedThroughput::builder()
            .read_capacity_units(req.read_capacity_units)
            .write_capacity_units(req.write_capacity_units)
            .build()?;
        debug!("creating table {} keyed by {}", req.table_name, req.key_name);
        self.inner
            .client
            .create_table()
            .table_name(&req.table_name)
            .attribute_definitions(ad)
            .key_schema(ks)
            .provisioned_throughput(pt)
            .send()
            .await?;
        Ok(())
    }

    /// List table names in the order the service returns them.
    ///
    /// Only the first page of names is returned (up to 100 tables).
    pub async fn table_names(&self) -> Result<Vec<String>, DataAccessError> {
        let out = self.inner.client.list_tables().send().await?;
        Ok(out.table_names().to_vec())
    }

    /// Get the value stored under `key` in the default table.
    ///
    /// Returns `None` if there is no item for `key`, or the item has no value attribute.
    pub async fn get(&self, key: &str) -> Result<Option<String>, DataAccessError> {
        let table = &self.inner.default_table;
        trace!("get {}[{}]", table, key);
        let out = self
            .inner
            .client
            .get_item()
            .table_name(table)
            .key(&self.inner.key_name, AttributeValue::S(key.to_string()))
            .send()
            .await?;
        let Some(item) = out.item() else {
            return Ok(None);
        };
        match item.get(&self.inner.value_name) {
            None => Ok(None),
            Some(AttributeValue::S(s)) => Ok(Some(s.clone())),
            Some(other) => Err(bad_response!(
                "attribute '{}' of item '{}' is not a string: {:?}",
                self.inner.value_name,
                key,
                other
            )),
        }
    }

    /// Store `value` under `key` in the default table, replacing any previous value.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), DataAccessError> {
        let table = &self.inner.default_table;
        trace!("set {}[{}]", table, key);
        self.inner
            .client
            .put_item()
            .table_name(table)
            .item(&self.inner.key_name, AttributeValue::S(key.to_string()))
            .item(&self.inner.value_name, AttributeValue::S(value.to_string()))
            .send()
            .await?;
        Ok(())
    }
}
