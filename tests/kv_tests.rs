//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use cloud_data_access::{
    CreateTableRequestBuilder, DataAccessError, DataAccessErrorCode, KvHandle, KvHandleBuilder,
};

use serde_json::{json, Value};
use std::error::Error;
use wiremock::matchers::{body_partial_json, header, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .try_init();
}

fn get_builder(server: &MockServer) -> Result<KvHandleBuilder, DataAccessError> {
    KvHandle::builder()
        .endpoint(&server.uri())?
        .region("us-east-1")?
        .static_credentials("AKIDTEST", "test-secret")
}

async fn setup() -> Result<(MockServer, KvHandle), DataAccessError> {
    init_tracing();
    let server = MockServer::start().await;
    let kv = get_builder(&server)?.default_table("settings")?.build().await?;
    Ok((server, kv))
}

fn dynamo_response(status: u16, body: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/x-amz-json-1.0")
}

fn target(op: &str) -> wiremock::matchers::HeaderExactMatcher {
    header("x-amz-target", format!("DynamoDB_20120810.{}", op).as_str())
}

#[tokio::test]
async fn create_table_uses_string_hash_key() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("CreateTable"))
        .and(body_partial_json(json!({
            "TableName": "users",
            "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
            "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
            "ProvisionedThroughput": {"ReadCapacityUnits": 5, "WriteCapacityUnits": 5}
        })))
        .respond_with(dynamo_response(
            200,
            json!({"TableDescription": {"TableName": "users", "TableStatus": "CREATING"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    kv.create_table("users", "id").await?;
    Ok(())
}

#[tokio::test]
async fn create_table_with_explicit_throughput() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("CreateTable"))
        .and(body_partial_json(json!({
            "TableName": "settings",
            "KeySchema": [{"AttributeName": "key", "KeyType": "HASH"}],
            "ProvisionedThroughput": {"ReadCapacityUnits": 10, "WriteCapacityUnits": 5}
        })))
        .respond_with(dynamo_response(
            200,
            json!({"TableDescription": {"TableName": "settings", "TableStatus": "CREATING"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreateTableRequestBuilder::default()
        .table_name("settings")
        .key_name("key")
        .read_capacity_units(10)
        .build()?;
    kv.create_table_with(&req).await?;

    let err = CreateTableRequestBuilder::default()
        .table_name("settings")
        .key_name("key")
        .write_capacity_units(0)
        .build()
        .map_err(DataAccessError::from)
        .unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::IllegalArgument);
    Ok(())
}

#[tokio::test]
async fn create_existing_table_fails() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("CreateTable"))
        .respond_with(dynamo_response(
            400,
            json!({
                "__type": "com.amazonaws.dynamodb.v20120810#ResourceInUseException",
                "message": "Table already exists: settings"
            }),
        ))
        .mount(&server)
        .await;

    let err = kv.create_default_table().await.unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::ResourceExists);
    assert!(err.message.contains("Table already exists: settings"));
    Ok(())
}

#[tokio::test]
async fn table_names_in_service_order() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("ListTables"))
        .respond_with(dynamo_response(200, json!({"TableNames": ["zeta", "alpha", "settings"]})))
        .mount(&server)
        .await;

    assert_eq!(kv.table_names().await?, vec!["zeta", "alpha", "settings"]);
    Ok(())
}

#[tokio::test]
async fn get_and_set_values() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("PutItem"))
        .and(body_partial_json(json!({
            "TableName": "settings",
            "Item": {"key": {"S": "color"}, "value": {"S": "blue"}}
        })))
        .respond_with(dynamo_response(200, json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(target("GetItem"))
        .and(body_partial_json(json!({"TableName": "settings", "Key": {"key": {"S": "color"}}})))
        .respond_with(dynamo_response(
            200,
            json!({"Item": {"key": {"S": "color"}, "value": {"S": "blue"}}}),
        ))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(target("GetItem"))
        .respond_with(dynamo_response(200, json!({})))
        .mount(&server)
        .await;

    kv.set("color", "blue").await?;
    assert_eq!(kv.get("color").await?.as_deref(), Some("blue"));
    assert_eq!(kv.get("size").await?, None);
    Ok(())
}

#[tokio::test]
async fn custom_attribute_names() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let server = MockServer::start().await;
    let kv = get_builder(&server)?
        .default_table("profiles")?
        .key_name("user")?
        .value_name("profile")?
        .build()
        .await?;
    Mock::given(method("POST"))
        .and(target("GetItem"))
        .and(body_partial_json(json!({"TableName": "profiles", "Key": {"user": {"S": "u1"}}})))
        .respond_with(dynamo_response(
            200,
            json!({"Item": {"user": {"S": "u1"}, "other": {"S": "x"}}}),
        ))
        .mount(&server)
        .await;

    // item exists but has no value attribute
    assert_eq!(kv.get("u1").await?, None);
    Ok(())
}

#[tokio::test]
async fn non_string_value_is_error() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("GetItem"))
        .respond_with(dynamo_response(
            200,
            json!({"Item": {"key": {"S": "n"}, "value": {"N": "5"}}}),
        ))
        .mount(&server)
        .await;

    let err = kv.get("n").await.unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::BadResponse);
    Ok(())
}

#[tokio::test]
async fn missing_table_error_is_propagated() -> Result<(), Box<dyn Error>> {
    let (server, kv) = setup().await?;
    Mock::given(method("POST"))
        .and(target("PutItem"))
        .respond_with(dynamo_response(
            400,
            json!({
                "__type": "com.amazonaws.dynamodb.v20120810#ResourceNotFoundException",
                "message": "Requested resource not found"
            }),
        ))
        .mount(&server)
        .await;

    let err = kv.set("k", "v").await.unwrap_err();
    assert_eq!(err.code, DataAccessErrorCode::ResourceNotFound);
    assert!(err.message.contains("Requested resource not found"));
    Ok(())
}

#[tokio::test]
async fn unconfigured_handle_uses_default_table() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let server = MockServer::start().await;
    let kv = get_builder(&server)?.build().await?;
    assert_eq!(kv.default_table(), "default_table");
    Mock::given(method("POST"))
        .and(target("PutItem"))
        .and(body_partial_json(json!({
            "TableName": "default_table",
            "Item": {"key": {"S": "k"}, "value": {"S": "v"}}
        })))
        .respond_with(dynamo_response(200, json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(target("CreateTable"))
        .and(body_partial_json(json!({
            "TableName": "default_table",
            "KeySchema": [{"AttributeName": "key", "KeyType": "HASH"}]
        })))
        .respond_with(dynamo_response(
            200,
            json!({"TableDescription": {"TableName": "default_table", "TableStatus": "CREATING"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    kv.create_default_table().await?;
    kv.set("k", "v").await?;
    Ok(())
}

#[test]
fn invalid_builder_settings() {
    assert!(KvHandle::builder().endpoint("localhost:8000").is_err());
    assert!(KvHandle::builder().region("").is_err());
    assert!(KvHandle::builder().static_credentials("", "x").is_err());
    assert!(KvHandle::builder().key_name("").is_err());
    assert!(KvHandle::builder().value_name("").is_err());
    assert!(KvHandle::builder().default_table("").is_err());
}
