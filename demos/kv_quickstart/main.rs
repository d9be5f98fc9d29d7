//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing basic use of the key-value handle: create
// a table, store a few values and read them back.

// To run this example against a local DynamoDB:
//    DATA_ACCESS_KV_ENDPOINT=http://localhost:8000 cargo run --example kv_quickstart
//
// for extra output:
//    RUST_LOG=debug cargo run --example kv_quickstart

use cloud_data_access::{DataAccessError, DataAccessErrorCode, KvHandle};
use std::error::Error;
use std::time::Duration;
use tracing::info;

// This method shows various ways to configure a KvHandle.
async fn get_handle() -> Result<KvHandle, DataAccessError> {
    // Note: later methods called on this builder will override earlier methods.
    KvHandle::builder()
        // For a local DynamoDB, region and credentials can be anything:
        .region("us-east-1")?
        .static_credentials("local", "local")?
        // For AWS, leave out the two lines above to use the standard AWS configuration.
        .default_table("kv_quickstart")?
        // Optional: attribute names other than "key" and "value"
        // .key_name("name")?
        // .value_name("data")?
        //
        // To read all of the above from environment variables:
        .from_environment()?
        .build()
        .await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    info!("Creating new KvHandle...");
    let kv = get_handle().await?;

    match kv.create_default_table().await {
        Ok(()) => {
            // give the table a moment to become active
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
        Err(e) if e.code == DataAccessErrorCode::ResourceExists => {
            info!("table already exists");
        }
        Err(e) => return Err(e.into()),
    }
    println!("tables: {:?}", kv.table_names().await?);

    kv.set("color", "blue").await?;
    kv.set("size", "large").await?;
    kv.set("color", "green").await?;

    println!("color={:?}", kv.get("color").await?);
    println!("size={:?}", kv.get("size").await?);
    println!("shape={:?}", kv.get("shape").await?);
    Ok(())
}
