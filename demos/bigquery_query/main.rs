//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing how to run a query and read its results,
// first as strings and then as typed values.

// To run this example against BigQuery, with application default credentials:
//    GOOGLE_CLOUD_PROJECT=my-project cargo run --example bigquery_query
//
// or against a local emulator:
//    GOOGLE_CLOUD_PROJECT=test BIGQUERY_EMULATOR_HOST=localhost:9050 cargo run --example bigquery_query
//
// for extra output:
//    RUST_LOG=debug cargo run --example bigquery_query

use cloud_data_access::types::FieldValue;
use cloud_data_access::{BigQuery, JobStatistics, QueryOption, QueryRequest};
use std::error::Error;
use tracing::info;

const SQL: &str = "SELECT word, word_count, corpus_date \
    FROM `bigquery-public-data.samples.shakespeare` \
    WHERE corpus = 'hamlet' ORDER BY word_count DESC LIMIT 10";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Set up a tracing subscriber to see output based on RUST_LOG environment setting
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    info!("Creating new BigQuery handle...");
    let bq = BigQuery::builder().from_environment()?.build().await?;

    // Estimate the cost first
    let mut stats = JobStatistics::default();
    bq.query(
        SQL,
        vec![QueryOption::dry_run(), QueryOption::job_statistics(&mut stats)],
    )
    .await?;
    println!("Query will process {:?} bytes", stats.total_bytes_processed);

    // Every cell as a string
    let result = bq.query(SQL, vec![]).await?;
    println!("{}", result.columns().join("\t"));
    for row in result.rows() {
        println!("{}", row.join("\t"));
    }

    // The same rows as typed values
    let mut iter = QueryRequest::new(SQL).read(&bq).await?;
    let mut total = 0;
    while let Some(row) = iter.next().await? {
        if let Some(FieldValue::Integer(count)) = row.get(1) {
            total += count;
        }
    }
    println!("Total count of the top words: {}", total);
    Ok(())
}
