//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing how to submit a query without waiting
// for it, then follow the job until it finishes.

// To run this example:
//    GOOGLE_CLOUD_PROJECT=my-project cargo run --example bigquery_execute_async

use cloud_data_access::BigQuery;
use std::error::Error;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    let bq = BigQuery::builder().from_environment()?.build().await?;
    let job_id = bq
        .execute_async(
            "SELECT corpus, SUM(word_count) AS words \
             FROM `bigquery-public-data.samples.shakespeare` GROUP BY corpus",
            vec![],
        )
        .await?;
    println!("submitted job {}", job_id);

    // Poll every second, for up to a minute
    for _ in 0..60 {
        let status = bq.job_status(&job_id).await?;
        println!("job {} is {:?}", job_id, status.state());
        if status.done() {
            if let Some(e) = status.error() {
                return Err(e.clone().into());
            }
            println!("statistics: {:?}", status.statistics());
            return Ok(());
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Err(format!("job {} did not finish within a minute", job_id).into())
}
