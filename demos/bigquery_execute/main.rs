//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//

// This is an example program showing how to copy query results into a
// destination table with the different write dispositions.

// To run this example:
//    GOOGLE_CLOUD_PROJECT=my-project DEMO_DATASET=my_dataset cargo run --example bigquery_execute

use cloud_data_access::{BigQuery, DataAccessErrorCode, JobStatistics, QueryOption};
use std::error::Error;
use tracing::info;

const SQL: &str = "SELECT word, word_count \
    FROM `bigquery-public-data.samples.shakespeare` WHERE corpus = 'hamlet'";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_ansi(false)
        .compact()
        .init();

    let dataset = std::env::var("DEMO_DATASET").unwrap_or_else(|_| "demo".to_string());
    let bq = BigQuery::builder().from_environment()?.build().await?;

    // Replace the table contents (creating the table if needed)
    let mut stats = JobStatistics::default();
    bq.execute(
        SQL,
        vec![
            QueryOption::destination_table(&bq, &dataset, "hamlet_words"),
            QueryOption::write_truncate(),
            QueryOption::job_statistics(&mut stats),
        ],
    )
    .await?;
    info!("copied hamlet words, {:?} bytes processed", stats.total_bytes_processed);

    // Append the same rows again
    bq.execute(
        SQL,
        vec![
            QueryOption::destination_table(&bq, &dataset, "hamlet_words"),
            QueryOption::create_never(),
            QueryOption::write_append(),
        ],
    )
    .await?;

    // A write-empty copy into the now non-empty table must fail
    let res = bq
        .execute(
            SQL,
            vec![
                QueryOption::destination_table(&bq, &dataset, "hamlet_words"),
                QueryOption::write_empty(),
            ],
        )
        .await;
    match res {
        Err(e) if e.code == DataAccessErrorCode::ResourceExists => {
            println!("write-empty was rejected as expected: {}", e.message);
        }
        Err(e) => return Err(e.into()),
        Ok(()) => return Err("write-empty into a non-empty table should have failed".into()),
    }

    let result = bq
        .query(
            &format!("SELECT COUNT(*) AS n FROM `{}.hamlet_words`", dataset),
            vec![],
        )
        .await?;
    println!("hamlet_words now has {} rows", result.rows()[0][0]);
    Ok(())
}
