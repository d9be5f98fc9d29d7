//
// Copyright (c) 2024, 2025 Oracle and/or its affiliates. All rights reserved.
//
// Licensed under the Universal Permissive License v 1.0 as shown at
//  https://oss.oracle.com/licenses/upl/
//
use crate::job::{JobStatistics, TableReference};
use crate::query_option::{CreateDisposition, QueryConfig, QueryOption, WriteDisposition};
use serde_json::json;
use std::error::Error;
use std::result::Result;

#[tokio::test]
async fn test_defaults() -> Result<(), Box<dyn Error>> {
    let config = QueryConfig::from_options(vec![]).await?;
    assert!(!config.legacy_sql());
    assert!(!config.dry_run());
    assert_eq!(config.create_disposition(), CreateDisposition::CreateIfNeeded);
    assert_eq!(config.write_disposition(), WriteDisposition::WriteTruncate);
    assert!(config.destination().is_none());
    assert!(!config.has_statistics_sink());
    Ok(())
}

#[tokio::test]
async fn test_options_applied_in_order() -> Result<(), Box<dyn Error>> {
    let mut stats = JobStatistics::default();
    let config = QueryConfig::from_options(vec![
        QueryOption::write_empty(),
        QueryOption::legacy_sql(),
        QueryOption::create_never(),
        QueryOption::write_append(),
        QueryOption::dry_run(),
        QueryOption::job_statistics(&mut stats),
    ])
    .await?;
    assert!(config.legacy_sql());
    assert!(config.dry_run());
    assert_eq!(config.create_disposition(), CreateDisposition::CreateNever);
    // last write wins
    assert_eq!(config.write_disposition(), WriteDisposition::WriteAppend);
    assert!(config.has_statistics_sink());
    Ok(())
}

#[tokio::test]
async fn test_independent_options_commute() -> Result<(), Box<dyn Error>> {
    let a = QueryConfig::from_options(vec![QueryOption::legacy_sql(), QueryOption::write_empty()]).await?;
    let b = QueryConfig::from_options(vec![QueryOption::write_empty(), QueryOption::legacy_sql()]).await?;
    assert_eq!(a.legacy_sql(), b.legacy_sql());
    assert_eq!(a.write_disposition(), b.write_disposition());
    Ok(())
}

#[tokio::test]
async fn test_dispositions_need_destination() -> Result<(), Box<dyn Error>> {
    let config = QueryConfig::from_options(vec![QueryOption::create_never(), QueryOption::write_empty()]).await?;
    let (jc, sink) = config.into_job_configuration("SELECT 1");
    assert!(sink.is_none());
    let body = serde_json::to_value(&jc)?;
    assert_eq!(
        body,
        json!({"query": {"query": "SELECT 1", "useLegacySql": false}})
    );
    Ok(())
}

#[tokio::test]
async fn test_job_configuration_with_destination() -> Result<(), Box<dyn Error>> {
    let mut stats = JobStatistics::default();
    let mut config = QueryConfig::from_options(vec![
        QueryOption::write_append(),
        QueryOption::dry_run(),
        QueryOption::job_statistics(&mut stats),
    ])
    .await?;
    config.destination = Some(TableReference {
        project_id: "other".to_string(),
        dataset_id: "ds".to_string(),
        table_id: "t".to_string(),
    });
    let (jc, sink) = config.into_job_configuration("SELECT name FROM people");
    let body = serde_json::to_value(&jc)?;
    assert_eq!(
        body,
        json!({
            "query": {
                "query": "SELECT name FROM people",
                "useLegacySql": false,
                "destinationTable": {"projectId": "other", "datasetId": "ds", "tableId": "t"},
                "createDisposition": "CREATE_IF_NEEDED",
                "writeDisposition": "WRITE_APPEND"
            },
            "dryRun": true
        })
    );
    let sink = sink.ok_or("missing statistics sink")?;
    sink.total_bytes_processed = Some(60);
    assert_eq!(stats.total_bytes_processed, Some(60));
    Ok(())
}
