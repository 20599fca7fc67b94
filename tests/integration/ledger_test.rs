// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::TestWorkspace;
use chrono::{Local, NaiveDateTime};
use mantrack::domain::models::ledger::LedgerSchema;
use mantrack::domain::models::record::{LedgerEntry, Record};
use mantrack::infrastructure::ledger::job_ledger::JobLedger;
use mantrack::infrastructure::ledger::ledger_reader;
use mantrack::presentation::cli::Command;
use mantrack::utils::errors::LedgerError;

fn entry(alias: &str, chapter: &str, updated_at: NaiveDateTime) -> LedgerEntry {
    LedgerEntry::new(
        "mangakakalot",
        alias,
        Some(Record {
            title: alias.to_uppercase(),
            ongoing: true,
            updated_at,
            latest_chapter: chapter.to_string(),
            latest_chapter_link: format!("https://x/{}", alias),
        }),
        Some(200),
    )
}

#[tokio::test]
async fn test_custom_schema_reads_back_by_name() {
    let ws = TestWorkspace::new();
    let schema = LedgerSchema::parse(
        &["updated_at", "latest_chapter", "alias", "website"],
        "\t",
    )
    .unwrap();
    let mut ledger = JobLedger::new(ws.result_dir(), schema, "bounty.json");
    let now = Local::now().naive_local();

    ledger.init(now).await.unwrap();
    ledger
        .record_scrape(&entry("solo", "Chapter\t110", now))
        .await
        .unwrap();
    ledger.close(now).await.unwrap();

    let job_dir = ledger.job_dir().unwrap();
    let rows = ledger_reader::read_entries(job_dir, "\t").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].alias, "solo");
    assert_eq!(rows[0].latest_chapter, "Chapter 110");
    assert_eq!(
        rows[0].updated_at.format("%d-%m-%Y %H:%M").to_string(),
        now.format("%d-%m-%Y %H:%M").to_string()
    );

    // with the wrong delimiter no column resolves by name
    assert!(matches!(
        ledger_reader::read_entries(job_dir, "|").await,
        Err(LedgerError::LedgerMalformed(_))
    ));
}

#[tokio::test]
async fn test_interrupted_job_stays_open() {
    let ws = TestWorkspace::new();
    let mut ledger = JobLedger::new(ws.result_dir(), LedgerSchema::default(), "bounty.json");
    let now = Local::now().naive_local();
    ledger.init(now).await.unwrap();
    ledger.record_scrape(&entry("solo", "Chapter 1", now)).await.unwrap();
    drop(ledger);

    let job_dir = ledger_reader::latest_job(&ws.result_dir()).await.unwrap();
    let meta = ledger_reader::read_meta(&job_dir).await.unwrap();
    assert!(!meta.is_sealed());
    // counters are only persisted when the job is closed
    assert_eq!(meta.attempted, 0);

    let result = ws.ok(Command::Result).await;
    assert!(result.contains("End Time:     unfinished"));
    assert!(result.contains("Updated today (1)"));
}

#[tokio::test]
async fn test_latest_job_is_most_recent_run() {
    let ws = TestWorkspace::new();
    let earlier = Local::now().naive_local() - chrono::Duration::hours(1);
    let later = Local::now().naive_local();

    let mut first = JobLedger::new(ws.result_dir(), LedgerSchema::default(), "bounty.json");
    let first_id = first.init(later).await.unwrap();
    first.close(later).await.unwrap();

    let mut second = JobLedger::new(ws.result_dir(), LedgerSchema::default(), "bounty.json");
    let second_id = second.init(earlier).await.unwrap();
    second.close(earlier).await.unwrap();

    assert!(first_id > second_id);
    let latest = ledger_reader::latest_job(&ws.result_dir()).await.unwrap();
    assert_eq!(latest.file_name().unwrap().to_str().unwrap(), first_id.as_str());
}
