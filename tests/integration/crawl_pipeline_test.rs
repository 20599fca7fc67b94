// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{story_page, TestWorkspace};
use chrono::{Duration, Local, NaiveDate};
use mantrack::domain::models::ledger::Column;
use mantrack::infrastructure::ledger::ledger_reader;
use mantrack::presentation::cli::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn site_date(days_ago: i64) -> (NaiveDate, String) {
    let date = Local::now().date_naive() - Duration::days(days_ago);
    let raw = date
        .and_hms_opt(12, 30, 0)
        .unwrap()
        .format("%b %d,%Y - %I:%M %p")
        .to_string();
    (date, raw)
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn prepare(ws: &TestWorkspace, server: &MockServer) {
    ws.ok(Command::InitBounty).await;
    for website in ["mangakakalot", "manganelo"] {
        ws.ok(Command::AddGroup {
            website: website.to_string(),
        })
        .await;
    }
    let targets = [
        ("mangakakalot", "solo", "/solo"),
        ("mangakakalot", "tower", "/tower"),
        ("mangakakalot", "gone", "/gone"),
        ("manganelo", "hero", "/hero"),
    ];
    for (website, alias, route) in targets {
        ws.ok(Command::AddTarget {
            website: website.to_string(),
            alias: alias.to_string(),
            url: format!("{}{}", server.uri(), route),
        })
        .await;
    }

    let (_, today) = site_date(0);
    let (_, older) = site_date(40);
    let (_, recent) = site_date(3);
    mount_page(
        server,
        "/solo",
        200,
        story_page("Solo | Leveling", "Ongoing", &today, "Chapter 110", "https://x/110"),
    )
    .await;
    mount_page(
        server,
        "/tower",
        200,
        story_page("Tower of God", "Completed", &older, "Chapter 550", "https://x/550"),
    )
    .await;
    mount_page(server, "/gone", 404, "<html>Not Found</html>".to_string()).await;
    mount_page(
        server,
        "/hero",
        200,
        story_page("Omniscient Reader", "ongoing", &recent, "Chapter 200", "https://x/200"),
    )
    .await;
}

#[tokio::test]
async fn test_crawl_writes_ledger_and_report() {
    let ws = TestWorkspace::new();
    let server = MockServer::start().await;
    prepare(&ws, &server).await;

    let summary = ws.ok(Command::Crawl { silent: false }).await;
    assert!(summary.contains("Scraped:      3/4 (75.0%)"));
    assert!(summary.contains("gone"));

    let job_dir = ledger_reader::latest_job(&ws.result_dir()).await.unwrap();
    let meta = ledger_reader::read_meta(&job_dir).await.unwrap();
    assert!(meta.is_sealed());
    assert_eq!((meta.attempted, meta.succeeded), (4, 3));

    let table = ledger_reader::read_output(&job_dir, "|").await.unwrap();
    assert_eq!(table.rows.len(), 3);
    let title = table.position(Column::Title).unwrap();
    let ongoing = table.position(Column::Ongoing).unwrap();
    assert_eq!(table.rows[0][title], "Solo   Leveling");
    assert_eq!(table.rows[0][ongoing], "1");
    assert_eq!(table.rows[1][ongoing], "0");

    let log = ws.ok(Command::ShowLog).await;
    let scrape_lines: Vec<&str> = log.lines().filter(|l| l.contains("[Scraping]")).collect();
    assert_eq!(scrape_lines.len(), 4);
    assert!(scrape_lines[2].ends_with("[Scraping] gone - Response: 404"));
    assert!(log.lines().last().unwrap().contains("[Job] End Time: "));

    let output = ws.ok(Command::ShowOutput).await;
    assert!(output.starts_with("website"));
    assert!(output.contains("Chapter 550"));

    let result = ws.ok(Command::Result).await;
    let today = result.find("Updated today (1)").unwrap();
    let last7 = result.find("Updated in the last 7 days (1)").unwrap();
    let last30 = result.find("Updated in the last 30 days (0)").unwrap();
    let older = result.find("Updated more than 30 days ago (1)").unwrap();
    assert!(today < last7 && last7 < last30 && last30 < older);
    let solo = result.find("solo").unwrap();
    let hero = result.find("hero").unwrap();
    let tower = result.find("tower").unwrap();
    assert!(today < solo && solo < last7);
    assert!(last7 < hero && hero < last30);
    assert!(older < tower);
}

#[tokio::test]
async fn test_transport_failure_is_recorded_without_status() {
    let ws = TestWorkspace::new();
    ws.ok(Command::InitBounty).await;
    ws.ok(Command::AddGroup {
        website: "mangakakalot".to_string(),
    })
    .await;
    ws.ok(Command::AddTarget {
        website: "mangakakalot".to_string(),
        alias: "offline".to_string(),
        url: "http://127.0.0.1:9/offline".to_string(),
    })
    .await;

    let summary = ws.ok(Command::Crawl { silent: true }).await;
    assert!(summary.contains("Scraped:      0/1 (0.0%)"));
    // silent mode prints no failure table
    assert!(!summary.contains("Failure"));

    let log = ws.ok(Command::ShowLog).await;
    assert!(log.contains("[Scraping] offline - Response: none"));
    let output = ws.ok(Command::ShowOutput).await;
    assert_eq!(output.lines().count(), 2);
}

#[tokio::test]
async fn test_reading_without_jobs_fails() {
    let ws = TestWorkspace::new();
    for command in [Command::ShowLog, Command::ShowOutput, Command::Result] {
        let err = ws.run(command).await.unwrap_err();
        assert!(err.to_string().contains("No jobs found"));
    }
}

#[tokio::test]
async fn test_crawl_without_list_creates_no_job() {
    let ws = TestWorkspace::new();
    let err = ws.run(Command::Crawl { silent: false }).await.unwrap_err();
    assert!(err.to_string().contains("init-bounty"));
    assert!(!ws.result_dir().exists());
}
