//! Fetcher against a local one-shot HTTP responder.

mod common;

use chrono::{NaiveDate, Utc};
use common::{daily_series, serve_once, write_artifact};
use price_averages::config::FetcherConfig;
use price_averages::fetcher::{self, FetchJob, PriceFetcher};
use price_averages::series::PriceSeries;
use price_averages::storage_utils::AsyncStorageManager;

const CONTRACT: &str = "0x2dff88a56767223a5529ea5960da7a3f5f766406";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    day(2024, 11, 5)
}

fn fetcher_for(base_url: &str) -> PriceFetcher {
    PriceFetcher::new(FetcherConfig::new("test-key", base_url))
}

#[tokio::test]
async fn start_today_requests_zero_days_and_keeps_one_sample() {
    // 2024-11-05T14:30:00Z
    let (base, server) = serve_once(200, r#"{"prices": [[1730817000000, 0.3141]]}"#).await;

    let series = fetcher_for(&base)
        .fetch_daily_prices(CONTRACT, today(), today(), "usd", &Utc)
        .await
        .unwrap();

    assert_eq!(series.len(), 1);
    assert_eq!(series[0].date, today());
    assert_eq!(series[0].price_usd, 0.3141);

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with(&format!(
        "GET /api/v3/coins/ethereum/contract/{CONTRACT}/market_chart?"
    )));
    assert!(request_line.contains("vs_currency=usd"));
    assert!(request_line.contains("days=0"));
    assert!(request_line.contains("interval=daily"));
    assert!(request.to_ascii_lowercase().contains("x-cg-api-key: test-key"));
}

#[tokio::test]
async fn lookback_window_is_sent_in_days() {
    let (base, server) = serve_once(200, r#"{"prices": []}"#).await;
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let series = fetcher_for(&base)
        .fetch_daily_prices(CONTRACT, start, today(), "eur", &Utc)
        .await
        .unwrap();

    assert!(series.is_empty());
    let request = server.await.unwrap();
    assert!(request.contains("days=249"));
    assert!(request.contains("vs_currency=eur"));
}

#[tokio::test]
async fn same_day_samples_are_not_deduplicated() {
    // two samples on 2024-11-05 (UTC), one on 2024-11-04
    let body = r#"{"prices": [[1730678400000, 1.0], [1730764800000, 2.0], [1730817000000, 2.5]]}"#;
    let (base, _server) = serve_once(200, body).await;

    let series = fetcher_for(&base)
        .fetch_daily_prices(CONTRACT, day(2024, 11, 3), today(), "usd", &Utc)
        .await
        .unwrap();

    let dates: Vec<String> = series.iter().map(|s| s.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-11-04", "2024-11-05", "2024-11-05"]);
}

#[tokio::test]
async fn error_status_is_absent() {
    let (base, _server) = serve_once(401, r#"{"error": "invalid api key"}"#).await;

    let series = fetcher_for(&base)
        .fetch_daily_prices(CONTRACT, today(), today(), "usd", &Utc)
        .await;
    assert!(series.is_none());
}

#[tokio::test]
async fn unexpected_body_is_absent() {
    let (base, _server) = serve_once(200, r#"{"status": "ok"}"#).await;

    let series = fetcher_for(&base)
        .fetch_daily_prices(CONTRACT, today(), today(), "usd", &Utc)
        .await;
    assert!(series.is_none());
}

#[tokio::test]
async fn unreachable_host_is_absent() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let series = fetcher_for(&format!("http://{addr}"))
        .fetch_daily_prices(CONTRACT, today(), today(), "usd", &Utc)
        .await;
    assert!(series.is_none());
}

// ---------------------------------------------------------------------------
// run: fetch + store
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_writes_timestamped_artifact() {
    let (base, _server) = serve_once(200, r#"{"prices": [[1730817000000, 0.5]]}"#).await;
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    let storage = AsyncStorageManager::new(&data_dir).await.unwrap();
    let job = FetchJob {
        prefix: "id_daily_prices",
        contract_address: CONTRACT,
        start_date: today(),
        vs_currency: "usd",
    };
    let now = today().and_hms_opt(16, 4, 9).unwrap();

    let path = fetcher::run(&storage, &fetcher_for(&base), &job, now, &Utc)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(path, data_dir.join("id_daily_prices_20241105_160409.json"));
    let stored: PriceSeries = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].price_usd, 0.5);
}

#[tokio::test]
async fn run_writes_nothing_on_failure() {
    let (base, _server) = serve_once(500, "oops").await;
    let tmp = tempfile::tempdir().unwrap();
    let storage = AsyncStorageManager::new(tmp.path()).await.unwrap();
    let job = FetchJob {
        prefix: "bnb_daily_prices",
        contract_address: CONTRACT,
        start_date: today(),
        vs_currency: "usd",
    };

    let now = today().and_hms_opt(0, 0, 0).unwrap();
    let written = fetcher::run(&storage, &fetcher_for(&base), &job, now, &Utc)
        .await
        .unwrap();

    assert!(written.is_none());
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn run_writes_nothing_for_empty_series() {
    let (base, _server) = serve_once(200, r#"{"prices": []}"#).await;
    let tmp = tempfile::tempdir().unwrap();
    let previous = "bnb_daily_prices_20240101_000000.json";
    write_artifact(tmp.path(), previous, &daily_series(&[1.0, 2.0, 3.0]));
    let storage = AsyncStorageManager::new(tmp.path()).await.unwrap();
    let job = FetchJob {
        prefix: "bnb_daily_prices",
        contract_address: CONTRACT,
        start_date: today(),
        vs_currency: "usd",
    };

    let now = today().and_hms_opt(1, 2, 3).unwrap();
    let written = fetcher::run(&storage, &fetcher_for(&base), &job, now, &Utc)
        .await
        .unwrap();

    assert!(written.is_none());
    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![previous.to_string()]);
}
