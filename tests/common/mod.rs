//! Shared fixtures for the integration tests: artifact files in a temp data
//! directory, fixed modification times, and a one-shot HTTP responder.

#![allow(dead_code)]

use chrono::NaiveDate;
use price_averages::series::{PriceSample, PriceSeries};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Consecutive daily samples starting 2024-03-01.
pub fn daily_series(prices: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    prices
        .iter()
        .enumerate()
        .map(|(i, &price_usd)| PriceSample {
            date: start + chrono::Days::new(i as u64),
            price_usd,
        })
        .collect()
}

/// Writes `series` to `dir/file_name` as a JSON array.
pub fn write_artifact(dir: &Path, file_name: &str, series: &PriceSeries) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, serde_json::to_vec_pretty(series).unwrap()).unwrap();
    path
}

pub fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

/// Accepts a single connection, answers with `status` and `body`, and hands
/// back the raw request head.
pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let reason = if status == 200 { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {status} {reason}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request).into_owned()
    });

    (format!("http://{addr}/api/v3"), handle)
}
