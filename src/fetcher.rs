//! Daily price history from the CoinGecko `market_chart` endpoint.

use crate::config::FetcherConfig;
use crate::error::Result;
use crate::series::{PriceSample, PriceSeries};
use crate::storage_utils::AsyncStorageManager;
use crate::summary_table;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Contracts are looked up on this asset platform.
const PLATFORM: &str = "ethereum";
const API_KEY_HEADER: &str = "x-cg-api-key";

/// The part of the `market_chart` response we use: `[timestamp_ms, price]`.
#[derive(Deserialize, Debug)]
struct MarketChart {
    prices: Vec<(f64, f64)>,
}

pub struct PriceFetcher {
    client: Client,
    config: FetcherConfig,
}

/// Whole days between `start_date` and `today`. A start date in the future
/// is clamped to a zero-day window.
pub fn lookback_days(start_date: NaiveDate, today: NaiveDate) -> i64 {
    let days = (today - start_date).num_days();
    if days < 0 {
        warn!(%start_date, %today, "start date is in the future, requesting 0 days");
        return 0;
    }
    days
}

/// Turns `[timestamp_ms, price]` pairs into samples dated in `tz`. The time
/// of day is dropped and repeated dates are kept as they are.
pub fn to_samples<Tz: TimeZone>(raw: &[(f64, f64)], tz: &Tz) -> PriceSeries {
    raw.iter()
        .filter_map(|&(timestamp_ms, price)| {
            match DateTime::from_timestamp_millis(timestamp_ms as i64) {
                Some(instant) => Some(PriceSample {
                    date: instant.with_timezone(tz).date_naive(),
                    price_usd: price,
                }),
                None => {
                    warn!(timestamp_ms, "timestamp out of range, sample skipped");
                    None
                }
            }
        })
        .collect()
}

impl PriceFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: FetcherConfig) -> Self {
        Self { client, config }
    }

    pub fn market_chart_url(&self, contract_address: &str) -> String {
        format!(
            "{}/coins/{}/contract/{}/market_chart",
            self.config.api_base_url, PLATFORM, contract_address
        )
    }

    /// Fetches the daily history from `start_date` up to `today`, dated in
    /// `tz`. Any network, status or decoding failure is logged and comes back
    /// as `None`; there is no retry.
    pub async fn fetch_daily_prices<Tz: TimeZone>(
        &self,
        contract_address: &str,
        start_date: NaiveDate,
        today: NaiveDate,
        vs_currency: &str,
        tz: &Tz,
    ) -> Option<PriceSeries> {
        let days = lookback_days(start_date, today);

        match self.request_chart(contract_address, days, vs_currency).await {
            Ok(chart) => {
                let series = to_samples(&chart.prices, tz);
                info!(
                    contract = contract_address,
                    days,
                    samples = series.len(),
                    "fetched price history"
                );
                Some(series)
            }
            Err(e) => {
                warn!(contract = contract_address, error = %e, "Error fetching data");
                None
            }
        }
    }

    async fn request_chart(
        &self,
        contract_address: &str,
        days: i64,
        vs_currency: &str,
    ) -> Result<MarketChart> {
        let params = [
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
            ("interval", "daily".to_string()),
        ];

        let chart = self
            .client
            .get(self.market_chart_url(contract_address))
            .query(&params)
            .header(API_KEY_HEADER, &self.config.api_key)
            .header("accept", "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<MarketChart>()
            .await?;

        Ok(chart)
    }
}

/// One fetch job run for an artifact prefix.
pub struct FetchJob<'a> {
    pub prefix: &'a str,
    pub contract_address: &'a str,
    pub start_date: NaiveDate,
    pub vs_currency: &'a str,
}

/// Fetches one series and stores it as a new artifact stamped `now`.
/// Returns the artifact path, or `None` when the fetch failed or returned no
/// samples (in which case nothing is written).
pub async fn run<Tz: TimeZone>(
    storage: &AsyncStorageManager,
    fetcher: &PriceFetcher,
    job: &FetchJob<'_>,
    now: NaiveDateTime,
    tz: &Tz,
) -> Result<Option<PathBuf>> {
    println!(
        "Fetching daily {} prices from {} to today...",
        job.prefix, job.start_date
    );

    let Some(series) = fetcher
        .fetch_daily_prices(
            job.contract_address,
            job.start_date,
            now.date(),
            job.vs_currency,
            tz,
        )
        .await
    else {
        return Ok(None);
    };

    if series.is_empty() {
        warn!(prefix = job.prefix, "no samples returned, nothing saved");
        return Ok(None);
    }

    let path = storage.save_series(job.prefix, &series, now).await?;
    println!("Data saved to {}", path.display());
    summary_table::print_fetch_summary(&series);

    Ok(Some(path))
}
