use crate::error::{PipelineError, Result};
use chrono::NaiveDate;

pub const API_KEY_VAR: &str = "COINGECKO_API_KEY";
pub const API_URL_VAR: &str = "COINGECKO_API_URL";

/// Directory shared by the fetch and aggregate jobs.
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_VS_CURRENCY: &str = "usd";

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default()
}

/// Settings the fetcher needs to reach the market-data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetcherConfig {
    pub api_key: String,
    pub api_base_url: String, // e.g. "https://pro-api.coingecko.com/api/v3"
}

impl FetcherConfig {
    pub fn new(api_key: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key: api_key.into(),
            api_base_url,
        }
    }

    /// Reads the API settings from the process environment, after pulling in
    /// a `.env` file from the working directory if one exists.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`FetcherConfig::from_env`] but with an explicit variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(PipelineError::ConfigMissing(name))
        };

        Ok(Self::new(required(API_KEY_VAR)?, required(API_URL_VAR)?))
    }
}
