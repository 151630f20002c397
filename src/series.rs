use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's price for one asset. `date` serializes as `YYYY-MM-DD`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub price_usd: f64,
}

/// A whole fetch run for one asset, in the order the API returned it.
/// Dates may repeat near the current day.
pub type PriceSeries = Vec<PriceSample>;
