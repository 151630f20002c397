use crate::assets::TrackedAsset;
use crate::averages::AnalysisResult;
use crate::series::PriceSample;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Report file stem inside the data directory.
pub const REPORT_NAME: &str = "price_averages_analysis";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimePeriod {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_days: usize,
}

impl TimePeriod {
    /// First date, last date and sample count of `series`. Both dates are
    /// `None` for an empty series.
    pub fn of(series: &[PriceSample]) -> Self {
        Self {
            start_date: series.first().map(|s| s.date),
            end_date: series.last().map(|s| s.date),
            total_days: series.len(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetailedMath {
    pub total_sum: f64,
    pub number_of_days: usize,
    pub calculation: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AssetAnalysis {
    pub detailed_math: DetailedMath,
    pub final_average_price: f64,
}

impl From<&AnalysisResult> for AssetAnalysis {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            detailed_math: DetailedMath {
                total_sum: result.sum,
                number_of_days: result.count,
                calculation: result.calculation.clone(),
            },
            final_average_price: result.average,
        }
    }
}

/// Contents of `price_averages_analysis.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CombinedReport {
    pub time_period: TimePeriod,
    pub bnb_analysis: AssetAnalysis,
    pub eth_analysis: AssetAnalysis,
    pub id_analysis: AssetAnalysis,
}

impl CombinedReport {
    /// The time period comes from `period_source` alone (the BNB series).
    pub fn build(
        period_source: &[PriceSample],
        bnb: &AnalysisResult,
        eth: &AnalysisResult,
        id: &AnalysisResult,
    ) -> Self {
        Self {
            time_period: TimePeriod::of(period_source),
            bnb_analysis: bnb.into(),
            eth_analysis: eth.into(),
            id_analysis: id.into(),
        }
    }

    /// `(symbol, analysis)` in report order.
    pub fn assets(&self) -> [(&'static str, &AssetAnalysis); 3] {
        [
            (TrackedAsset::Bnb.symbol(), &self.bnb_analysis),
            (TrackedAsset::Eth.symbol(), &self.eth_analysis),
            (TrackedAsset::Id.symbol(), &self.id_analysis),
        ]
    }
}
