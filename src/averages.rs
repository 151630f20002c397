use crate::series::PriceSample;

/// Sum, count and mean of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub prices: Vec<f64>,
    pub sum: f64,
    pub count: usize,
    pub average: f64,
    pub calculation: String,
}

/// Averages every sample in order, duplicates included. An empty series has
/// an average of 0.
pub fn calculate_average(series: &[PriceSample]) -> AnalysisResult {
    let prices: Vec<f64> = series.iter().map(|s| s.price_usd).collect();

    // Summing from +0.0: an empty `Iterator::sum` yields -0.0.
    let sum = prices.iter().fold(0.0, |acc, p| acc + p);
    let count = prices.len();
    let average = if count > 0 { sum / count as f64 } else { 0.0 };

    let calculation = format!(
        "Sum of all prices (${:.2}) ÷ Number of days ({}) = ${:.2}",
        sum, count, average
    );

    AnalysisResult {
        prices,
        sum,
        count,
        average,
        calculation,
    }
}
