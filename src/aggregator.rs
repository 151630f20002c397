//! The aggregate job: latest artifact per tracked asset in, one combined
//! report out.

use crate::artifacts::{ModifiedTimeSource, SelectionPolicy};
use crate::assets::TrackedAsset;
use crate::averages::calculate_average;
use crate::error::Result;
use crate::report::{CombinedReport, REPORT_NAME};
use crate::series::PriceSeries;
use crate::storage_utils::AsyncStorageManager;
use crate::summary_table;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug)]
pub enum AggregateOutcome {
    Written { report: CombinedReport, path: PathBuf },
    /// Prefixes with no artifact. Nothing was written.
    MissingInputs(Vec<&'static str>),
}

/// Runs the aggregate job:
/// 1. Loads the latest artifact for each tracked prefix.
/// 2. Stops without writing if any of them is missing.
/// 3. Averages each series and saves the combined report, replacing any
///    previous one.
pub async fn run(
    storage: &AsyncStorageManager,
    policy: SelectionPolicy,
    times: &dyn ModifiedTimeSource,
) -> Result<AggregateOutcome> {
    let mut loaded: Vec<PriceSeries> = Vec::with_capacity(TrackedAsset::ALL.len());
    let mut missing = Vec::new();

    for asset in TrackedAsset::ALL {
        match storage.load_latest::<PriceSeries>(asset.prefix(), policy, times).await? {
            Some(series) => loaded.push(series),
            None => missing.push(asset.prefix()),
        }
    }

    let [bnb, eth, id] = match <[PriceSeries; 3]>::try_from(loaded) {
        Ok(all) if missing.is_empty() => all,
        _ => {
            warn!(?missing, "required artifacts not found");
            println!("Error: Could not find all required JSON files in data directory");
            return Ok(AggregateOutcome::MissingInputs(missing));
        }
    };

    let report = CombinedReport::build(
        &bnb,
        &calculate_average(&bnb),
        &calculate_average(&eth),
        &calculate_average(&id),
    );

    let path = storage.save(REPORT_NAME, &report).await?;
    info!(path = %path.display(), days = report.time_period.total_days, "report written");
    summary_table::print_report_summary(&report, &path);

    Ok(AggregateOutcome::Written { report, path })
}
