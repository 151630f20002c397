use chrono::Local;
use clap::Parser;
use price_averages::aggregator;
use price_averages::artifacts::{self, FsModifiedTime};
use price_averages::assets::TrackedAsset;
use price_averages::cli::{Cli, Command, FetchWindow};
use price_averages::config::FetcherConfig;
use price_averages::fetcher::{self, FetchJob, PriceFetcher};
use price_averages::logging::init_logging;
use price_averages::storage_utils::AsyncStorageManager;
use price_averages::summary_table;
use std::path::Path;

async fn fetch_assets(
    data_dir: &Path,
    assets: &[(TrackedAsset, Option<String>)],
    window: &FetchWindow,
) -> anyhow::Result<()> {
    let config = FetcherConfig::from_env()?;
    let fetcher = PriceFetcher::new(config);
    let storage = AsyncStorageManager::new(data_dir).await?;

    for (asset, contract) in assets {
        let job = FetchJob {
            prefix: asset.prefix(),
            contract_address: contract.as_deref().unwrap_or(asset.contract_address()),
            start_date: window.start_date,
            vs_currency: &window.vs_currency,
        };
        fetcher::run(&storage, &fetcher, &job, Local::now().naive_local(), &Local).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Fetch { asset, window, contract } => {
            fetch_assets(&cli.data_dir, &[(asset, contract)], &window).await?;
        }
        Command::FetchAll { window } => {
            let assets: Vec<_> = TrackedAsset::ALL.iter().map(|&a| (a, None)).collect();
            fetch_assets(&cli.data_dir, &assets, &window).await?;
        }
        Command::Aggregate { select_by } => {
            let storage = AsyncStorageManager::existing(&cli.data_dir);
            aggregator::run(&storage, select_by, &FsModifiedTime).await?;
        }
        Command::List { select_by } => {
            let storage = AsyncStorageManager::existing(&cli.data_dir);
            for asset in TrackedAsset::ALL {
                let entries = storage.list_artifacts(asset.prefix(), &FsModifiedTime).await?;
                println!("\n{} ({} artifacts)", asset.prefix(), entries.len());
                if entries.is_empty() {
                    continue;
                }
                let latest = artifacts::select_latest(&entries, select_by);
                println!("{}", summary_table::artifact_table(&entries, latest));
            }
        }
    }

    Ok(())
}
