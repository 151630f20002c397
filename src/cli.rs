//! CLI argument parsing for the price pipeline.

use crate::artifacts::SelectionPolicy;
use crate::assets::TrackedAsset;
use crate::config::{DEFAULT_DATA_DIR, DEFAULT_VS_CURRENCY, default_start_date};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Fetch daily token prices and average them.
///
/// `fetch` writes one timestamped JSON artifact per run into the data
/// directory; `aggregate` reads the latest artifact per asset and writes
/// `price_averages_analysis.json`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory shared by the fetch and aggregate jobs
    #[arg(
        long = "data-dir",
        env = "PRICE_DATA_DIR",
        default_value = DEFAULT_DATA_DIR,
        global = true,
        value_hint = ValueHint::DirPath
    )]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch the daily price history of one asset
    Fetch {
        /// bnb, eth or id
        #[arg(value_parser = parse_asset)]
        asset: TrackedAsset,

        #[command(flatten)]
        window: FetchWindow,

        /// Use this contract address instead of the asset's default
        #[arg(long = "contract")]
        contract: Option<String>,
    },
    /// Fetch every tracked asset, one after the other
    FetchAll {
        #[command(flatten)]
        window: FetchWindow,
    },
    /// Average the latest artifact of each asset into one report
    Aggregate {
        #[arg(
            long = "select-by",
            value_parser = parse_selection_policy,
            default_value = "modified-time"
        )]
        select_by: SelectionPolicy,
    },
    /// Show the artifacts present for each asset and which one is latest
    List {
        #[arg(
            long = "select-by",
            value_parser = parse_selection_policy,
            default_value = "modified-time"
        )]
        select_by: SelectionPolicy,
    },
}

#[derive(Args, Debug, Clone)]
pub struct FetchWindow {
    /// First day of the history (YYYY-MM-DD)
    #[arg(long = "start-date", default_value_t = default_start_date())]
    pub start_date: NaiveDate,

    /// Quote currency
    #[arg(long = "vs-currency", default_value = DEFAULT_VS_CURRENCY)]
    pub vs_currency: String,
}

fn parse_asset(s: &str) -> Result<TrackedAsset, String> {
    TrackedAsset::parse(s)
        .ok_or_else(|| format!("invalid asset '{}'; expected one of: bnb, eth, id", s))
}

/// Parse selection policy from string.
fn parse_selection_policy(s: &str) -> Result<SelectionPolicy, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "modified-time" | "mtime" => Ok(SelectionPolicy::ModifiedTime),
        "embedded-timestamp" | "name" => Ok(SelectionPolicy::EmbeddedTimestamp),
        other => Err(format!(
            "invalid selection policy '{}'; expected one of: modified-time, embedded-timestamp",
            other
        )),
    }
}
