//! Daily token price pipeline: fetch price histories into dated JSON
//! artifacts, then average the latest artifact of each asset.

pub mod aggregator;
pub mod artifacts;
pub mod assets;
pub mod averages;
pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod report;
pub mod series;
pub mod storage_utils;
pub mod summary_table;

pub use error::{PipelineError, Result};
