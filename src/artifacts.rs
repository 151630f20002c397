//! Artifact naming and "latest artifact" selection.
//!
//! Every fetch run writes `<prefix>_<YYYYMMDD_HHMMSS>.json`. The aggregate job
//! picks, per prefix, the artifact with the greatest filesystem modification
//! time. The stamp embedded in the name is only used when the caller asks for
//! [`SelectionPolicy::EmbeddedTimestamp`] explicitly; the two can disagree once
//! files are copied or touched.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

static ARTIFACT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>.+)_(?P<stamp>\d{8}_\d{6})\.json$").expect("valid artifact regex")
});

/// Builds the file name for a series fetched at `fetched_at`.
pub fn artifact_file_name(prefix: &str, fetched_at: NaiveDateTime) -> String {
    format!("{}_{}.json", prefix, fetched_at.format(STAMP_FORMAT))
}

/// Same rule as the shell glob `<prefix>*.json`.
pub fn matches_prefix(file_name: &str, prefix: &str) -> bool {
    file_name.starts_with(prefix) && file_name.ends_with(".json")
}

/// Extracts the fetch timestamp encoded in an artifact name, if it has one.
pub fn embedded_timestamp(file_name: &str) -> Option<NaiveDateTime> {
    let caps = ARTIFACT_NAME.captures(file_name)?;
    NaiveDateTime::parse_from_str(caps.name("stamp")?.as_str(), STAMP_FORMAT).ok()
}

/// Where modification times come from. Production reads file metadata; tests
/// plug in a fixed table so ordering does not depend on the real clock.
#[async_trait]
pub trait ModifiedTimeSource: Send + Sync {
    async fn modified(&self, path: &Path) -> io::Result<SystemTime>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsModifiedTime;

#[async_trait]
impl ModifiedTimeSource for FsModifiedTime {
    async fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        tokio::fs::metadata(path).await?.modified()
    }
}

/// Modification times keyed by file name.
#[derive(Debug, Default, Clone)]
pub struct FixedModifiedTimes {
    times: HashMap<String, SystemTime>,
}

impl FixedModifiedTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, modified: SystemTime) -> Self {
        self.times.insert(file_name.to_string(), modified);
        self
    }
}

#[async_trait]
impl ModifiedTimeSource for FixedModifiedTimes {
    async fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| self.times.get(n))
            .copied()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no modification time recorded for {}", path.display()),
                )
            })
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Greatest filesystem modification time.
    #[default]
    ModifiedTime,
    /// Greatest `YYYYMMDD_HHMMSS` stamp in the file name. Names without a
    /// stamp are skipped.
    EmbeddedTimestamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: SystemTime,
    pub embedded: Option<NaiveDateTime>,
}

/// Picks one artifact under `policy`. Equal keys resolve to whichever entry
/// the max-selection lands on.
pub fn select_latest(entries: &[ArtifactEntry], policy: SelectionPolicy) -> Option<&ArtifactEntry> {
    match policy {
        SelectionPolicy::ModifiedTime => entries.iter().max_by_key(|e| e.modified),
        SelectionPolicy::EmbeddedTimestamp => entries
            .iter()
            .filter_map(|e| e.embedded.map(|stamp| (stamp, e)))
            .max_by_key(|(stamp, _)| *stamp)
            .map(|(_, e)| e),
    }
}
