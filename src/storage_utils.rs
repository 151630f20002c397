use crate::artifacts::{
    self, ArtifactEntry, ModifiedTimeSource, SelectionPolicy, artifact_file_name,
};
use crate::error::{PipelineError, Result};
use crate::series::PriceSeries;
use chrono::NaiveDateTime;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

// STORAGE MANAGER

/// Owns the shared data directory both jobs read and write.
pub struct AsyncStorageManager {
    // e.g. "./data"
    pub base_dir: PathBuf,
}

impl AsyncStorageManager {
    /// Points the manager at `base_dir` and creates it if it is missing.
    /// Safe to call repeatedly.
    pub async fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).await?;
        Ok(Self { base_dir })
    }

    /// Opens the directory without creating it. Reads against a missing
    /// directory simply find nothing.
    pub fn existing<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// **Generic Save Function**
    /// Serializes `data` as 4-space indented JSON into `<filename>.json`.
    /// Goes through a `.tmp` file and a rename so readers never see a half
    /// written file.
    pub async fn save<T: Serialize>(&self, filename: &str, data: &T) -> Result<PathBuf> {
        let file_name = format!("{}.json", filename);
        let final_path = self.base_dir.join(&file_name);
        let tmp_path = self.base_dir.join(format!("{}.tmp", file_name));

        let json_bytes = to_indented_json(data)?;

        fs::create_dir_all(&self.base_dir).await?;
        fs::write(&tmp_path, json_bytes).await?;
        fs::rename(&tmp_path, &final_path).await?;

        debug!(path = %final_path.display(), "saved");
        Ok(final_path)
    }

    /// **Generic Load Function**
    pub async fn load<T: DeserializeOwned>(&self, filename: &str) -> Result<T> {
        let path = self.base_dir.join(format!("{}.json", filename));
        self.load_path(&path).await
    }

    /// Reads and parses one file. Content that does not parse as `T` is a
    /// [`PipelineError::MalformedArtifact`].
    pub async fn load_path<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read(path).await?;
        serde_json::from_slice(&content).map_err(|source| PipelineError::MalformedArtifact {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes a fresh artifact for `prefix` stamped with `fetched_at`.
    pub async fn save_series(
        &self,
        prefix: &str,
        series: &PriceSeries,
        fetched_at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let file_name = artifact_file_name(prefix, fetched_at);
        let stem = file_name.trim_end_matches(".json");
        self.save(stem, series).await
    }

    /// Every `<prefix>*.json` file in the directory with its modification
    /// time. A missing directory yields an empty list.
    pub async fn list_artifacts(
        &self,
        prefix: &str,
        times: &dyn ModifiedTimeSource,
    ) -> Result<Vec<ArtifactEntry>> {
        let mut dir = match fs::read_dir(&self.base_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let Some(file_name) = item.file_name().to_str().map(String::from) else {
                continue;
            };
            if !artifacts::matches_prefix(&file_name, prefix) {
                continue;
            }

            // Follows symlinks; dangling links are skipped.
            let path = item.path();
            match fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
            let modified = times.modified(&path).await?;
            entries.push(ArtifactEntry {
                embedded: artifacts::embedded_timestamp(&file_name),
                path,
                file_name,
                modified,
            });
        }

        entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(entries)
    }

    /// Parsed content of the latest `<prefix>*.json` artifact, or `None` when
    /// no file matches.
    pub async fn load_latest<T: DeserializeOwned>(
        &self,
        prefix: &str,
        policy: SelectionPolicy,
        times: &dyn ModifiedTimeSource,
    ) -> Result<Option<T>> {
        let entries = self.list_artifacts(prefix, times).await?;
        let Some(latest) = artifacts::select_latest(&entries, policy) else {
            debug!(prefix, candidates = entries.len(), "no artifact selected");
            return Ok(None);
        };

        debug!(prefix, path = %latest.path.display(), "selected latest artifact");
        self.load_path(&latest.path).await.map(Some)
    }
}

fn to_indented_json<T: Serialize>(data: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    data.serialize(&mut ser)?;
    Ok(buf)
}
