//! Freshness-stamped on-disk cache for the raw dataset.
//!
//! The publisher refreshes the dataset once a day, so the cache is a pair
//! of files: the raw CSV body and a stamp file holding the date it was
//! fetched for. A run whose stamp matches today's date never touches the
//! network.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DATA_FILE: &str = "data.csv";
const STAMP_FILE: &str = "datefile";

pub struct DatasetCache {
    dir: PathBuf,
}

impl DatasetCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn data_path(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    fn stamp_path(&self) -> PathBuf {
        self.dir.join(STAMP_FILE)
    }

    /// The stamp of the cached body, if any.
    pub fn stamp(&self) -> Option<String> {
        fs::read_to_string(self.stamp_path())
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Whether the cache holds a body stamped with `date`.
    pub fn is_fresh(&self, date: &str) -> bool {
        self.stamp().as_deref() == Some(date) && self.data_path().exists()
    }

    /// Reads the cached body.
    pub fn load(&self) -> Result<Vec<u8>> {
        let path = self.data_path();
        fs::read(&path).with_context(|| format!("reading cached dataset {}", path.display()))
    }

    /// Writes the body and its stamp, creating the cache directory as
    /// needed. The stamp is written last so a torn write reads as stale.
    pub fn store(&self, date: &str, body: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating cache dir {}", self.dir.display()))?;
        fs::write(self.data_path(), body)?;
        fs::write(self.stamp_path(), date)?;
        debug!(dir = %self.dir.display(), stamp = date, bytes = body.len(), "dataset cached");
        Ok(())
    }
}

impl AsRef<Path> for DatasetCache {
    fn as_ref(&self) -> &Path {
        &self.dir
    }
}
