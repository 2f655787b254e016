//! File-backed persistence for season datasets and the manifest.
//!
//! Layout under the output root:
//!
//! ```text
//! <root>/manifest.json
//! <root>/<year>/<season>.json
//! ```
//!
//! Every write goes to a temporary sibling file that is then renamed over the
//! target, so readers only ever see a complete file.

pub mod dataset;
pub mod manifest;

pub use dataset::SeasonRepository;
pub use manifest::{ManifestRepository, StoredEntry, upsert_entry};

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::domain::SeasonKey;
use crate::models::{AnimeRecord, ManifestEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Serializes `value` as pretty JSON and atomically replaces `path` with it.
pub(crate) async fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| StoreError::io(parent, e))?;
    }

    let body = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Encode {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, body)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))?;

    Ok(())
}

/// Facade over the output directory.
#[derive(Clone)]
pub struct Store {
    root: PathBuf,
    seasons: SeasonRepository,
    manifest: ManifestRepository,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            seasons: SeasonRepository::new(root.clone()),
            manifest: ManifestRepository::new(root.clone()),
            root,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn save_season(
        &self,
        key: SeasonKey,
        records: &[AnimeRecord],
    ) -> Result<PathBuf, StoreError> {
        self.seasons.save(key, records).await
    }

    pub async fn load_season(&self, key: SeasonKey) -> Result<Option<Vec<AnimeRecord>>, StoreError> {
        self.seasons.load(key).await
    }

    pub async fn upsert_manifest(
        &self,
        key: SeasonKey,
        count: usize,
    ) -> Result<Vec<ManifestEntry>, StoreError> {
        self.manifest.upsert(key, count).await
    }

    pub async fn read_manifest(&self) -> Vec<ManifestEntry> {
        self.manifest.read().await
    }
}
