use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, warn};

use super::{StoreError, write_json_atomic};
use crate::constants::files::MANIFEST_FILE;
use crate::domain::SeasonKey;
use crate::models::ManifestEntry;

/// Sort ordinal for entries whose season could not be read; sorts ahead of
/// every real season of the same year.
const FOREIGN_ORDINAL: u8 = 99;

/// One element of the manifest file as stored on disk.
///
/// Entries written by other tools may not fit [`ManifestEntry`] (for example
/// `"season": "Fall"`). They are carried through unchanged rather than
/// discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    Known(ManifestEntry),
    Foreign(serde_json::Value),
}

impl StoredEntry {
    fn sort_key(&self) -> (i64, u8) {
        match self {
            Self::Known(e) => (i64::from(e.year), e.season.ordinal()),
            Self::Foreign(value) => (
                value
                    .get("year")
                    .and_then(serde_json::Value::as_i64)
                    .unwrap_or(i64::MIN),
                FOREIGN_ORDINAL,
            ),
        }
    }

    fn key(&self) -> Option<SeasonKey> {
        match self {
            Self::Known(e) => Some(e.key()),
            Self::Foreign(_) => None,
        }
    }

    #[must_use]
    pub const fn as_known(&self) -> Option<&ManifestEntry> {
        match self {
            Self::Known(e) => Some(e),
            Self::Foreign(_) => None,
        }
    }
}

/// Replaces any entry for `entry`'s season with `entry` and re-sorts newest
/// first (year descending, then fall > summer > spring > winter). Foreign
/// entries are kept and sort ahead of known seasons of their year.
#[must_use]
pub fn upsert_entry(mut entries: Vec<StoredEntry>, entry: ManifestEntry) -> Vec<StoredEntry> {
    entries.retain(|e| e.key() != Some(entry.key()));
    entries.push(StoredEntry::Known(entry));
    entries.sort_by_key(|e| Reverse(e.sort_key()));
    entries
}

fn known_entries(entries: &[StoredEntry]) -> Vec<ManifestEntry> {
    entries.iter().filter_map(StoredEntry::as_known).copied().collect()
}

/// Repository for the manifest index file.
#[derive(Clone)]
pub struct ManifestRepository {
    path: PathBuf,
}

impl ManifestRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            path: root.into().join(MANIFEST_FILE),
        }
    }

    /// Reads every stored element. A missing or unreadable file is an empty
    /// manifest; an element that is not a valid entry is kept as foreign.
    async fn read_stored(&self) -> Vec<StoredEntry> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No manifest yet");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read manifest, starting empty");
                return Vec::new();
            }
        };

        let entries: Vec<StoredEntry> = serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Corrupt manifest, starting empty");
            Vec::new()
        });

        for entry in &entries {
            if let StoredEntry::Foreign(value) = entry {
                warn!(path = %self.path.display(), entry = %value, "Unrecognized manifest entry, keeping as-is");
            }
        }

        entries
    }

    /// Reads the manifest entries this crate understands.
    pub async fn read(&self) -> Vec<ManifestEntry> {
        known_entries(&self.read_stored().await)
    }

    /// Records `count` items for `key`, replacing any previous entry, and
    /// persists the re-sorted manifest.
    pub async fn upsert(&self, key: SeasonKey, count: usize) -> Result<Vec<ManifestEntry>, StoreError> {
        let entries = upsert_entry(self.read_stored().await, ManifestEntry::new(key, count));
        write_json_atomic(&self.path, &entries).await?;
        info!(event = "manifest_updated", season = %key, count, "Updated manifest");
        Ok(known_entries(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Season;

    fn entry(year: i32, season: Season, count: usize) -> ManifestEntry {
        ManifestEntry::new(SeasonKey::new(year, season), count)
    }

    fn upsert_all(entries: impl IntoIterator<Item = ManifestEntry>) -> Vec<ManifestEntry> {
        let stored = entries.into_iter().fold(Vec::new(), upsert_entry);
        known_entries(&stored)
    }

    #[test]
    fn upsert_replaces_existing_key() {
        let entries = upsert_all([
            entry(2024, Season::Fall, 40),
            entry(2024, Season::Summer, 30),
            entry(2024, Season::Fall, 15),
        ]);

        let fall: Vec<_> = entries
            .iter()
            .filter(|e| e.key() == SeasonKey::new(2024, Season::Fall))
            .collect();
        assert_eq!(fall.len(), 1);
        assert_eq!(fall[0].count, 15);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn upsert_sorts_newest_first() {
        let entries = upsert_all([
            entry(2023, Season::Spring, 1),
            entry(2024, Season::Winter, 2),
            entry(2023, Season::Fall, 3),
            entry(2024, Season::Summer, 4),
        ]);

        let keys: Vec<(i32, Season)> = entries.iter().map(|e| (e.year, e.season)).collect();
        assert_eq!(
            keys,
            vec![
                (2024, Season::Summer),
                (2024, Season::Winter),
                (2023, Season::Fall),
                (2023, Season::Spring),
            ]
        );
    }

    #[test]
    fn repeated_upsert_converges() {
        let once = upsert_entry(Vec::new(), entry(2022, Season::Winter, 9));
        let twice = upsert_entry(once.clone(), entry(2022, Season::Winter, 9));
        assert_eq!(once, twice);
    }

    #[test]
    fn foreign_entries_sort_ahead_within_their_year() {
        let foreign = StoredEntry::Foreign(serde_json::json!({"year": 2023, "season": "Fall"}));
        let stored = upsert_entry(
            vec![StoredEntry::Known(entry(2023, Season::Fall, 3)), foreign.clone()],
            entry(2024, Season::Winter, 1),
        );

        assert_eq!(
            stored,
            vec![
                StoredEntry::Known(entry(2024, Season::Winter, 1)),
                foreign,
                StoredEntry::Known(entry(2023, Season::Fall, 3)),
            ]
        );
    }

    #[tokio::test]
    async fn corrupt_manifest_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_FILE), b"{not json").unwrap();

        let repo = ManifestRepository::new(dir.path());
        assert!(repo.read().await.is_empty());

        let entries = repo.upsert(SeasonKey::new(2024, Season::Fall), 15).await.unwrap();
        assert_eq!(entries, vec![entry(2024, Season::Fall, 15)]);
    }

    #[tokio::test]
    async fn unrecognized_entry_does_not_erase_the_others() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_FILE);
        std::fs::write(
            &path,
            r#"[
                {"year": 2024, "season": "summer", "count": 30},
                {"year": 2024, "season": "spring", "count": 20},
                {"year": 2023, "season": "Fall", "count": 12}
            ]"#,
        )
        .unwrap();

        let repo = ManifestRepository::new(dir.path());
        assert_eq!(repo.read().await.len(), 2);

        let entries = repo.upsert(SeasonKey::new(2024, Season::Fall), 15).await.unwrap();
        assert_eq!(
            entries,
            vec![
                entry(2024, Season::Fall, 15),
                entry(2024, Season::Summer, 30),
                entry(2024, Season::Spring, 20),
            ]
        );

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                {"year": 2024, "season": "fall", "count": 15},
                {"year": 2024, "season": "summer", "count": 30},
                {"year": 2024, "season": "spring", "count": 20},
                {"year": 2023, "season": "Fall", "count": 12}
            ])
        );
    }

    #[tokio::test]
    async fn upsert_persists_manifest_shape() {
        let dir = tempfile::tempdir().unwrap();
        let repo = ManifestRepository::new(dir.path());

        repo.upsert(SeasonKey::new(2024, Season::Spring), 20).await.unwrap();
        repo.upsert(SeasonKey::new(2024, Season::Fall), 40).await.unwrap();
        repo.upsert(SeasonKey::new(2024, Season::Fall), 15).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(
            raw,
            serde_json::json!([
                {"year": 2024, "season": "fall", "count": 15},
                {"year": 2024, "season": "spring", "count": 20}
            ])
        );
    }
}
