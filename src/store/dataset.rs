use std::path::PathBuf;
use tokio::fs;
use tracing::info;

use super::{StoreError, write_json_atomic};
use crate::domain::SeasonKey;
use crate::models::AnimeRecord;

/// Repository for per-season dataset files.
#[derive(Clone)]
pub struct SeasonRepository {
    root: PathBuf,
}

impl SeasonRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn path_for(&self, key: SeasonKey) -> PathBuf {
        self.root
            .join(key.year.to_string())
            .join(format!("{}.json", key.season))
    }

    /// Writes the dataset for `key`, fully replacing any previous file.
    pub async fn save(&self, key: SeasonKey, records: &[AnimeRecord]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(key);
        write_json_atomic(&path, records).await?;
        info!(
            event = "season_saved",
            season = %key,
            count = records.len(),
            path = %path.display(),
            "Saved season dataset"
        );
        Ok(path)
    }

    /// Reads the dataset for `key`; `None` if it has never been written.
    pub async fn load(&self, key: SeasonKey) -> Result<Option<Vec<AnimeRecord>>, StoreError> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Decode { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Season, SubjectId};

    fn record(id: u64, title: &str) -> AnimeRecord {
        AnimeRecord {
            id: SubjectId::new(id),
            title: title.to_string(),
            title_japanese: title.to_string(),
            image_url: String::new(),
            synopsis: String::new(),
            score: 7.5,
            scored_by: 10,
            rank: 0,
            popularity: 0,
            members: 3,
            genres: vec!["科幻".to_string()],
            studios: vec![],
            source: vec![],
            aired_from: "2024-10-01".to_string(),
            year: Some(2024),
            is_hentai: false,
            title_english: String::new(),
            themes: vec![],
            demographics: vec![],
            url: format!("https://bgm.tv/subject/{id}"),
        }
    }

    #[tokio::test]
    async fn save_replaces_previous_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SeasonRepository::new(dir.path());
        let key = SeasonKey::new(2024, Season::Fall);

        repo.save(key, &[record(1, "一"), record(2, "二")]).await.unwrap();
        let path = repo.save(key, &[record(3, "三")]).await.unwrap();

        assert_eq!(path, dir.path().join("2024").join("fall.json"));
        let loaded = repo.load(key).await.unwrap().unwrap();
        assert_eq!(loaded, vec![record(3, "三")]);
    }

    #[tokio::test]
    async fn written_json_keeps_unicode_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SeasonRepository::new(dir.path());
        let key = SeasonKey::new(2024, Season::Winter);

        let path = repo.save(key, &[record(1, "标题A")]).await.unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("标题A"));
        assert!(text.contains("\n  {"));
    }

    #[tokio::test]
    async fn missing_dataset_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SeasonRepository::new(dir.path());
        let key = SeasonKey::new(1999, Season::Spring);
        assert!(repo.load(key).await.unwrap().is_none());
    }
}
