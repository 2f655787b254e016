use serde::{Deserialize, Serialize};

use crate::domain::SubjectId;

/// One anime entry as persisted in a season dataset.
///
/// Field names are the downstream viewer's schema, which predates this crate;
/// the `mal_id` slot carries the upstream subject ID.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimeRecord {
    #[serde(rename = "mal_id")]
    pub id: SubjectId,
    pub title: String,
    pub title_japanese: String,
    pub image_url: String,
    pub synopsis: String,
    pub score: f64,
    pub scored_by: u64,
    pub rank: u64,
    pub popularity: u64,
    pub members: u64,
    pub genres: Vec<String>,
    pub studios: Vec<String>,
    pub source: Vec<String>,
    pub aired_from: String,
    pub year: Option<i32>,
    pub is_hentai: bool,
    #[serde(default)]
    pub title_english: String,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub demographics: Vec<String>,
    pub url: String,
}
