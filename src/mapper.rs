//! Maps upstream detail records onto the persisted [`AnimeRecord`] schema.
//!
//! Each output field is derived independently; a missing or malformed part of
//! the input only affects its own field.

use thiserror::Error;

use crate::clients::bangumi::{RawSubject, SubjectImages};
use crate::constants::infobox::{SOURCE_KEYS, STUDIO_KEYS};
use crate::models::AnimeRecord;
use crate::taxonomy::normalize_genres;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("Detail record has no subject id")]
    MissingId,
}

/// First non-empty image in preference order: large, common, medium.
fn pick_image(images: Option<&SubjectImages>) -> String {
    images
        .and_then(|i| {
            [&i.large, &i.common, &i.medium]
                .into_iter()
                .flatten()
                .find(|url| !url.is_empty())
                .cloned()
        })
        .unwrap_or_default()
}

/// Full-width digits (`０`..`９`) read as their ASCII counterparts.
fn halfwidth_digit(c: char) -> char {
    match c {
        '０'..='９' => char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c),
        _ => c,
    }
}

/// Year from the first four characters of an air date such as `2024-10-04`.
/// Full-width digits and surrounding whitespace are accepted.
#[must_use]
pub fn parse_year(date: &str) -> Option<i32> {
    if date.chars().count() < 4 {
        return None;
    }
    date.chars()
        .take(4)
        .map(halfwidth_digit)
        .collect::<String>()
        .trim()
        .parse()
        .ok()
}

fn collection_total(subject: &RawSubject) -> u64 {
    subject
        .collection
        .as_ref()
        .map(|buckets| buckets.values().filter_map(serde_json::Value::as_u64).sum())
        .unwrap_or(0)
}

/// All infobox values filed under any of `keys`, in infobox order.
#[must_use]
pub fn infobox_values(subject: &RawSubject, keys: &[&str]) -> Vec<String> {
    let Some(infobox) = subject.infobox.as_ref() else {
        return Vec::new();
    };

    infobox
        .iter()
        .filter(|item| item.key.as_deref().is_some_and(|k| keys.contains(&k)))
        .filter_map(|item| item.value.as_ref())
        .flat_map(|value| value.texts())
        .collect()
}

/// Builds the persisted record for one subject.
///
/// `site_url` is the website root used for the record's detail-page link.
///
/// # Errors
/// Returns [`MapError::MissingId`] for an empty record.
pub fn map_subject(subject: &RawSubject, site_url: &str) -> Result<AnimeRecord, MapError> {
    let id = subject.id.ok_or(MapError::MissingId)?;

    let name = subject.name.clone().unwrap_or_default();
    let title = subject
        .name_cn
        .as_ref()
        .filter(|cn| !cn.is_empty())
        .cloned()
        .unwrap_or_else(|| name.clone());

    let rating = subject.rating.as_ref();
    let date = subject.date.clone().unwrap_or_default();

    let genres = subject
        .tags
        .as_deref()
        .map(|tags| normalize_genres(tags.iter().map(|t| (t.name.as_str(), t.count))))
        .unwrap_or_default();

    Ok(AnimeRecord {
        id,
        title,
        title_japanese: name,
        image_url: pick_image(subject.images.as_ref()),
        synopsis: subject.summary.clone().unwrap_or_default(),
        score: rating.and_then(|r| r.score).unwrap_or(0.0),
        scored_by: rating.and_then(|r| r.total).unwrap_or(0),
        rank: rating.and_then(|r| r.rank).unwrap_or(0),
        popularity: 0,
        members: collection_total(subject),
        genres,
        studios: infobox_values(subject, STUDIO_KEYS),
        source: infobox_values(subject, SOURCE_KEYS),
        year: parse_year(&date),
        aired_from: date,
        is_hentai: subject.nsfw.unwrap_or(false),
        title_english: String::new(),
        themes: Vec::new(),
        demographics: Vec::new(),
        url: format!("{}/subject/{}", site_url.trim_end_matches('/'), id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubjectId;

    const SITE: &str = "https://bgm.tv";

    fn subject(json: &str) -> RawSubject {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn falls_back_to_original_name_when_localized_is_empty() {
        let record = map_subject(&subject(r#"{"id": 1, "name": "Title A", "name_cn": ""}"#), SITE)
            .unwrap();
        assert_eq!(record.title, "Title A");
        assert_eq!(record.title_japanese, "Title A");
    }

    #[test]
    fn prefers_localized_name() {
        let record = map_subject(
            &subject(r#"{"id": 1, "name": "Title A", "name_cn": "标题A"}"#),
            SITE,
        )
        .unwrap();
        assert_eq!(record.title, "标题A");
        assert_eq!(record.title_japanese, "Title A");
    }

    #[test]
    fn empty_record_is_unmappable() {
        assert_eq!(map_subject(&subject("{}"), SITE), Err(MapError::MissingId));
    }

    #[test]
    fn year_parsing() {
        assert_eq!(parse_year("2024-10-04"), Some(2024));
        assert_eq!(parse_year("2024"), Some(2024));
        assert_eq!(parse_year("abc"), None);
        assert_eq!(parse_year("abcd-01-01"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("２０２４年10月"), Some(2024));
        assert_eq!(parse_year("２０２４"), Some(2024));
    }

    #[test]
    fn missing_rating_defaults_to_zero() {
        let record = map_subject(&subject(r#"{"id": 9}"#), SITE).unwrap();
        assert_eq!(record.score, 0.0);
        assert_eq!(record.rank, 0);
        assert_eq!(record.scored_by, 0);
        assert_eq!(record.members, 0);
        assert_eq!(record.year, None);
        assert!(record.genres.is_empty());
        assert!(!record.is_hentai);
    }

    #[test]
    fn maps_a_full_record() {
        let json = r#"{
            "id": 400602,
            "name": "葬送のフリーレン",
            "name_cn": "葬送的芙莉莲",
            "images": {"large": "", "common": "https://img/c.jpg", "medium": "https://img/m.jpg"},
            "rating": {"score": 9.1, "rank": 3, "total": 41000},
            "summary": "勇者一行打倒魔王之后",
            "date": "2023-09-29",
            "tags": [
                {"name": "奇幻", "count": 900},
                {"name": "漫改", "count": 700},
                {"name": "2023", "count": 500},
                {"name": "治愈系", "count": 300},
                {"name": "Fantasy", "count": 10}
            ],
            "collection": {"wish": 10, "collect": 20, "doing": 5, "on_hold": 1, "dropped": 2},
            "infobox": [
                {"key": "中文名", "value": "葬送的芙莉莲"},
                {"key": "动画制作", "value": "MADHOUSE"},
                {"key": "原作", "value": [{"v": "山田鐘人"}, {"v": "アベツカサ"}]}
            ],
            "nsfw": false
        }"#;

        let record = map_subject(&subject(json), SITE).unwrap();
        assert_eq!(record.id, SubjectId::new(400602));
        assert_eq!(record.title, "葬送的芙莉莲");
        assert_eq!(record.image_url, "https://img/c.jpg");
        assert_eq!(record.score, 9.1);
        assert_eq!(record.rank, 3);
        assert_eq!(record.scored_by, 41000);
        assert_eq!(record.members, 38);
        assert_eq!(record.genres, vec!["奇幻", "治愈"]);
        assert_eq!(record.studios, vec!["MADHOUSE"]);
        assert_eq!(record.source, vec!["山田鐘人", "アベツカサ"]);
        assert_eq!(record.aired_from, "2023-09-29");
        assert_eq!(record.year, Some(2023));
        assert_eq!(record.url, "https://bgm.tv/subject/400602");
    }

    #[test]
    fn infobox_collects_every_studio_key() {
        let json = r#"{
            "id": 2,
            "infobox": [
                {"key": "制作", "value": "Studio A"},
                {"key": "动画制作", "value": [{"v": "Studio B"}, {"v": null}]}
            ]
        }"#;
        let record = map_subject(&subject(json), SITE).unwrap();
        assert_eq!(record.studios, vec!["Studio A", "Studio B"]);
        assert!(record.source.is_empty());
    }

    #[test]
    fn serializes_with_viewer_field_names() {
        let record = map_subject(&subject(r#"{"id": 5, "name": "X"}"#), SITE).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["mal_id"], 5);
        assert_eq!(value["year"], serde_json::Value::Null);
        assert_eq!(value["title_english"], "");
        assert!(value["themes"].as_array().unwrap().is_empty());
    }
}
