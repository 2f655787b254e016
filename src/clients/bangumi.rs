use async_trait::async_trait;
use regex::Regex;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::{DetailOutcome, DetailSource, ListingSource};
use crate::config::BangumiConfig;
use crate::domain::SubjectId;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Detail record as returned by `GET /v0/subjects/{id}`.
///
/// Every field is optional: the API omits or nulls fields freely, and the
/// mapper supplies defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSubject {
    pub id: Option<SubjectId>,
    pub name: Option<String>,
    pub name_cn: Option<String>,
    pub images: Option<SubjectImages>,
    pub rating: Option<SubjectRating>,
    pub summary: Option<String>,
    pub date: Option<String>,
    pub tags: Option<Vec<SubjectTag>>,
    pub collection: Option<BTreeMap<String, serde_json::Value>>,
    pub infobox: Option<Vec<InfoboxItem>>,
    pub nsfw: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubjectImages {
    pub large: Option<String>,
    pub common: Option<String>,
    pub medium: Option<String>,
    pub small: Option<String>,
    pub grid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubjectRating {
    pub score: Option<f64>,
    pub rank: Option<u64>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubjectTag {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InfoboxItem {
    pub key: Option<String>,
    pub value: Option<InfoboxValue>,
}

/// Infobox values are either a plain string or a list of `{k?, v}` entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InfoboxValue {
    Text(String),
    List(Vec<InfoboxEntry>),
    Other(serde_json::Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InfoboxEntry {
    pub k: Option<String>,
    pub v: Option<serde_json::Value>,
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

impl InfoboxValue {
    /// Flattens the value into its text parts. List entries contribute their
    /// inner `v`; nulls and nested structures contribute nothing.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s.clone()],
            Self::List(entries) => entries
                .iter()
                .filter_map(|e| e.v.as_ref().and_then(scalar_text))
                .collect(),
            Self::Other(value) => scalar_text(value).into_iter().collect(),
        }
    }
}

fn item_regex() -> Option<&'static Regex> {
    static INSTANCE: OnceLock<Option<Regex>> = OnceLock::new();
    INSTANCE
        .get_or_init(|| Regex::new(r#"<li\b[^>]*?\sid\s*=\s*["']item_(\d+)["']"#).ok())
        .as_ref()
}

/// Extracts subject IDs from a listing page, in document order.
///
/// Listing entries are `<li id="item_<digits>">` elements. Repeated IDs are
/// kept as-is.
#[must_use]
pub fn extract_subject_ids(html: &str) -> Vec<SubjectId> {
    let Some(re) = item_regex() else {
        return Vec::new();
    };
    re.captures_iter(html)
        .filter_map(|c| c.get(1))
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

#[derive(Clone)]
pub struct BangumiClient {
    client: Client,
    site_url: String,
    api_url: String,
    region_tag: String,
    browser_user_agent: String,
    api_user_agent: String,
}

impl BangumiClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &BangumiConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self::with_shared_client(client, config))
    }

    /// Creates a client on top of an existing `reqwest::Client`.
    #[must_use]
    pub fn with_shared_client(client: Client, config: &BangumiConfig) -> Self {
        Self {
            client,
            site_url: config.site_url.trim_end_matches('/').to_string(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            region_tag: config.region_tag.clone(),
            browser_user_agent: config.browser_user_agent.clone(),
            api_user_agent: config.api_user_agent.clone(),
        }
    }

    #[must_use]
    pub fn listing_url(&self, year: i32, month: u32, page: u32) -> String {
        format!(
            "{}/anime/browser/{}/airtime/{}-{}?page={}",
            self.site_url,
            urlencoding::encode(&self.region_tag),
            year,
            month,
            page
        )
    }

    #[must_use]
    pub fn subject_api_url(&self, id: SubjectId) -> String {
        format!("{}/v0/subjects/{}", self.api_url, id)
    }

    async fn get_subject(&self, id: SubjectId) -> Result<Option<RawSubject>, ClientError> {
        let url = self.subject_api_url(id);
        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.api_user_agent)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status(),
                url,
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl ListingSource for BangumiClient {
    async fn fetch_listing_page(
        &self,
        year: i32,
        month: u32,
        page: u32,
    ) -> Result<Vec<SubjectId>, ClientError> {
        let url = self.listing_url(year, month, page);
        debug!(url = %url, "Scanning listing page");

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.browser_user_agent)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Status {
                status: response.status(),
                url,
            });
        }

        let html = response.text().await?;
        Ok(extract_subject_ids(&html))
    }
}

#[async_trait]
impl DetailSource for BangumiClient {
    async fn fetch_subject(&self, id: SubjectId) -> DetailOutcome {
        match self.get_subject(id).await {
            Ok(Some(subject)) => DetailOutcome::Found(Box::new(subject)),
            Ok(None) => {
                warn!(subject_id = %id, "Subject not found (404)");
                DetailOutcome::NotFound
            }
            Err(e) => {
                warn!(subject_id = %id, error = %e, "Failed to fetch subject");
                DetailOutcome::Failed(e.to_string())
            }
        }
    }
}
