//! Season pipeline: discovery, then per-subject fetch and mapping.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::clients::{DetailOutcome, DetailSource, ListingSource};
use crate::config::BangumiConfig;
use crate::domain::{SeasonKey, SubjectId};
use crate::mapper::{MapError, map_subject};
use crate::models::AnimeRecord;
use crate::services::discovery::discover_subjects;
use crate::store::{Store, StoreError};

/// What happened to one discovered subject.
#[derive(Debug)]
pub enum ItemOutcome {
    Mapped(Box<AnimeRecord>),
    NotFound,
    TransientError(String),
    Unmappable(MapError),
}

/// Counters for one season run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonReport {
    pub discovered: usize,
    pub mapped: usize,
    pub not_found: usize,
    pub failed: usize,
    pub unmappable: usize,
}

impl SeasonReport {
    fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Mapped(_) => self.mapped += 1,
            ItemOutcome::NotFound => self.not_found += 1,
            ItemOutcome::TransientError(_) => self.failed += 1,
            ItemOutcome::Unmappable(_) => self.unmappable += 1,
        }
    }

    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.not_found + self.failed + self.unmappable
    }
}

/// Records harvested for one season, in discovery order.
#[derive(Debug, Clone)]
pub struct SeasonDataset {
    pub key: SeasonKey,
    pub records: Vec<AnimeRecord>,
}

impl SeasonDataset {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Final state of a season run that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { count: usize },

    /// Nothing was harvested, so neither the season file nor the manifest was
    /// touched.
    SkippedEmpty,
}

pub struct SeasonHarvester {
    listing: Arc<dyn ListingSource>,
    details: Arc<dyn DetailSource>,
    site_url: String,
    page_delay: Duration,
    item_delay: Duration,
}

impl SeasonHarvester {
    #[must_use]
    pub fn new(
        listing: Arc<dyn ListingSource>,
        details: Arc<dyn DetailSource>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            listing,
            details,
            site_url: site_url.into(),
            page_delay: Duration::ZERO,
            item_delay: Duration::ZERO,
        }
    }

    /// Builds a harvester with the site URL and delays from config.
    #[must_use]
    pub fn from_config(
        listing: Arc<dyn ListingSource>,
        details: Arc<dyn DetailSource>,
        config: &BangumiConfig,
    ) -> Self {
        Self::new(listing, details, config.site_url.clone())
            .with_delays(config.page_delay(), config.item_delay())
    }

    #[must_use]
    pub const fn with_delays(mut self, page_delay: Duration, item_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self.item_delay = item_delay;
        self
    }

    /// Fetches and maps a single subject. Never fails; every problem is an
    /// [`ItemOutcome`] variant.
    pub async fn process_subject(&self, id: SubjectId) -> ItemOutcome {
        match self.details.fetch_subject(id).await {
            DetailOutcome::Found(subject) => match map_subject(&subject, &self.site_url) {
                Ok(record) => ItemOutcome::Mapped(Box::new(record)),
                Err(e) => {
                    debug!(subject_id = %id, error = %e, "Skipping unmappable subject");
                    ItemOutcome::Unmappable(e)
                }
            },
            DetailOutcome::NotFound => ItemOutcome::NotFound,
            DetailOutcome::Failed(reason) => ItemOutcome::TransientError(reason),
        }
    }

    /// Runs discovery and fetches every discovered subject sequentially.
    ///
    /// Failed subjects are skipped without retry; the run itself cannot fail.
    #[instrument(skip(self), fields(season = %key))]
    pub async fn harvest(&self, key: SeasonKey) -> (SeasonDataset, SeasonReport) {
        let ids = discover_subjects(
            self.listing.as_ref(),
            key.year,
            key.season.anchor_month(),
            self.page_delay,
        )
        .await;

        let mut report = SeasonReport {
            discovered: ids.len(),
            ..SeasonReport::default()
        };
        let mut records = Vec::with_capacity(ids.len());

        if ids.is_empty() {
            warn!(event = "season_empty", "No subjects found");
            return (SeasonDataset { key, records }, report);
        }

        info!("Fetching details for {} subjects", ids.len());

        for (i, id) in ids.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.item_delay).await;
            }

            debug!(progress = i + 1, total = ids.len(), subject_id = %id, "Fetching subject");

            let outcome = self.process_subject(*id).await;
            report.record(&outcome);

            if let ItemOutcome::Mapped(record) = outcome {
                records.push(*record);
            }
        }

        info!(
            event = "season_harvested",
            discovered = report.discovered,
            mapped = report.mapped,
            not_found = report.not_found,
            failed = report.failed,
            unmappable = report.unmappable,
            "Season harvest complete"
        );

        (SeasonDataset { key, records }, report)
    }

    /// Harvests a season and persists it.
    ///
    /// An empty result is not written and leaves the manifest alone, so a
    /// failed discovery never shows up as a confirmed-empty season.
    pub async fn harvest_and_save(
        &self,
        store: &Store,
        key: SeasonKey,
    ) -> Result<(SaveOutcome, SeasonReport), StoreError> {
        let (dataset, report) = self.harvest(key).await;

        if dataset.is_empty() {
            info!(season = %key, "Nothing harvested, leaving stored data untouched");
            return Ok((SaveOutcome::SkippedEmpty, report));
        }

        store.save_season(key, &dataset.records).await?;
        store.upsert_manifest(key, dataset.len()).await?;

        Ok((
            SaveOutcome::Saved {
                count: dataset.len(),
            },
            report,
        ))
    }
}
