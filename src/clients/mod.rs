//! Upstream data sources.
//!
//! The season pipeline only talks to the two traits below, so it can be driven
//! by the real [`bangumi::BangumiClient`] or by an in-memory fake.

pub mod bangumi;

pub use bangumi::{BangumiClient, ClientError, RawSubject};

use async_trait::async_trait;

use crate::domain::SubjectId;

/// Result of fetching one subject's detail record. Never an error: callers
/// match on the variant and decide whether to skip.
#[derive(Debug)]
pub enum DetailOutcome {
    Found(Box<RawSubject>),

    /// The upstream reports that the subject does not exist.
    NotFound,

    /// Transport failure, unexpected status or undecodable body.
    Failed(String),
}

/// Paginated discovery of subject IDs airing in a given month.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches one listing page and returns the subject IDs found on it, in
    /// page order. An empty list means the page had no items.
    async fn fetch_listing_page(
        &self,
        year: i32,
        month: u32,
        page: u32,
    ) -> Result<Vec<SubjectId>, ClientError>;
}

/// Per-subject detail lookup.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_subject(&self, id: SubjectId) -> DetailOutcome;
}
