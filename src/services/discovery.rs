//! Listing walker: pages through the seasonal listing until it runs dry.

use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::clients::ListingSource;
use crate::domain::SubjectId;

/// Collects every subject ID listed for `year`/`month`, page by page.
///
/// The listing has no "last page" marker, so the walk stops at the first page
/// with no items. A failed page ends the walk early and whatever was gathered
/// so far is returned; callers treat a short or empty result as "nothing
/// found". IDs are not deduplicated across pages.
#[instrument(skip(source, page_delay))]
pub async fn discover_subjects(
    source: &dyn ListingSource,
    year: i32,
    month: u32,
    page_delay: Duration,
) -> Vec<SubjectId> {
    let mut subject_ids = Vec::new();
    let mut page = 1;

    loop {
        let ids = match source.fetch_listing_page(year, month, page).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!(
                    event = "listing_page_failed",
                    page,
                    error = %e,
                    "Failed to fetch listing page, stopping walk"
                );
                break;
            }
        };

        if ids.is_empty() {
            debug!(page, "Empty listing page, walk complete");
            break;
        }

        info!(page, found = ids.len(), "Scanned listing page");
        subject_ids.extend(ids);
        page += 1;

        tokio::time::sleep(page_delay).await;
    }

    info!(
        event = "discovery_finished",
        total = subject_ids.len(),
        "Discovered subjects"
    );
    subject_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ClientError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Serves canned pages and records which pages were requested.
    struct FakeListing {
        pages: Vec<Result<Vec<u64>, ()>>,
        requested: Mutex<Vec<u32>>,
    }

    impl FakeListing {
        fn new(pages: Vec<Result<Vec<u64>, ()>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<u32> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListingSource for FakeListing {
        async fn fetch_listing_page(
            &self,
            _year: i32,
            _month: u32,
            page: u32,
        ) -> Result<Vec<SubjectId>, ClientError> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Ok(ids)) => Ok(ids.iter().copied().map(SubjectId::new).collect()),
                Some(Err(())) => Err(ClientError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    url: format!("fake://page/{page}"),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    #[tokio::test]
    async fn stops_at_first_empty_page() {
        let first: Vec<u64> = (1..=24).collect();
        let source = FakeListing::new(vec![Ok(first.clone()), Ok(vec![]), Ok(vec![99])]);

        let ids = discover_subjects(&source, 2024, 10, Duration::ZERO).await;

        assert_eq!(ids.iter().map(|i| i.value()).collect::<Vec<_>>(), first);
        assert_eq!(source.requested(), vec![1, 2]);
    }

    #[tokio::test]
    async fn failed_page_returns_partial_result() {
        let source = FakeListing::new(vec![Ok(vec![1, 2]), Ok(vec![3]), Err(()), Ok(vec![4])]);

        let ids = discover_subjects(&source, 2024, 1, Duration::ZERO).await;

        assert_eq!(ids, vec![SubjectId::new(1), SubjectId::new(2), SubjectId::new(3)]);
        assert_eq!(source.requested(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failure_on_first_page_yields_nothing() {
        let source = FakeListing::new(vec![Err(())]);
        assert!(discover_subjects(&source, 2024, 4, Duration::ZERO).await.is_empty());
    }

    #[tokio::test]
    async fn repeated_ids_across_pages_are_kept() {
        let source = FakeListing::new(vec![Ok(vec![5, 6]), Ok(vec![6, 7])]);
        let ids = discover_subjects(&source, 2024, 7, Duration::ZERO).await;
        assert_eq!(ids.len(), 4);
    }
}
