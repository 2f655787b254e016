use serde::{Deserialize, Serialize};

use crate::domain::{Season, SeasonKey};

/// One line of the manifest: a season dataset that exists and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub year: i32,
    pub season: Season,
    pub count: usize,
}

impl ManifestEntry {
    #[must_use]
    pub const fn new(key: SeasonKey, count: usize) -> Self {
        Self {
            year: key.year,
            season: key.season,
            count,
        }
    }

    #[must_use]
    pub const fn key(&self) -> SeasonKey {
        SeasonKey::new(self.year, self.season)
    }
}
