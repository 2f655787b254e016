//! Broadcast seasons and the `(year, season)` key every dataset is filed under.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four three-month broadcast periods of a year.
///
/// Variant order is chronological, so the derived `Ord` is the season ordinal
/// (winter < spring < summer < fall).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Self; 4] = [Self::Winter, Self::Spring, Self::Summer, Self::Fall];

    /// Calendar month used to query the listing endpoint for this season.
    #[must_use]
    pub const fn anchor_month(self) -> u32 {
        match self {
            Self::Winter => 1,
            Self::Spring => 4,
            Self::Summer => 7,
            Self::Fall => 10,
        }
    }

    /// Position within the year, winter = 0 through fall = 3.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Fall => "fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid season: {0} (expected winter, spring, summer or fall)")]
pub struct SeasonParseError(String);

impl FromStr for Season {
    type Err = SeasonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Self::Winter),
            "spring" => Ok(Self::Spring),
            "summer" => Ok(Self::Summer),
            "fall" | "autumn" => Ok(Self::Fall),
            _ => Err(SeasonParseError(s.to_string())),
        }
    }
}

/// Identifies one season dataset.
///
/// Ordering is chronological: by year, then by season ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonKey {
    pub year: i32,
    pub season: Season,
}

impl SeasonKey {
    #[must_use]
    pub const fn new(year: i32, season: Season) -> Self {
        Self { year, season }
    }

    /// All four seasons of `year`, in chronological order.
    pub fn seasons_of(year: i32) -> impl Iterator<Item = Self> {
        Season::ALL.into_iter().map(move |season| Self::new(year, season))
    }

    /// Every season from `start_year` through `end_year` inclusive, oldest first.
    pub fn range(start_year: i32, end_year: i32) -> impl Iterator<Item = Self> {
        (start_year..=end_year).flat_map(Self::seasons_of)
    }
}

impl PartialOrd for SeasonKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SeasonKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.season.cmp(&other.season))
    }
}

impl fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.year, self.season)
    }
}
