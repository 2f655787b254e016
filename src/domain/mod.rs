//! Domain types for the season harvester with strong typing.
//!
//! Follows the Newtype pattern so upstream subject IDs never get mixed up with
//! years, page numbers or counts.

pub mod season;

pub use season::{Season, SeasonKey, SeasonParseError};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a subject (one anime entry) in the upstream media database.
///
/// # Examples
///
/// ```rust
/// use seasonarr::domain::SubjectId;
///
/// let id = SubjectId::new(400602);
/// assert_eq!(id.value(), 400602);
/// assert_eq!(id.to_string(), "400602");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SubjectId(u64);

impl SubjectId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for SubjectId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<SubjectId> for u64 {
    fn from(id: SubjectId) -> Self {
        id.0
    }
}

impl FromStr for SubjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::new)
    }
}

impl Serialize for SubjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = u64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subject_id_parses_from_listing_digits() {
        let id: SubjectId = "12345".parse().unwrap();
        assert_eq!(id, SubjectId::new(12345));
        assert!("item_12".parse::<SubjectId>().is_err());
    }

    #[test]
    fn subject_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&SubjectId::new(7)).unwrap();
        assert_eq!(json, "7");
        let back: SubjectId = serde_json::from_str("7").unwrap();
        assert_eq!(back.value(), 7);
    }
}
