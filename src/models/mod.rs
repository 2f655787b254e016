pub mod anime;
pub mod manifest;

pub use anime::AnimeRecord;
pub use manifest::ManifestEntry;
