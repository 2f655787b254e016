pub mod discovery;
pub use discovery::discover_subjects;

pub mod season;
pub use season::{ItemOutcome, SaveOutcome, SeasonDataset, SeasonHarvester, SeasonReport};
