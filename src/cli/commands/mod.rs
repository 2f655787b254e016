mod harvest;
mod manifest;

pub use harvest::{cmd_current, cmd_history, cmd_season};
pub use manifest::cmd_manifest;
