mod summary;
pub mod views;

pub use summary::{MissingDataEntry, PropertySnapshot, RankingReport};
