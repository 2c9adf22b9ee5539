//! A single championship final.

use serde::Serialize;

use crate::dataset::score::normalize_dashes;

/// First year a final was played.
pub const MIN_YEAR: i32 = 1877;
/// Last year covered by the dataset.
pub const MAX_YEAR: i32 = 2024;

/// One row of the backing store. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalRecord {
    pub year: i32,
    pub champion: String,
    pub runner_up: String,
    /// Raw score text as produced; may hold dash variants.
    pub score: String,
    pub sets: u32,
    pub tiebreak: bool,
}

impl FinalRecord {
    /// Render with display-safe dashes.
    pub fn to_view(&self) -> FinalView {
        FinalView {
            year: self.year,
            champion: self.champion.clone(),
            runner_up: self.runner_up.clone(),
            score: normalize_dashes(&self.score),
            sets: self.sets,
            tiebreak: self.tiebreak,
        }
    }
}

/// JSON shape of a final, field order as served.
#[derive(Debug, Clone, Serialize)]
pub struct FinalView {
    pub year: i32,
    pub champion: String,
    pub runner_up: String,
    pub score: String,
    pub sets: u32,
    pub tiebreak: bool,
}
