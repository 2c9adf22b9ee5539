//! Year and player lookups over a loaded table.

use serde::Serialize;

use crate::dataset::record::FinalRecord;
use crate::dataset::score::normalize_dashes;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("no final recorded for {0}")]
    YearNotFound(i32),
    #[error("no finals found for player '{0}'")]
    PlayerNotFound(String),
}

/// Exact-year match.
pub fn by_year(records: &[FinalRecord], year: i32) -> Option<&FinalRecord> {
    records.iter().find(|r| r.year == year)
}

/// A final the searched player took part in.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerFinal {
    pub year: i32,
    pub champion: String,
    pub runner_up: String,
    pub score: String,
    pub sets: u32,
    pub tiebreak: bool,
    pub player_won: bool,
}

/// All finals for one player, most recent first.
#[derive(Debug, Clone)]
pub struct PlayerHistory {
    pub query: String,
    pub finals: Vec<PlayerFinal>,
}

impl PlayerHistory {
    pub fn total(&self) -> usize {
        self.finals.len()
    }

    pub fn wins(&self) -> usize {
        self.finals.iter().filter(|f| f.player_won).count()
    }

    pub fn losses(&self) -> usize {
        self.total() - self.wins()
    }
}

/// Case-insensitive match of `name` against champion or runner-up.
pub fn by_player(records: &[FinalRecord], name: &str) -> Result<PlayerHistory, LookupError> {
    let needle = name.trim().to_lowercase();

    let mut finals: Vec<PlayerFinal> = records
        .iter()
        .filter_map(|r| {
            let won = r.champion.to_lowercase() == needle;
            if !won && r.runner_up.to_lowercase() != needle {
                return None;
            }
            Some(PlayerFinal {
                year: r.year,
                champion: r.champion.clone(),
                runner_up: r.runner_up.clone(),
                score: normalize_dashes(&r.score),
                sets: r.sets,
                tiebreak: r.tiebreak,
                player_won: won,
            })
        })
        .collect();

    if finals.is_empty() {
        return Err(LookupError::PlayerNotFound(name.to_string()));
    }

    finals.sort_by(|a, b| b.year.cmp(&a.year));

    Ok(PlayerHistory {
        query: name.to_string(),
        finals,
    })
}
