//! CSV-backed dataset store.
//!
//! # Responsibilities
//! - Read the backing store on every request (no caching)
//! - Regenerate a missing store through the producer, once per call
//! - Skip malformed rows individually, first row per year wins

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::config::DatasetConfig;
use crate::dataset::producer::{Producer, ProducerError};
use crate::dataset::record::FinalRecord;
use crate::dataset::score::infer_tiebreak;
use crate::lookup;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dataset unavailable: {0}")]
    Unavailable(#[from] ProducerError),
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// Header-keyed row as it appears in the file.
#[derive(Debug, Deserialize)]
struct RawRow {
    year: String,
    champion: String,
    runner_up: String,
    score: String,
    sets: String,
    #[serde(default)]
    tiebreak: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum RowError {
    #[error("year '{0}' is not an integer")]
    Year(String),
    #[error("sets '{0}' is not a positive integer")]
    Sets(String),
    #[error("empty {0}")]
    Empty(&'static str),
}

impl RawRow {
    fn into_record(self) -> Result<FinalRecord, RowError> {
        let year = self
            .year
            .trim()
            .parse::<i32>()
            .map_err(|_| RowError::Year(self.year.clone()))?;
        let sets = match self.sets.trim().parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => return Err(RowError::Sets(self.sets.clone())),
        };

        let champion = self.champion.trim();
        if champion.is_empty() {
            return Err(RowError::Empty("champion"));
        }
        let runner_up = self.runner_up.trim();
        if runner_up.is_empty() {
            return Err(RowError::Empty("runner_up"));
        }

        let score = self.score.trim();
        let tiebreak = infer_tiebreak(score, self.tiebreak.as_deref());

        Ok(FinalRecord {
            year,
            champion: champion.to_string(),
            runner_up: runner_up.to_string(),
            score: score.to_string(),
            sets,
            tiebreak,
        })
    }
}

/// Parse CSV bytes into records.
///
/// Fails only when the header itself cannot be read; bad rows are logged and
/// dropped.
pub fn parse_records(data: &[u8]) -> Result<Vec<FinalRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);
    reader.headers()?;

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for (index, row) in reader.deserialize::<RawRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let parsed = row
            .map_err(|e| e.to_string())
            .and_then(|raw| raw.into_record().map_err(|e| e.to_string()));

        match parsed {
            Ok(record) => {
                if seen.insert(record.year) {
                    records.push(record);
                } else {
                    tracing::debug!(line, year = record.year, "Duplicate year, keeping first row");
                }
            }
            Err(reason) => {
                tracing::warn!(line, reason = %reason, "Skipping malformed row");
                metrics::counter!("wimbledon_rows_skipped_total").increment(1);
            }
        }
    }

    Ok(records)
}

/// Read-only access to the finals table.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    path: PathBuf,
    producer: Producer,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>, producer: Producer) -> Self {
        Self {
            path: path.into(),
            producer,
        }
    }

    pub fn from_config(config: &DatasetConfig) -> Self {
        Self::new(config.path.clone(), Producer::new(config.producer.clone()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing store is currently present.
    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Make sure the store exists, running the producer if it does not.
    ///
    /// Concurrent callers may both run the producer; it overwrites the same
    /// target.
    pub async fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.exists().await {
            return Ok(());
        }
        self.producer.generate(&self.path).await?;
        Ok(())
    }

    /// Every well-formed record, in file order.
    pub async fn load_all(&self) -> Result<Vec<FinalRecord>, StoreError> {
        self.ensure_exists().await?;
        let data = tokio::fs::read(&self.path).await?;
        Ok(parse_records(&data)?)
    }

    /// The record for `year`, if present.
    pub async fn load(&self, year: i32) -> Result<Option<FinalRecord>, StoreError> {
        let records = self.load_all().await?;
        Ok(lookup::by_year(&records, year).cloned())
    }
}
