//! Dataset subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → store.rs (existence check)
//!         → producer.rs (only when the CSV is missing, bounded by timeout)
//!     → store.rs (read + parse rows, skip malformed)
//!     → record.rs (FinalRecord, tiebreak resolved via score.rs)
//! ```

pub mod producer;
pub mod record;
pub mod score;
pub mod store;

pub use producer::{Producer, ProducerError};
pub use record::{FinalRecord, FinalView, MAX_YEAR, MIN_YEAR};
pub use store::{DatasetStore, StoreError};
