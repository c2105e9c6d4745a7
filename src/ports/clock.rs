//! Clock port: the only source of run timestamps.

use chrono::{DateTime, Utc};

/// Stamps the start and end of every processing run.
///
/// Cassette playback and tests substitute a fixed or replayed clock, so
/// `ProcessingResult::started_at` is reproducible.
pub trait Clock: Send + Sync {
    /// Current UTC time.
    fn now(&self) -> DateTime<Utc>;
}
