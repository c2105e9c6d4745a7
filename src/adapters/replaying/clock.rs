//! Replaying adapter for the `Clock` port.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::{next_output, SharedReplayer};
use crate::ports::Clock;

/// Serves recorded clock readings.
pub struct ReplayingClock {
    replayer: SharedReplayer,
}

impl ReplayingClock {
    /// Creates a clock reading from `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl Clock for ReplayingClock {
    /// The next recorded instant. An unreadable entry yields the Unix epoch.
    fn now(&self) -> DateTime<Utc> {
        let output = next_output(&self.replayer, "clock", "now");
        serde_json::from_value(output).unwrap_or_else(|err| {
            warn!(error = %err, "cassette clock entry is not a timestamp");
            DateTime::<Utc>::UNIX_EPOCH
        })
    }
}
