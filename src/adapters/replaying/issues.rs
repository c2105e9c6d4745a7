//! Replaying adapter for the `IssueTracker` port.

use super::{next_output, replay_result, SharedReplayer};
use crate::extract::{IssuePayload, ProjectContext};
use crate::ports::{CreatedIssue, IssueFuture, IssueTracker};

/// Serves recorded issue tracker results.
pub struct ReplayingIssueTracker {
    replayer: SharedReplayer,
}

impl ReplayingIssueTracker {
    /// Creates a tracker reading from `replayer`.
    #[must_use]
    pub fn new(replayer: SharedReplayer) -> Self {
        Self { replayer }
    }
}

impl IssueTracker for ReplayingIssueTracker {
    fn create_issue(&self, _project_id: &str, _payload: &IssuePayload) -> IssueFuture<'_, CreatedIssue> {
        let output = next_output(&self.replayer, "issues", "create_issue");
        Box::pin(async move { replay_result::<CreatedIssue>(output) })
    }

    fn project_context(&self, _project_id: &str) -> IssueFuture<'_, ProjectContext> {
        let output = next_output(&self.replayer, "issues", "project_context");
        Box::pin(async move { replay_result::<ProjectContext>(output) })
    }
}
