//! Recording adapter for the `IssueTracker` port.

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::extract::{IssuePayload, ProjectContext};
use crate::ports::{CreatedIssue, IssueFuture, IssueTracker};

/// Records issue tracker calls while delegating to an inner tracker.
pub struct RecordingIssueTracker {
    inner: Box<dyn IssueTracker>,
    recorder: SharedRecorder,
}

impl RecordingIssueTracker {
    /// Wraps `inner`, appending every call and its result to `recorder`.
    pub fn new(inner: Box<dyn IssueTracker>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct CreateIssueInput<'a> {
    project_id: &'a str,
    payload: &'a IssuePayload,
}

#[derive(Serialize)]
struct ProjectInput<'a> {
    project_id: &'a str,
}

impl IssueTracker for RecordingIssueTracker {
    fn create_issue(&self, project_id: &str, payload: &IssuePayload) -> IssueFuture<'_, CreatedIssue> {
        let project_id = project_id.to_string();
        let payload = payload.clone();

        Box::pin(async move {
            let result = self.inner.create_issue(&project_id, &payload).await;
            let input = CreateIssueInput { project_id: &project_id, payload: &payload };
            record_result(&self.recorder, "issues", "create_issue", &input, &result);
            result
        })
    }

    fn project_context(&self, project_id: &str) -> IssueFuture<'_, ProjectContext> {
        let project_id = project_id.to_string();

        Box::pin(async move {
            let result = self.inner.project_context(&project_id).await;
            let input = ProjectInput { project_id: &project_id };
            record_result(&self.recorder, "issues", "project_context", &input, &result);
            result
        })
    }
}
