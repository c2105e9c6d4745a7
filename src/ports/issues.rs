//! Issue tracker port for creating issues and reading project context.

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::extract::{IssuePayload, ProjectContext};

/// Boxed future type alias used by [`IssueTracker`] to keep the trait dyn-compatible.
pub type IssueFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// An issue the tracker has created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedIssue {
    /// Global issue ID.
    pub id: u64,
    /// Project-scoped issue number, used in `#iid` references.
    pub iid: u64,
    /// Title as stored by the tracker.
    pub title: String,
    /// Browser URL of the issue.
    pub web_url: String,
}

/// Creates issues in an external tracker and reads the project context
/// used for enrichment.
///
/// Abstracting issue tracking allows deterministic replay and testing
/// without touching a real issue tracker API.
pub trait IssueTracker: Send + Sync {
    /// Creates an issue in `project_id` from `payload`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tracker rejects the issue or cannot be reached.
    fn create_issue(&self, project_id: &str, payload: &IssuePayload) -> IssueFuture<'_, CreatedIssue>;

    /// Fetches open issues, members and active milestones of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the lookups fails.
    fn project_context(&self, project_id: &str) -> IssueFuture<'_, ProjectContext>;
}
