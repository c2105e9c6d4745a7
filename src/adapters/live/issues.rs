//! Live adapter for the `IssueTracker` port using the GitLab v4 REST API.

use std::error::Error;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::extract::{ExistingIssue, IssuePayload, Milestone, ProjectContext, TeamMember};
use crate::ports::{CreatedIssue, IssueFuture, IssueTracker};

type BoxError = Box<dyn Error + Send + Sync>;

/// Page size for context lookups; only the first page is read.
const PER_PAGE: &str = "100";

/// Issue tracker talking to a GitLab instance with a private token.
pub struct GitLabIssueTracker {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitLabIssueTracker {
    /// Creates a tracker for the instance at `base_url`.
    ///
    /// Without a token every call fails before reaching the network.
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into(), token }
    }

    /// Builds `<base>/api/v4/projects/<id>/<tail…>`. The project id is a
    /// single path segment, so `group/project` paths come out encoded.
    fn project_url(&self, project_id: &str, tail: &[&str]) -> Result<Url, BoxError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| format!("Invalid GitLab URL {:?}: {e}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| format!("GitLab URL {:?} cannot have a path", self.base_url))?
            .pop_if_empty()
            .extend(["api", "v4", "projects", project_id])
            .extend(tail);
        Ok(url)
    }

    fn token(&self) -> Result<&str, BoxError> {
        self.token.as_deref().ok_or_else(|| "GITLAB_TOKEN is not set".into())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, BoxError> {
        debug!(%url, "GitLab GET");
        let response = self
            .client
            .get(url)
            .header("PRIVATE-TOKEN", self.token()?)
            .query(query)
            .send()
            .await
            .map_err(|e| format!("GitLab request failed: {e}"))?;
        read_json(response).await
    }
}

/// Issue-creation body. GitLab wants labels as one comma-separated string.
#[derive(Serialize)]
struct CreateIssueBody<'a> {
    title: &'a str,
    description: &'a str,
    labels: String,
    weight: u32,
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BoxError> {
    let status = response.status();
    let text = response.text().await.map_err(|e| format!("Failed to read GitLab response: {e}"))?;
    if !status.is_success() {
        return Err(format!("GitLab API error ({}): {text}", status.as_u16()).into());
    }
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse GitLab response: {e}").into())
}

impl IssueTracker for GitLabIssueTracker {
    fn create_issue(&self, project_id: &str, payload: &IssuePayload) -> IssueFuture<'_, CreatedIssue> {
        let project_id = project_id.to_string();
        let payload = payload.clone();

        Box::pin(async move {
            let url = self.project_url(&project_id, &["issues"])?;
            let body = CreateIssueBody {
                title: &payload.title,
                description: &payload.description,
                labels: payload.labels.join(","),
                weight: payload.weight,
            };
            debug!(%url, title = %payload.title, "GitLab POST issue");
            let response = self
                .client
                .post(url)
                .header("PRIVATE-TOKEN", self.token()?)
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("GitLab request failed: {e}"))?;
            read_json::<CreatedIssue>(response).await
        })
    }

    fn project_context(&self, project_id: &str) -> IssueFuture<'_, ProjectContext> {
        let project_id = project_id.to_string();

        Box::pin(async move {
            let issues_url = self.project_url(&project_id, &["issues"])?;
            let existing_issues: Vec<ExistingIssue> = self
                .get_json(issues_url, &[("state", "opened"), ("per_page", PER_PAGE)])
                .await?;
            let members_url = self.project_url(&project_id, &["members", "all"])?;
            let team_members: Vec<TeamMember> =
                self.get_json(members_url, &[("per_page", PER_PAGE)]).await?;
            let milestones_url = self.project_url(&project_id, &["milestones"])?;
            let milestones: Vec<Milestone> = self
                .get_json(milestones_url, &[("state", "active"), ("per_page", PER_PAGE)])
                .await?;
            Ok::<_, BoxError>(ProjectContext { existing_issues, team_members, milestones })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_url_encodes_path_ids() {
        let tracker = GitLabIssueTracker::new("https://gitlab.example.com/", None);
        let url = tracker.project_url("group/project", &["members", "all"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.example.com/api/v4/projects/group%2Fproject/members/all"
        );
    }

    #[test]
    fn project_url_keeps_base_path() {
        let tracker = GitLabIssueTracker::new("https://example.com/gitlab", None);
        let url = tracker.project_url("42", &["issues"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/gitlab/api/v4/projects/42/issues");
    }

    #[tokio::test]
    async fn missing_token_fails_before_any_request() {
        let tracker = GitLabIssueTracker::new("https://gitlab.example.com", None);
        let payload = IssuePayload {
            title: "t".into(),
            description: "d".into(),
            labels: vec![],
            weight: 1,
        };
        let err = tracker.create_issue("42", &payload).await.unwrap_err();
        assert_eq!(err.to_string(), "GITLAB_TOKEN is not set");
    }

    #[test]
    fn create_body_joins_labels() {
        let body = CreateIssueBody {
            title: "t",
            description: "d",
            labels: ["bug", "size:small"].join(","),
            weight: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["labels"], "bug,size:small");
    }
}
