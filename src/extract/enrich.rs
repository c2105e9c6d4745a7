//! Optional enrichment from project context.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::ConfigError;
use crate::task::TaskSpec;

/// Titles more similar than this are linked as related issues.
pub const RELATED_ISSUE_THRESHOLD: f64 = 0.8;

/// An issue that already exists in the project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistingIssue {
    /// Project-scoped issue number.
    pub iid: u64,
    /// Issue title.
    pub title: String,
}

/// A project member who may be suggested as assignee.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    /// Login name, used as the assignee hint.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Free-text profile bio. GitLab sends `null` for members without one.
    #[serde(deserialize_with = "null_as_empty")]
    pub bio: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A project milestone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Milestone {
    /// Milestone title, used as the milestone hint.
    pub title: String,
    /// Tracker state; only `active` milestones are suggested.
    pub state: String,
}

/// Everything enrichment knows about the target project. Every section
/// may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContext {
    /// Open issues, compared against new task titles.
    pub existing_issues: Vec<ExistingIssue>,
    /// Candidate assignees.
    pub team_members: Vec<TeamMember>,
    /// Candidate milestones.
    pub milestones: Vec<Milestone>,
}

impl ProjectContext {
    /// Reads a context bundle from a YAML or JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&raw).map_err(ConfigError::Yaml)
    }

    /// True when no section has any entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.existing_issues.is_empty() && self.team_members.is_empty() && self.milestones.is_empty()
    }
}

/// Jaccard similarity of the lowercase word sets of `a` and `b`; zero when
/// either is empty.
#[must_use]
pub fn jaccard(a: &str, b: &str) -> f64 {
    let words_a: HashSet<String> = a.split_whitespace().map(str::to_lowercase).collect();
    let words_b: HashSet<String> = b.split_whitespace().map(str::to_lowercase).collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let shared = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    #[allow(clippy::cast_precision_loss)]
    let score = shared as f64 / union as f64;
    score
}

/// Appends context-derived hints to tasks. Only ever adds information.
#[derive(Debug, Clone, Copy)]
pub struct ContextEnricher<'c> {
    context: &'c ProjectContext,
}

impl<'c> ContextEnricher<'c> {
    /// Creates an enricher over `context`.
    #[must_use]
    pub fn new(context: &'c ProjectContext) -> Self {
        Self { context }
    }

    /// Links near-duplicate issues, and suggests an assignee and a milestone.
    pub fn enrich(&self, tasks: &mut [TaskSpec]) {
        let active_milestone = self
            .context
            .milestones
            .iter()
            .find(|m| m.state == "active")
            .map(|m| m.title.clone());

        for task in tasks.iter_mut() {
            for issue in &self.context.existing_issues {
                if jaccard(&task.title, &issue.title) > RELATED_ISSUE_THRESHOLD {
                    task.description
                        .push_str(&format!("\n\n## Related Issue\n- #{}: {}", issue.iid, issue.title));
                }
            }

            if let Some(member) = self.expert_for(task) {
                task.assignee_hint = Some(member.username.clone());
            }

            if active_milestone.is_some() {
                task.milestone_hint.clone_from(&active_milestone);
            }
        }
    }

    fn expert_for(&self, task: &TaskSpec) -> Option<&'c TeamMember> {
        if task.technologies.is_empty() {
            return None;
        }
        self.context.team_members.iter().find(|member| {
            let name = member.name.to_lowercase();
            let bio = member.bio.to_lowercase();
            task.technologies.iter().any(|tech| name.contains(tech.as_str()) || bio.contains(tech.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ProjectContext {
        serde_yaml::from_str(
            r"
existing_issues:
  - iid: 42
    title: Add OAuth login support
team_members:
  - username: ada
    name: Ada
    bio: Frontend and React
  - username: linus
    name: Linus
    bio: Python backend, Docker
  - username: grace
    name: Grace
    bio: python everything
milestones:
  - title: v1.0
    state: closed
  - title: v1.1
    state: active
  - title: v1.2
    state: active
",
        )
        .unwrap()
    }

    #[test]
    fn jaccard_on_word_sets() {
        assert!((jaccard("add login", "Add Login") - 1.0).abs() < f64::EPSILON);
        assert!((jaccard("a b", "b c") - 1.0 / 3.0).abs() < 1e-9);
        assert!(jaccard("", "anything").abs() < f64::EPSILON);
    }

    #[test]
    fn links_near_duplicate_issue() {
        let mut tasks = vec![TaskSpec::new("Add OAuth login support", "desc")];
        ContextEnricher::new(&context()).enrich(&mut tasks);
        assert!(tasks[0]
            .description
            .ends_with("\n\n## Related Issue\n- #42: Add OAuth login support"));
    }

    #[test]
    fn does_not_link_loosely_similar_issue() {
        let mut tasks = vec![TaskSpec::new("Add SAML login", "desc")];
        ContextEnricher::new(&context()).enrich(&mut tasks);
        assert_eq!(tasks[0].description, "desc");
    }

    #[test]
    fn first_matching_member_becomes_assignee() {
        let mut task = TaskSpec::new("Ship the API", "desc");
        task.technologies = vec!["python".into()];
        let mut tasks = vec![task];
        ContextEnricher::new(&context()).enrich(&mut tasks);
        assert_eq!(tasks[0].assignee_hint.as_deref(), Some("linus"));
    }

    #[test]
    fn no_technologies_means_no_assignee() {
        let mut tasks = vec![TaskSpec::new("Ship the API", "desc")];
        ContextEnricher::new(&context()).enrich(&mut tasks);
        assert_eq!(tasks[0].assignee_hint, None);
    }

    #[test]
    fn first_active_milestone_is_suggested() {
        let mut tasks = vec![TaskSpec::new("Ship the API", "desc")];
        ContextEnricher::new(&context()).enrich(&mut tasks);
        assert_eq!(tasks[0].milestone_hint.as_deref(), Some("v1.1"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let partial: ProjectContext = serde_json::from_str(r#"{"milestones": [{"title": "m"}]}"#).unwrap();
        assert!(partial.existing_issues.is_empty());
        assert_eq!(partial.milestones[0].state, "");

        let mut tasks = vec![TaskSpec::new("Anything", "desc")];
        ContextEnricher::new(&partial).enrich(&mut tasks);
        assert_eq!(tasks[0], TaskSpec::new("Anything", "desc"));
    }

    #[test]
    fn reads_gitlab_member_records() {
        let members: Vec<TeamMember> = serde_json::from_str(
            r#"[{"id": 1, "username": "ada", "name": "Ada", "bio": null, "state": "active"},
                {"id": 2, "username": "linus", "name": "Linus"}]"#,
        )
        .unwrap();
        assert_eq!(members[0].bio, "");
        assert_eq!(members[1].username, "linus");
    }
}
