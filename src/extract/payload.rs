//! Issue-creation payloads.

use serde::{Deserialize, Serialize};

use crate::task::{push_unique, TaskSpec};

/// The request body sent to the issue tracker for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePayload {
    /// Issue title.
    pub title: String,
    /// Markdown body.
    pub description: String,
    /// Unique labels, in first-seen order.
    pub labels: Vec<String>,
    /// Effort weight from the task size.
    pub weight: u32,
}

impl IssuePayload {
    /// Builds the payload for `task`.
    ///
    /// The description gets `Dependencies`, `Technologies`, `Components`
    /// and `Extracted from` sections when the task has that data.
    #[must_use]
    pub fn from_task(task: &TaskSpec) -> Self {
        let mut parts = vec![task.description.clone()];
        if !task.dependencies.is_empty() {
            parts.push("\n## Dependencies".to_string());
            parts.extend(task.dependencies.iter().map(|dep| format!("- [ ] {dep}")));
        }
        if !task.technologies.is_empty() {
            parts.push(format!("\n## Technologies\n{}", task.technologies.join(", ")));
        }
        if !task.components.is_empty() {
            parts.push(format!("\n## Components\n{}", task.components.join(", ")));
        }
        if let Some(source) = &task.source_text {
            let quoted: Vec<String> = source.lines().map(|line| format!("> {line}")).collect();
            parts.push(format!("\n## Extracted from\n{}", quoted.join("\n")));
        }

        let mut labels = task.labels.clone();
        for label in task.standard_labels() {
            push_unique(&mut labels, label);
        }

        Self {
            title: task.title.clone(),
            description: parts.join("\n"),
            labels,
            weight: task.size.weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Size, TaskType};

    #[test]
    fn plain_task_payload() {
        let task = TaskSpec::new("Add export", "Add export");
        let payload = IssuePayload::from_task(&task);
        assert_eq!(payload.title, "Add export");
        assert_eq!(payload.description, "Add export");
        assert_eq!(payload.labels, vec!["task", "implementation", "size:medium"]);
        assert_eq!(payload.weight, 3);
    }

    #[test]
    fn description_sections_in_order() {
        let mut task = TaskSpec::new("Cache layer", "Build the cache layer");
        task.dependencies = vec!["Setup Redis".into()];
        task.technologies = vec!["redis".into(), "rust".into()];
        task.components = vec!["cache".into()];
        task.source_text = Some("build the cache layer".into());

        let payload = IssuePayload::from_task(&task);
        assert_eq!(
            payload.description,
            "Build the cache layer\n\n## Dependencies\n- [ ] Setup Redis\n\n## Technologies\nredis, rust\
             \n\n## Components\ncache\n\n## Extracted from\n> build the cache layer"
        );
    }

    #[test]
    fn labels_merge_without_duplicates() {
        let mut task = TaskSpec::new("Crash on save", "Crash on save");
        task.task_type = TaskType::Bug;
        task.priority = Priority::Critical;
        task.size = Size::Xlarge;
        task.labels = vec!["bug".into(), "customer".into()];

        let payload = IssuePayload::from_task(&task);
        assert_eq!(
            payload.labels,
            vec!["bug", "customer", "implementation", "size:xlarge", "priority:critical"]
        );
        assert_eq!(payload.weight, 13);
    }

    #[test]
    fn low_priority_gets_no_priority_label() {
        let mut task = TaskSpec::new("Tidy", "Tidy");
        task.priority = Priority::Low;
        let payload = IssuePayload::from_task(&task);
        assert!(!payload.labels.iter().any(|l| l.starts_with("priority:")));
    }

    #[test]
    fn multi_line_source_is_quoted_line_by_line() {
        let mut task = TaskSpec::new("Quarterly cleanup", "Quarterly cleanup");
        task.source_text = Some("Numbers look odd.\nSomeone should check them.".into());
        let payload = IssuePayload::from_task(&task);
        assert!(payload
            .description
            .ends_with("## Extracted from\n> Numbers look odd.\n> Someone should check them."));
    }
}
