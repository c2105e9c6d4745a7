//! Core extracted-task type.

use serde::{Deserialize, Serialize};

use super::kind::{Category, ExtractionMethod, Priority, Size, TaskType};

/// Longest title, in characters, the tracker will receive.
pub const MAX_TITLE_CHARS: usize = 80;

/// A single unit of work extracted from free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Short human-readable title; never empty, at most [`MAX_TITLE_CHARS`].
    pub title: String,
    /// Free text, possibly with generated subsections.
    pub description: String,
    /// Kind of work.
    #[serde(default)]
    pub task_type: TaskType,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Organizational bucket.
    #[serde(default)]
    pub category: Category,
    /// Effort estimate.
    #[serde(default)]
    pub size: Size,
    /// Titles of tasks that must be created first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Titles of batch tasks that depend on this one. Filled in by
    /// dependency ordering.
    #[serde(default)]
    pub blocks: Vec<String>,
    /// Title of the task this one is a subtask of.
    #[serde(default)]
    pub parent_task: Option<String>,
    /// Tracker labels, unique, in insertion order.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Detected technology names.
    #[serde(default)]
    pub technologies: Vec<String>,
    /// Detected system components.
    #[serde(default)]
    pub components: Vec<String>,
    /// Suggested assignee username. Advisory only.
    #[serde(default)]
    pub assignee_hint: Option<String>,
    /// Suggested milestone title. Advisory only.
    #[serde(default)]
    pub milestone_hint: Option<String>,
    /// First raw deadline phrase found in the source text.
    #[serde(default)]
    pub due_date_hint: Option<String>,
    /// Certainty of the extraction, in `[0, 1]`.
    #[serde(default = "full_confidence")]
    pub confidence_score: f64,
    /// Excerpt of the input this task was extracted from.
    #[serde(default)]
    pub source_text: Option<String>,
    /// Provenance tag.
    #[serde(default)]
    pub extraction_method: ExtractionMethod,
}

fn full_confidence() -> f64 {
    1.0
}

impl TaskSpec {
    /// Creates a task with default classification and full confidence.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            task_type: TaskType::default(),
            priority: Priority::default(),
            category: Category::default(),
            size: Size::default(),
            dependencies: Vec::new(),
            blocks: Vec::new(),
            parent_task: None,
            labels: Vec::new(),
            technologies: Vec::new(),
            components: Vec::new(),
            assignee_hint: None,
            milestone_hint: None,
            due_date_hint: None,
            confidence_score: full_confidence(),
            source_text: None,
            extraction_method: ExtractionMethod::default(),
        }
    }

    /// Labels every task carries: type, category, size, technology tags,
    /// and a priority tag when priority is high or critical.
    #[must_use]
    pub fn standard_labels(&self) -> Vec<String> {
        let mut labels = vec![
            self.task_type.as_str().to_string(),
            self.category.as_str().to_string(),
            format!("size:{}", self.size),
        ];
        for tech in &self.technologies {
            push_unique(&mut labels, format!("tech:{tech}"));
        }
        if matches!(self.priority, Priority::High | Priority::Critical) {
            labels.push(format!("priority:{}", self.priority));
        }
        labels
    }

    /// Replaces `labels` with the current labels merged with [`Self::standard_labels`].
    pub fn refresh_labels(&mut self) {
        let mut labels = std::mem::take(&mut self.labels);
        for label in self.standard_labels() {
            push_unique(&mut labels, label);
        }
        self.labels = labels;
    }
}

/// Appends `value` unless an equal element is already present.
pub(crate) fn push_unique(items: &mut Vec<String>, value: String) {
    if !items.contains(&value) {
        items.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_labels_always_carry_type_category_and_size() {
        let task = TaskSpec::new("Add login", "Add login");
        let labels = task.standard_labels();
        assert!(labels.contains(&"task".to_string()));
        assert!(labels.contains(&"implementation".to_string()));
        assert!(labels.contains(&"size:medium".to_string()));
        assert!(!labels.iter().any(|l| l.starts_with("priority:")));
    }

    #[test]
    fn priority_label_only_for_high_and_critical() {
        for priority in Priority::ALL {
            let mut task = TaskSpec::new("t", "d");
            task.priority = *priority;
            let has_label = task.standard_labels().contains(&format!("priority:{priority}"));
            assert_eq!(has_label, matches!(priority, Priority::High | Priority::Critical));
        }
    }

    #[test]
    fn refresh_labels_keeps_existing_and_deduplicates() {
        let mut task = TaskSpec::new("t", "d");
        task.labels = vec!["backend".into(), "task".into()];
        task.technologies = vec!["rust".into()];
        task.refresh_labels();
        assert_eq!(
            task.labels,
            vec!["backend", "task", "implementation", "size:medium", "tech:rust"]
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let task: TaskSpec =
            serde_yaml::from_str("title: Setup database\ndescription: Setup database\n").unwrap();
        assert_eq!(task.task_type, TaskType::Task);
        assert!((task.confidence_score - 1.0).abs() < f64::EPSILON);
        assert_eq!(task.extraction_method, ExtractionMethod::Pattern);
    }
}
