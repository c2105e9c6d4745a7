//! Outcome of processing one description.

use std::fmt::Write as _;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::task_spec::TaskSpec;
use crate::ai::AiAnalysis;
use crate::extract::{Analysis, DroppedEdge};
use crate::ports::CreatedIssue;

/// What happened to one task when handed to the issue tracker.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IssueOutcome {
    /// The tracker created an issue.
    Created {
        /// Title of the task the issue was created from.
        task_title: String,
        /// The created issue record.
        issue: CreatedIssue,
    },
    /// The tracker rejected the task or could not be reached.
    Failed {
        /// Title of the task that failed.
        task_title: String,
        /// Human-readable error.
        error: String,
    },
    /// Dry run: nothing was sent.
    Preview {
        /// Title of the previewed task.
        task_title: String,
    },
}

impl IssueOutcome {
    /// Previews count as successes; only `Failed` is a failure.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Title of the task this outcome refers to.
    #[must_use]
    pub fn task_title(&self) -> &str {
        match self {
            Self::Created { task_title, .. }
            | Self::Failed { task_title, .. }
            | Self::Preview { task_title } => task_title,
        }
    }
}

/// Analysis record kept alongside the result for inspection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProcessingMetadata {
    /// Nothing was analyzed (empty input).
    None,
    /// Output of the pattern analyzer.
    Pattern(Analysis),
    /// Output of the AI analysis collaborator.
    Ai(AiAnalysis),
}

/// Everything produced by one `process_description` call.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    /// Identifier for log correlation.
    pub run_id: Uuid,
    /// Input text as received.
    pub original_description: String,
    /// Tasks in dependency order.
    pub extracted_tasks: Vec<TaskSpec>,
    /// One entry per task handed to the tracker (or previewed).
    pub created_issues: Vec<IssueOutcome>,
    /// Dependency edges ignored to break cycles while ordering.
    pub dropped_edges: Vec<DroppedEdge>,
    /// Analysis that produced the tasks.
    pub metadata: ProcessingMetadata,
    /// When processing began.
    pub started_at: DateTime<Utc>,
    /// When processing finished.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProcessingResult {
    /// Starts an empty result for `description`.
    #[must_use]
    pub fn new(description: &str, started_at: DateTime<Utc>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            original_description: description.to_string(),
            extracted_tasks: Vec::new(),
            created_issues: Vec::new(),
            dropped_edges: Vec::new(),
            metadata: ProcessingMetadata::None,
            started_at,
            completed_at: None,
        }
    }

    /// Number of extracted tasks.
    #[must_use]
    pub fn total_tasks(&self) -> usize {
        self.extracted_tasks.len()
    }

    /// Number of successful outcomes.
    #[must_use]
    pub fn tasks_created(&self) -> usize {
        self.created_issues.iter().filter(|o| o.is_success()).count()
    }

    /// Number of failed outcomes.
    #[must_use]
    pub fn tasks_failed(&self) -> usize {
        self.created_issues.iter().filter(|o| !o.is_success()).count()
    }

    /// Wall time between start and completion; zero while still running.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.completed_at.map_or_else(Duration::zero, |done| done - self.started_at)
    }

    /// Renders a Markdown report of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        #[allow(clippy::cast_precision_loss)]
        let seconds = self.duration().num_milliseconds() as f64 / 1000.0;

        let mut out = String::new();
        let _ = writeln!(out, "# Task Extraction Summary");
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "**Original Description Length**: {} characters",
            self.original_description.chars().count()
        );
        let _ = writeln!(out, "**Processing Time**: {seconds:.2} seconds");
        let _ = writeln!(out, "**Total Tasks Extracted**: {}", self.total_tasks());
        let _ = writeln!(out, "**Tasks Created**: {}", self.tasks_created());
        let _ = writeln!(out, "**Tasks Failed**: {}", self.tasks_failed());
        let _ = writeln!(out);
        let _ = writeln!(out, "## Extracted Tasks:");

        for (i, task) in self.extracted_tasks.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}. **{}**", i + 1, task.title);
            let _ = writeln!(out, "   - Type: {}", task.task_type);
            let _ = writeln!(out, "   - Priority: {}", task.priority);
            let _ = writeln!(out, "   - Size: {}", task.size);
            if !task.dependencies.is_empty() {
                let _ = writeln!(out, "   - Dependencies: {}", task.dependencies.join(", "));
            }
        }

        if !self.dropped_edges.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "## Dropped Dependencies (cycles):");
            for edge in &self.dropped_edges {
                let _ = writeln!(out, "- {} no longer depends on {}", edge.task, edge.dependency);
            }
        }

        let failures: Vec<_> = self
            .created_issues
            .iter()
            .filter_map(|o| match o {
                IssueOutcome::Failed { task_title, error } => Some((task_title, error)),
                _ => None,
            })
            .collect();
        if !failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "## Failures:");
            for (title, error) in failures {
                let _ = writeln!(out, "- {title}: {error}");
            }
        }

        out
    }
}
