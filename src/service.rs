//! End-to-end processing of one free-text description.
//!
//! analyze (pattern or AI) → extract → enrich → order → preview or create.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Write as _;

use tracing::{info, warn};

use crate::ai::{analyze_with_llm, tasks_from_analysis};
use crate::context::ServiceContext;
use crate::extract::{
    order_by_dependencies, ContextEnricher, IssuePayload, PatternAnalyzer, PatternTable,
    ProjectContext, TaskExtractor,
};
use crate::ports::CreatedIssue;
use crate::task::{IssueOutcome, ProcessingMetadata, ProcessingResult, TaskSpec};

/// Errors that abort a whole run. Per-task creation failures are not
/// errors; they are recorded as [`IssueOutcome::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The AI analysis request failed.
    #[error("AI analysis failed: {0}")]
    Analyzer(#[source] Box<dyn Error + Send + Sync>),

    /// Project context could not be fetched from the tracker.
    #[error("failed to fetch project context: {0}")]
    ContextFetch(#[source] Box<dyn Error + Send + Sync>),

    /// AI analysis was requested but no model is configured.
    #[error("AI analysis requested but no model is configured")]
    AiUnavailable,
}

/// Switches for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Preview tasks instead of creating issues.
    pub dry_run: bool,
    /// Analyze with the LLM instead of the pattern tables.
    pub use_ai: bool,
}

/// Turns descriptions into ordered tasks and, unless previewing, issues.
pub struct NlpIssueService<'c> {
    ctx: &'c ServiceContext,
    table: PatternTable,
    ai_model: Option<String>,
}

impl<'c> NlpIssueService<'c> {
    /// Creates a service using the ports in `ctx`, the compiled pattern
    /// `table`, and `ai_model` for the AI path (`None` disables it).
    #[must_use]
    pub fn new(ctx: &'c ServiceContext, table: PatternTable, ai_model: Option<String>) -> Self {
        Self { ctx, table, ai_model }
    }

    /// Pattern table shared by the analyzer and extractor.
    #[must_use]
    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Fetches open issues, members and active milestones of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::ContextFetch`] if the tracker lookup fails.
    pub async fn fetch_context(&self, project_id: &str) -> Result<ProjectContext, ProcessError> {
        self.ctx.issues.project_context(project_id).await.map_err(ProcessError::ContextFetch)
    }

    /// Processes `description` for `project_id`.
    ///
    /// Whitespace-only input yields an empty result. With `context`, tasks
    /// get related-issue links and assignee and milestone hints. Tasks are
    /// ordered so dependencies come first.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessError::AiUnavailable`] when `use_ai` is set without a
    /// model, and [`ProcessError::Analyzer`] when the LLM call fails.
    pub async fn process_description(
        &self,
        project_id: &str,
        description: &str,
        context: Option<&ProjectContext>,
        options: ProcessOptions,
    ) -> Result<ProcessingResult, ProcessError> {
        let mut result = ProcessingResult::new(description, self.ctx.clock.now());

        if description.trim().is_empty() {
            info!(run_id = %result.run_id, "empty description, nothing to extract");
            result.completed_at = Some(self.ctx.clock.now());
            return Ok(result);
        }

        let mut tasks = if options.use_ai {
            let model = self.ai_model.as_deref().ok_or(ProcessError::AiUnavailable)?;
            let analysis = analyze_with_llm(self.ctx.llm.as_ref(), model, description, context)
                .await
                .map_err(ProcessError::Analyzer)?;
            let tasks = tasks_from_analysis(&analysis, description);
            result.metadata = ProcessingMetadata::Ai(analysis);
            tasks
        } else {
            let analysis = PatternAnalyzer::new(&self.table).analyze(description);
            let tasks = TaskExtractor::new(&self.table).extract(description, &analysis);
            result.metadata = ProcessingMetadata::Pattern(analysis);
            tasks
        };

        if let Some(context) = context {
            ContextEnricher::new(context).enrich(&mut tasks);
        }

        let ordered = order_by_dependencies(tasks);
        result.extracted_tasks = ordered.order;
        result.dropped_edges = ordered.dropped_edges;

        result.created_issues = if options.dry_run {
            result
                .extracted_tasks
                .iter()
                .map(|task| IssueOutcome::Preview { task_title: task.title.clone() })
                .collect()
        } else {
            self.create_issues(project_id, &result.extracted_tasks).await
        };

        result.completed_at = Some(self.ctx.clock.now());
        info!(
            run_id = %result.run_id,
            total = result.total_tasks(),
            created = result.tasks_created(),
            failed = result.tasks_failed(),
            dropped_edges = result.dropped_edges.len(),
            "processed description"
        );
        Ok(result)
    }

    async fn create_issues(&self, project_id: &str, tasks: &[TaskSpec]) -> Vec<IssueOutcome> {
        let mut created: HashMap<&str, CreatedIssue> = HashMap::new();
        let mut outcomes = Vec::with_capacity(tasks.len());

        for task in tasks {
            let mut payload = IssuePayload::from_task(task);
            append_dependency_links(&mut payload, task, &created);

            match self.ctx.issues.create_issue(project_id, &payload).await {
                Ok(issue) => {
                    info!(iid = issue.iid, title = %issue.title, "created issue");
                    created.insert(task.title.as_str(), issue.clone());
                    outcomes.push(IssueOutcome::Created { task_title: task.title.clone(), issue });
                }
                Err(err) => {
                    warn!(task = %task.title, error = %err, "failed to create issue");
                    outcomes.push(IssueOutcome::Failed {
                        task_title: task.title.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }
        outcomes
    }
}

/// Links already-created prerequisites by `#iid` in the issue body.
fn append_dependency_links(
    payload: &mut IssuePayload,
    task: &TaskSpec,
    created: &HashMap<&str, CreatedIssue>,
) {
    let links: Vec<&CreatedIssue> =
        task.dependencies.iter().filter_map(|dep| created.get(dep.as_str())).collect();
    if links.is_empty() {
        return;
    }
    payload.description.push_str("\n\n## Dependencies");
    for issue in links {
        let _ = write!(payload.description, "\n- Depends on #{}: {}", issue.iid, issue.title);
    }
}
