//! `glt create` command.

use std::fmt::Write as _;
use std::path::Path;

use super::{build_service, load_context, read_description, runtime};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::service::ProcessOptions;
use crate::task::{IssueOutcome, ProcessingResult};

/// Switches for `glt create`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Read project context from the tracker before extracting.
    pub fetch_context: bool,
    /// Analyze with the LLM.
    pub use_ai: bool,
    /// Preview instead of creating.
    pub dry_run: bool,
}

/// One line per outcome, in task order.
#[must_use]
pub fn outcome_report(result: &ProcessingResult) -> String {
    let mut out = String::new();
    for outcome in &result.created_issues {
        let _ = match outcome {
            IssueOutcome::Created { task_title, issue } => {
                writeln!(out, "Created #{}: {task_title} ({})", issue.iid, issue.web_url)
            }
            IssueOutcome::Failed { task_title, error } => {
                writeln!(out, "Failed: {task_title}: {error}")
            }
            IssueOutcome::Preview { task_title } => writeln!(out, "Would create: {task_title}"),
        };
    }
    for edge in &result.dropped_edges {
        let _ = writeln!(
            out,
            "Cycle: {} no longer depends on {}",
            edge.task, edge.dependency
        );
    }
    let _ = writeln!(
        out,
        "\n{} of {} tasks handled, {} failed",
        result.tasks_created(),
        result.total_tasks(),
        result.tasks_failed()
    );
    out
}

/// Execute the `create` command.
///
/// # Errors
///
/// Returns an error string if inputs cannot be read, context cannot be
/// fetched, analysis fails, or any issue could not be created.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    project: &str,
    file: Option<&Path>,
    context_path: Option<&Path>,
    options: CreateOptions,
) -> Result<(), String> {
    let description = read_description(file)?;
    let service = build_service(ctx, config)?;
    let rt = runtime()?;

    let context = if options.fetch_context {
        Some(rt.block_on(service.fetch_context(project)).map_err(|e| e.to_string())?)
    } else {
        load_context(context_path)?
    };

    let process = ProcessOptions { dry_run: options.dry_run, use_ai: options.use_ai };
    let result = rt
        .block_on(service.process_description(project, &description, context.as_ref(), process))
        .map_err(|e| e.to_string())?;

    if result.extracted_tasks.is_empty() {
        println!("No tasks found in the description.");
        return Ok(());
    }
    print!("{}", outcome_report(&result));

    match result.tasks_failed() {
        0 => Ok(()),
        failed => Err(format!("{failed} of {} issues could not be created", result.total_tasks())),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::ports::CreatedIssue;
    use crate::task::TaskSpec;

    #[test]
    fn report_lists_each_outcome() {
        let mut result = ProcessingResult::new("d", Utc::now());
        result.extracted_tasks = vec![TaskSpec::new("Build API", "d"), TaskSpec::new("Ship UI", "d")];
        result.created_issues = vec![
            IssueOutcome::Created {
                task_title: "Build API".into(),
                issue: CreatedIssue {
                    id: 100,
                    iid: 7,
                    title: "Build API".into(),
                    web_url: "https://gitlab.example.com/g/p/-/issues/7".into(),
                },
            },
            IssueOutcome::Failed { task_title: "Ship UI".into(), error: "403 Forbidden".into() },
        ];

        let report = outcome_report(&result);
        assert!(report.contains("Created #7: Build API (https://gitlab.example.com/g/p/-/issues/7)"));
        assert!(report.contains("Failed: Ship UI: 403 Forbidden"));
        assert!(report.contains("1 of 2 tasks handled, 1 failed"));
    }

    #[test]
    fn report_marks_previews() {
        let mut result = ProcessingResult::new("d", Utc::now());
        result.extracted_tasks = vec![TaskSpec::new("Write docs", "d")];
        result.created_issues = vec![IssueOutcome::Preview { task_title: "Write docs".into() }];
        assert!(outcome_report(&result).starts_with("Would create: Write docs"));
    }

    #[test]
    fn report_names_dropped_cycle_edges() {
        let mut result = ProcessingResult::new("d", Utc::now());
        result.extracted_tasks = vec![TaskSpec::new("A", "d"), TaskSpec::new("B", "d")];
        result.dropped_edges = vec![crate::extract::DroppedEdge {
            task: "B".into(),
            dependency: "A".into(),
        }];
        assert!(outcome_report(&result).contains("Cycle: B no longer depends on A"));
    }
}
