//! `glt extract` command.

use std::path::Path;

use serde::Serialize;

use super::{build_service, load_context, read_description, runtime};
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::extract::IssuePayload;
use crate::service::ProcessOptions;
use crate::task::{ProcessingResult, TaskSpec};

/// Project id used for previews; nothing is sent to the tracker.
const PREVIEW_PROJECT: &str = "preview";

#[derive(Serialize)]
struct TaskPreview<'a> {
    task: &'a TaskSpec,
    payload: IssuePayload,
}

fn previews(result: &ProcessingResult) -> Vec<TaskPreview<'_>> {
    result
        .extracted_tasks
        .iter()
        .map(|task| TaskPreview { task, payload: IssuePayload::from_task(task) })
        .collect()
}

/// Renders `result` in the requested format.
///
/// # Errors
///
/// Returns an error string if serialization fails.
pub fn render(result: &ProcessingResult, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Text => Ok(result.summary()),
        OutputFormat::Json => serde_json::to_string_pretty(&previews(result))
            .map(|json| json + "\n")
            .map_err(|e| format!("Failed to serialize tasks: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(&previews(result))
            .map_err(|e| format!("Failed to serialize tasks: {e}")),
    }
}

/// Execute the `extract` command: run the pipeline as a dry run and print
/// the tasks.
///
/// # Errors
///
/// Returns an error string if the description or context cannot be read,
/// the vocabulary is invalid, or analysis fails.
pub fn run(
    ctx: &ServiceContext,
    config: &Config,
    file: Option<&Path>,
    context: Option<&Path>,
    use_ai: bool,
    format: OutputFormat,
) -> Result<(), String> {
    let description = read_description(file)?;
    let context = load_context(context)?;
    let service = build_service(ctx, config)?;
    let options = ProcessOptions { dry_run: true, use_ai };

    let result = runtime()?
        .block_on(service.process_description(
            PREVIEW_PROJECT,
            &description,
            context.as_ref(),
            options,
        ))
        .map_err(|e| e.to_string())?;

    if result.extracted_tasks.is_empty() {
        eprintln!("No tasks found in the description.");
    }
    print!("{}", render(&result, format)?);
    Ok(())
}
