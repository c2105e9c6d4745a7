//! Converts an [`AiAnalysis`] into task specs.

use super::analysis::{AiAnalysis, SuggestedTask};
use crate::extract::clamp_title;
use crate::task::{Category, ExtractionMethod, Priority, Size, TaskSpec, TaskType};

fn parse_or_default<T: Default>(value: Option<&str>, parse: fn(&str) -> Option<T>) -> T {
    value.and_then(parse).unwrap_or_default()
}

fn has_label(labels: &[String], wanted: &[&str]) -> bool {
    labels.iter().any(|label| wanted.contains(&label.as_str()))
}

/// Category for a model-suggested task. The type decides first, then the
/// title, then the labels the model attached.
fn ai_category(task_type: TaskType, title: &str, labels: &[String]) -> Category {
    let title = title.to_lowercase();
    match task_type {
        TaskType::Bug => Category::Bugfix,
        TaskType::Documentation => Category::Documentation,
        TaskType::Research => Category::Research,
        _ if title.contains("test") || has_label(labels, &["testing"]) => Category::Testing,
        _ if title.contains("design") || has_label(labels, &["ui", "ux"]) => Category::Design,
        _ if has_label(labels, &["infrastructure", "devops"]) => Category::Infrastructure,
        _ => Category::Implementation,
    }
}

fn to_task(index: usize, suggested: &SuggestedTask, analysis: &AiAnalysis, source: &str) -> TaskSpec {
    let title = suggested
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("Task {}", index + 1), clamp_title);

    let mut task = TaskSpec::new(title, suggested.description.clone());
    task.task_type = parse_or_default(suggested.task_type.as_deref(), TaskType::parse);
    task.priority = parse_or_default(suggested.priority.as_deref(), Priority::parse);
    task.size = parse_or_default(suggested.size.as_deref(), Size::parse);
    task.category = ai_category(task.task_type, &task.title, &suggested.labels);
    task.dependencies.clone_from(&suggested.dependencies);
    task.labels.clone_from(&suggested.labels);
    task.technologies.clone_from(&suggested.technologies);
    task.confidence_score = analysis.confidence_score;
    task.source_text = Some(source.to_string());
    task.extraction_method = ExtractionMethod::Ai;
    task.refresh_labels();
    task
}

/// Maps every suggested task in `analysis` to a [`TaskSpec`] tagged
/// [`ExtractionMethod::Ai`], in the order the model gave them.
#[must_use]
pub fn tasks_from_analysis(analysis: &AiAnalysis, description: &str) -> Vec<TaskSpec> {
    analysis
        .suggested_tasks
        .iter()
        .enumerate()
        .map(|(i, suggested)| to_task(i, suggested, analysis, description))
        .collect()
}
