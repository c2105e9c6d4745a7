//! Structured AI analysis and response parsing.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::task::{push_unique, MAX_TITLE_CHARS};

/// One task suggested by the model. Enum-valued fields stay raw strings
/// here and are validated when mapped to a task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestedTask {
    /// Proposed title.
    pub title: Option<String>,
    /// Proposed description.
    pub description: String,
    /// Proposed type name.
    #[serde(rename = "type")]
    pub task_type: Option<String>,
    /// Proposed priority name.
    pub priority: Option<String>,
    /// Proposed size name.
    pub size: Option<String>,
    /// Titles of suggested prerequisite tasks.
    pub dependencies: Vec<String>,
    /// Suggested labels.
    pub labels: Vec<String>,
    /// Technologies the task involves.
    pub technologies: Vec<String>,
}

/// What the AI collaborator made of a description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiAnalysis {
    /// One-paragraph summary.
    pub summary: String,
    /// Primary goal.
    pub main_objective: String,
    /// Secondary goals.
    pub sub_objectives: Vec<String>,
    /// Task breakdown.
    pub suggested_tasks: Vec<SuggestedTask>,
    /// Milestone names.
    pub suggested_milestones: Vec<String>,
    /// Union of all task labels.
    pub suggested_labels: Vec<String>,
    /// 0 (simple) to 1 (most complex).
    pub complexity_score: f64,
    /// Identified risks.
    pub risk_factors: Vec<String>,
    /// Assumptions the model made.
    pub assumptions: Vec<String>,
    /// Union of all task technologies.
    pub mentioned_technologies: Vec<String>,
    /// Model that produced the analysis.
    pub ai_model: String,
    /// Confidence assigned to tasks derived from this analysis.
    pub confidence_score: f64,
}

impl Default for AiAnalysis {
    fn default() -> Self {
        Self {
            summary: String::new(),
            main_objective: String::new(),
            sub_objectives: Vec::new(),
            suggested_tasks: Vec::new(),
            suggested_milestones: Vec::new(),
            suggested_labels: Vec::new(),
            complexity_score: 0.5,
            risk_factors: Vec::new(),
            assumptions: Vec::new(),
            mentioned_technologies: Vec::new(),
            ai_model: String::new(),
            confidence_score: 0.0,
        }
    }
}

/// Summary recorded when the response had to be read as plain text.
pub const TEXT_FALLBACK_SUMMARY: &str = "Parsed from text response";

/// Parses a model response.
///
/// JSON is accepted bare or inside a Markdown code fence. Anything else is
/// scanned for bullet and numbered lines, each becoming a medium task.
#[must_use]
pub fn parse_analysis(response: &str) -> AiAnalysis {
    match serde_json::from_str::<AiAnalysis>(json_body(response)) {
        Ok(mut analysis) => {
            for task in &analysis.suggested_tasks {
                for label in &task.labels {
                    push_unique(&mut analysis.suggested_labels, label.clone());
                }
                for tech in &task.technologies {
                    push_unique(&mut analysis.mentioned_technologies, tech.clone());
                }
            }
            analysis
        }
        Err(err) => {
            warn!(error = %err, "AI response is not JSON, falling back to text parsing");
            parse_text(response)
        }
    }
}

fn json_body(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.split_once('\n').map_or("", |(_, body)| body);
        return body.rfind("```").map_or(body, |end| &body[..end]).trim();
    }
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

/// Content of a bullet (`-`, `*`, `•`) or numbered (`1.`) line.
fn list_item(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if let Some(rest) = trimmed.strip_prefix(['-', '*', '•']) {
        return Some(rest.trim());
    }
    let head: String = trimmed.chars().take(3).collect();
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) && head.contains('.') {
        let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());
        return Some(rest.strip_prefix('.').unwrap_or(rest).trim());
    }
    None
}

fn parse_text(response: &str) -> AiAnalysis {
    let suggested_tasks = response
        .lines()
        .filter_map(list_item)
        .filter(|text| !text.is_empty())
        .map(|text| SuggestedTask {
            title: Some(text.chars().take(MAX_TITLE_CHARS).collect()),
            description: text.to_string(),
            task_type: Some("task".into()),
            priority: Some("medium".into()),
            size: Some("medium".into()),
            ..SuggestedTask::default()
        })
        .collect();

    AiAnalysis {
        summary: TEXT_FALLBACK_SUMMARY.to_string(),
        main_objective: "Complete the described tasks".to_string(),
        suggested_tasks,
        ..AiAnalysis::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: &str = r#"{
        "summary": "Add SSO",
        "main_objective": "Single sign-on",
        "suggested_tasks": [
            {"title": "Configure OAuth app", "type": "task", "priority": "high",
             "labels": ["auth"], "technologies": ["oauth"]},
            {"title": "Login button", "type": "feature", "labels": ["ui", "auth"]}
        ],
        "complexity_score": 0.7
    }"#;

    #[test]
    fn parses_bare_json_and_collects_labels() {
        let analysis = parse_analysis(JSON);
        assert_eq!(analysis.summary, "Add SSO");
        assert_eq!(analysis.suggested_tasks.len(), 2);
        assert_eq!(analysis.suggested_tasks[1].task_type.as_deref(), Some("feature"));
        assert_eq!(analysis.suggested_labels, vec!["auth", "ui"]);
        assert_eq!(analysis.mentioned_technologies, vec!["oauth"]);
        assert!((analysis.complexity_score - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_fenced_json() {
        let fenced = format!("Here you go:\n```json\n{JSON}\n```\n");
        assert_eq!(parse_analysis(&fenced).suggested_tasks.len(), 2);
        let fenced = format!("```json\n{JSON}\n```");
        assert_eq!(parse_analysis(&fenced).summary, "Add SSO");
    }

    #[test]
    fn text_fallback_reads_list_lines() {
        let analysis = parse_analysis(
            "Plan:\n- Set up CI\n* Write smoke tests\n1. Ship it\nno list marker here\n-\n",
        );
        assert_eq!(analysis.summary, TEXT_FALLBACK_SUMMARY);
        let titles: Vec<_> =
            analysis.suggested_tasks.iter().map(|t| t.title.clone().unwrap_or_default()).collect();
        assert_eq!(titles, vec!["Set up CI", "Write smoke tests", "Ship it"]);
        assert!(analysis
            .suggested_tasks
            .iter()
            .all(|t| t.size.as_deref() == Some("medium") && t.task_type.as_deref() == Some("task")));
    }

    #[test]
    fn text_fallback_truncates_titles() {
        let line = format!("- {}", "x".repeat(120));
        let analysis = parse_analysis(&line);
        let task = &analysis.suggested_tasks[0];
        assert_eq!(task.title.as_deref().map(str::len), Some(MAX_TITLE_CHARS));
        assert_eq!(task.description.len(), 120);
    }
}
