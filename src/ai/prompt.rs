//! Prompt text for the task-breakdown request.

use crate::extract::ProjectContext;

/// Most team member names mentioned in the prompt.
const MAX_PROMPT_MEMBERS: usize = 5;

/// Instructions describing the expected JSON reply.
pub const SYSTEM_PROMPT: &str = r#"You are an expert project manager and software engineer. Your task is to analyze natural language descriptions
of project requirements and break them down into specific, actionable tasks suitable for GitLab issue tracking.

For each task you identify, determine:
1. A clear, concise title (max 80 characters)
2. The task type (feature, bug, task, documentation, research)
3. Priority level (critical, high, medium, low)
4. Estimated size (small: 1-2 hours, medium: 2-8 hours, large: 1-3 days, xlarge: 3+ days)
5. Any dependencies on other tasks
6. Relevant labels and technologies

Provide your response in JSON format with the following structure:
{
    "summary": "Brief summary of the main objective",
    "main_objective": "Primary goal",
    "sub_objectives": ["List of secondary goals"],
    "suggested_tasks": [
        {
            "title": "Task title",
            "description": "Detailed description",
            "type": "feature|bug|task|documentation|research",
            "priority": "critical|high|medium|low",
            "size": "small|medium|large|xlarge",
            "dependencies": ["Other task titles this depends on"],
            "labels": ["Relevant labels"],
            "technologies": ["Technologies mentioned"]
        }
    ],
    "suggested_milestones": ["Suggested project milestones"],
    "complexity_score": 0.0-1.0,
    "risk_factors": ["Identified risks"],
    "assumptions": ["Key assumptions made"]
}"#;

/// Builds the user prompt for `description`, noting what is already known
/// about the project.
#[must_use]
pub fn build_prompt(description: &str, context: Option<&ProjectContext>) -> String {
    let mut prompt = format!(
        "Please analyze the following project requirements and break them down into specific tasks:\n\n{description}"
    );
    let Some(context) = context else {
        return prompt;
    };

    if !context.existing_issues.is_empty() {
        prompt.push_str(&format!(
            "\n\nNote: The project already has {} open issues.",
            context.existing_issues.len()
        ));
    }
    if !context.team_members.is_empty() {
        let names: Vec<&str> = context
            .team_members
            .iter()
            .take(MAX_PROMPT_MEMBERS)
            .map(|m| if m.name.is_empty() { m.username.as_str() } else { m.name.as_str() })
            .collect();
        prompt.push_str(&format!("\n\nTeam members: {}", names.join(", ")));
    }
    if !context.milestones.is_empty() {
        let titles: Vec<&str> = context.milestones.iter().map(|m| m.title.as_str()).collect();
        prompt.push_str(&format!("\n\nActive milestones: {}", titles.join(", ")));
    }
    prompt
}
