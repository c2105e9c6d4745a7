//! Plain-text help for registered commands.

use std::fmt::Write as _;

use super::pattern::{CommandPattern, Operation};
use super::registry::CommandRegistry;

fn usage_tips(operation: Operation) -> &'static [&'static str] {
    match operation {
        Operation::RenameBranches => &[
            "Name a group to rename branches across all of its projects.",
            "Use 'from X to Y' to give exact branch names.",
        ],
        Operation::CreateIssues => &[
            "Issues come from the markdown files in the 'issues' folder by default.",
            "Give a project ID to target a specific project.",
        ],
        Operation::GenerateDashboard => &[
            "Group IDs narrow the dashboard to specific teams.",
        ],
        Operation::WeeklyReport => &[
            "Add 'email to <address>' to send the report when it is ready.",
            "Group IDs narrow the report to specific teams.",
        ],
        Operation::AnalyzeProjects => &["Separate multiple project IDs with commas."],
        Operation::ExportAnalytics => &["Exports are JSON by default."],
        Operation::SyncIssues => &["Existing issues are updated and missing ones created."],
        Operation::SendReport => &[
            "Separate multiple recipients with commas.",
            "The report format follows the file extension.",
        ],
    }
}

/// Overview of every registered command with its first example.
#[must_use]
pub fn general_help(registry: &CommandRegistry) -> String {
    let mut out = String::from("Available commands:\n");
    for command in registry.commands() {
        let _ = writeln!(out, "\n  {:<20} {}", command.operation(), command.description());
        if let Some(example) = command.examples().first() {
            let _ = writeln!(out, "  {:<20} e.g. {example}", "");
        }
    }
    out.push_str("\nRun `glt commands <name>` for details on one command.\n");
    out
}

/// Detailed help for one command: aliases, parameters, examples and tips.
#[must_use]
pub fn command_help_text(command: &CommandPattern) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", command.description(), command.operation());
    let _ = writeln!(out, "{}", "=".repeat(60));

    if !command.aliases().is_empty() {
        let _ = writeln!(out, "Aliases: {}", command.aliases().join(", "));
    }

    if !command.required_params().is_empty() || !command.optional_params().is_empty() {
        let _ = writeln!(out, "\nParameters:");
        for (heading, params) in
            [("Required", command.required_params()), ("Optional", command.optional_params())]
        {
            if params.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {heading}:");
            for param in params {
                let _ = writeln!(out, "    - {param}");
            }
        }
    }

    if !command.examples().is_empty() {
        let _ = writeln!(out, "\nExamples:");
        for (i, example) in command.examples().iter().enumerate() {
            let _ = writeln!(out, "  {}. {example}", i + 1);
        }
    }

    let _ = writeln!(out, "\nTips:");
    for tip in usage_tips(command.operation()) {
        let _ = writeln!(out, "  - {tip}");
    }
    out
}
