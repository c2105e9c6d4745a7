//! The command registry and its two-phase matcher.

use tracing::debug;

use super::params::extract_common;
use super::pattern::{CommandError, CommandPattern, Operation, Params};
use super::similarity::similarity;

/// Minimum score against an example for a fuzzy match.
pub const EXAMPLE_THRESHOLD: f64 = 0.6;
/// Minimum score against an alias for a fuzzy match.
pub const ALIAS_THRESHOLD: f64 = 0.5;
/// Confidence of a regex match.
pub const EXACT_CONFIDENCE: f64 = 1.0;

const MAX_SUGGESTIONS: usize = 10;

/// A registry hit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandMatch<'r> {
    /// The matched descriptor.
    pub command: &'r CommandPattern,
    /// Extracted parameters.
    pub parameters: Params,
    /// 1.0 for a regex match, otherwise the fuzzy score.
    pub confidence: f64,
}

/// Commands in registration order, at most one per [`Operation`].
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandPattern>,
}

impl CommandRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry of built-in GitLab tooling commands.
    ///
    /// # Panics
    ///
    /// Panics only if a built-in pattern is invalid, which the unit tests
    /// rule out.
    #[must_use]
    pub fn builtin() -> Self {
        builtin_commands().expect("built-in command table is valid")
    }

    /// Adds `command`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::DuplicateOperation`] if its operation is
    /// already registered.
    pub fn register(&mut self, command: CommandPattern) -> Result<(), CommandError> {
        if self.get(command.operation()).is_some() {
            return Err(CommandError::DuplicateOperation(command.operation()));
        }
        self.commands.push(command);
        Ok(())
    }

    /// Every command, in registration order.
    #[must_use]
    pub fn commands(&self) -> &[CommandPattern] {
        &self.commands
    }

    /// The command registered for `operation`.
    #[must_use]
    pub fn get(&self, operation: Operation) -> Option<&CommandPattern> {
        self.commands.iter().find(|c| c.operation() == operation)
    }

    /// Matches `input`: regex search first, then fuzzy similarity.
    /// Returns `None` when neither phase clears its threshold.
    #[must_use]
    pub fn find_command(&self, input: &str) -> Option<CommandMatch<'_>> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        self.exact_match(input).or_else(|| self.fuzzy_match(input))
    }

    /// First command, in registration order, whose pattern occurs in `input`.
    #[must_use]
    pub fn exact_match(&self, input: &str) -> Option<CommandMatch<'_>> {
        self.commands.iter().find_map(|command| {
            command.capture(input).map(|parameters| {
                debug!(operation = %command.operation(), "exact command match");
                CommandMatch { command, parameters, confidence: EXACT_CONFIDENCE }
            })
        })
    }

    /// Best-scoring command over all examples and aliases, if any score
    /// clears its threshold. Parameters come from the generic extractors.
    #[must_use]
    pub fn fuzzy_match(&self, input: &str) -> Option<CommandMatch<'_>> {
        let mut best: Option<(&CommandPattern, f64)> = None;
        for command in &self.commands {
            let candidates = command
                .examples()
                .iter()
                .map(|e| (e, EXAMPLE_THRESHOLD))
                .chain(command.aliases().iter().map(|a| (a, ALIAS_THRESHOLD)));
            for (text, threshold) in candidates {
                let score = similarity(input, text);
                if score >= threshold && best.map_or(true, |(_, s)| score > s) {
                    best = Some((command, score));
                }
            }
        }

        let (command, confidence) = best?;
        debug!(operation = %command.operation(), confidence, "fuzzy command match");
        Some(CommandMatch { command, parameters: extract_common(input), confidence })
    }

    /// Example commands for a partial input.
    ///
    /// Inputs shorter than two characters get a fixed list of common
    /// commands. Otherwise an operation keyword starting with the input adds
    /// its first two examples, and each alias starting with it adds the
    /// first example. Results are unique, in order, at most ten.
    #[must_use]
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        let partial = partial.trim().to_lowercase();
        if partial.chars().count() < 2 {
            return DEFAULT_SUGGESTIONS.iter().map(|s| (*s).to_string()).collect();
        }

        let mut out: Vec<String> = Vec::new();
        for command in &self.commands {
            if command.operation().keyword().starts_with(&partial) {
                for example in command.examples().iter().take(2) {
                    crate::task::push_unique(&mut out, example.clone());
                }
            }
            for alias in command.aliases() {
                if alias.to_lowercase().starts_with(&partial) {
                    if let Some(example) = command.examples().first() {
                        crate::task::push_unique(&mut out, example.clone());
                    }
                }
            }
        }
        out.truncate(MAX_SUGGESTIONS);
        out
    }

    /// The first command whose pattern or any alias contains `name`,
    /// ignoring case.
    #[must_use]
    pub fn command_help(&self, name: &str) -> Option<&CommandPattern> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }
        self.commands.iter().find(|c| {
            c.pattern().to_lowercase().contains(&name)
                || c.aliases().iter().any(|a| a.to_lowercase().contains(&name))
        })
    }
}

const DEFAULT_SUGGESTIONS: &[&str] = &[
    "create issues",
    "generate dashboard",
    "weekly report",
    "analyze project",
    "sync issues",
    "rename branches",
];

fn builtin_commands() -> Result<CommandRegistry, CommandError> {
    let mut registry = CommandRegistry::new();

    registry.register(
        CommandPattern::new(
            Operation::RenameBranches,
            r"rename\s+branches?(?:\s+in\s+(?P<group>\S+))?(?:\s+from\s+(?P<old_branch>\S+)\s+to\s+(?P<new_branch>\S+))?",
            "Rename branches in GitLab groups or projects",
        )?
        .with_examples(&[
            "rename branches in AI-ML-Services from trunk to main",
            "rename branches from master to main",
            "rename branches in project-group",
        ])
        .with_aliases(&["rename branch", "change branch name", "update branch"])
        .with_optional(&["group", "old_branch", "new_branch"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::CreateIssues,
            r"create\s+issues?(?:\s+(?:for\s+project\s+(?P<project_id>\d+)|from\s+(?P<folder>\S+)))?",
            "Create GitLab issues from markdown files",
        )?
        .with_examples(&[
            "create issues for project 123",
            "create issues from issues_folder",
            "create issues",
        ])
        .with_aliases(&["add issues", "make issues", "new issues"])
        .with_optional(&["project_id", "folder"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::GenerateDashboard,
            r"generate\s+(?:dashboard|executive\s+dashboard)(?:\s+for\s+groups?\s+(?P<group_ids>[\d,\s]+))?",
            "Generate executive dashboard for groups",
        )?
        .with_examples(&[
            "generate dashboard for groups 1,2,3",
            "generate executive dashboard",
            "generate dashboard for group 5",
        ])
        .with_aliases(&["create dashboard", "make dashboard", "exec dashboard"])
        .with_optional(&["group_ids"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::WeeklyReport,
            r"(?:weekly|productivity)\s+reports?(?:\s+for\s+groups?\s+(?P<group_ids>[\d,\s]+))?(?:\s+(?:email|send)\s+to\s+(?P<email>[\w@.,\s]+))?",
            "Generate weekly productivity reports",
        )?
        .with_examples(&[
            "weekly report for groups 1,2,3",
            "productivity report email to team@company.com",
            "weekly report for group 5 send to manager@company.com",
        ])
        .with_aliases(&["team report", "productivity report", "weekly summary"])
        .with_optional(&["group_ids", "email"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::AnalyzeProjects,
            r"analyze\s+projects?(?:\s+(?P<project_ids>[\d,\s]+))?",
            "Analyze GitLab projects and generate insights",
        )?
        .with_examples(&["analyze project 123", "analyze projects 123,456,789", "analyze project"])
        .with_aliases(&["analysis", "project analysis", "show analytics"])
        .with_optional(&["project_ids"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::ExportAnalytics,
            r"export\s+analytics(?:\s+for\s+projects?\s+(?P<project_ids>[\d,\s]+))?",
            "Export analytics data for projects",
        )?
        .with_examples(&[
            "export analytics for projects 123,456",
            "export analytics for project 789",
            "export analytics",
        ])
        .with_aliases(&["export data", "analytics export", "download analytics"])
        .with_optional(&["project_ids"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::SyncIssues,
            r"sync\s+issues(?:\s+(?:for\s+project\s+(?P<project_id>\d+)|from\s+(?P<folder>\S+)))?",
            "Sync issues between local files and GitLab",
        )?
        .with_examples(&[
            "sync issues for project 123",
            "sync issues from issues_folder",
            "sync issues",
        ])
        .with_aliases(&["synchronize issues", "update issues"])
        .with_optional(&["project_id", "folder"]),
    )?;

    registry.register(
        CommandPattern::new(
            Operation::SendReport,
            r"send\s+(?:report\s+)?(?P<file>\S+)\s+to\s+(?P<email>[\w@.,\s]+)",
            "Send report files via email",
        )?
        .with_examples(&[
            "send report.pdf to team@company.com",
            "send weekly_report.html to manager@company.com",
        ])
        .with_aliases(&["email report", "mail report"])
        .with_required(&["file", "email"]),
    )?;

    Ok(registry)
}
