//! Registered operation descriptors.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Extracted command parameters, keyed by name.
pub type Params = BTreeMap<String, String>;

/// Operations a free-text command can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Rename branches across a group or project.
    RenameBranches,
    /// Create issues from files or descriptions.
    CreateIssues,
    /// Build the executive dashboard.
    GenerateDashboard,
    /// Produce the weekly productivity report.
    WeeklyReport,
    /// Analyze project health.
    AnalyzeProjects,
    /// Export raw analytics.
    ExportAnalytics,
    /// Sync local issue files with the tracker.
    SyncIssues,
    /// Email a generated report.
    SendReport,
}

impl Operation {
    /// Every operation, in registration order.
    pub const ALL: &'static [Operation] = &[
        Self::RenameBranches,
        Self::CreateIssues,
        Self::GenerateDashboard,
        Self::WeeklyReport,
        Self::AnalyzeProjects,
        Self::ExportAnalytics,
        Self::SyncIssues,
        Self::SendReport,
    ];

    /// Stable identifier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RenameBranches => "rename-branches",
            Self::CreateIssues => "create-issues",
            Self::GenerateDashboard => "generate-dashboard",
            Self::WeeklyReport => "weekly-report",
            Self::AnalyzeProjects => "analyze-projects",
            Self::ExportAnalytics => "export-analytics",
            Self::SyncIssues => "sync-issues",
            Self::SendReport => "send-report",
        }
    }

    /// Leading keyword used for prefix suggestions.
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            Self::RenameBranches => "rename",
            Self::CreateIssues => "create",
            Self::GenerateDashboard => "generate",
            Self::WeeklyReport => "weekly",
            Self::AnalyzeProjects => "analyze",
            Self::ExportAnalytics => "export",
            Self::SyncIssues => "sync",
            Self::SendReport => "send",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Errors building or registering a command pattern.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The pattern is not a valid regex.
    #[error("invalid pattern for {operation}: {source}")]
    InvalidPattern {
        /// Operation the pattern belongs to.
        operation: Operation,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The operation already has a registered pattern.
    #[error("{0} is already registered")]
    DuplicateOperation(Operation),
}

/// An immutable operation descriptor: regex, help text, examples, aliases
/// and parameter names.
#[derive(Debug, Clone)]
pub struct CommandPattern {
    operation: Operation,
    pattern: String,
    regex: Regex,
    description: String,
    examples: Vec<String>,
    aliases: Vec<String>,
    required_params: Vec<String>,
    optional_params: Vec<String>,
}

impl PartialEq for CommandPattern {
    fn eq(&self, other: &Self) -> bool {
        self.operation == other.operation && self.pattern == other.pattern
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl CommandPattern {
    /// Compiles `pattern` case-insensitively for `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidPattern`] if the regex does not compile.
    pub fn new(operation: Operation, pattern: &str, description: &str) -> Result<Self, CommandError> {
        let regex = Regex::new(&format!("(?i){pattern}"))
            .map_err(|source| CommandError::InvalidPattern { operation, source })?;
        Ok(Self {
            operation,
            pattern: pattern.to_string(),
            regex,
            description: description.to_string(),
            examples: Vec::new(),
            aliases: Vec::new(),
            required_params: Vec::new(),
            optional_params: Vec::new(),
        })
    }

    /// Sets the example inputs.
    #[must_use]
    pub fn with_examples(mut self, examples: &[&str]) -> Self {
        self.examples = owned(examples);
        self
    }

    /// Sets alternative phrasings.
    #[must_use]
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = owned(aliases);
        self
    }

    /// Sets parameters that must be present.
    #[must_use]
    pub fn with_required(mut self, params: &[&str]) -> Self {
        self.required_params = owned(params);
        self
    }

    /// Sets parameters that may be present.
    #[must_use]
    pub fn with_optional(mut self, params: &[&str]) -> Self {
        self.optional_params = owned(params);
        self
    }

    /// Target operation.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The regex source as registered.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Human description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Example inputs.
    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    /// Alternative phrasings.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Parameters that must be present.
    #[must_use]
    pub fn required_params(&self) -> &[String] {
        &self.required_params
    }

    /// Parameters that may be present.
    #[must_use]
    pub fn optional_params(&self) -> &[String] {
        &self.optional_params
    }

    /// Searches `input` and returns the named groups that participated,
    /// trimmed, with empty values dropped.
    #[must_use]
    pub fn capture(&self, input: &str) -> Option<Params> {
        let caps = self.regex.captures(input)?;
        let mut params = Params::new();
        for name in self.regex.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    params.insert(name.to_string(), value.to_string());
                }
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_trims_and_drops_unmatched_groups() {
        let pattern = CommandPattern::new(
            Operation::WeeklyReport,
            r"weekly\s+reports?(?:\s+for\s+groups?\s+(?P<group_ids>[\d,\s]+))?(?:\s+email\s+to\s+(?P<email>\S+))?",
            "Weekly report",
        )
        .unwrap();
        let params = pattern.capture("Weekly report for groups 1,2,3 ").unwrap();
        assert_eq!(params.get("group_ids").map(String::as_str), Some("1,2,3"));
        assert!(!params.contains_key("email"));
    }

    #[test]
    fn capture_is_a_search_not_an_anchor() {
        let pattern = CommandPattern::new(Operation::SyncIssues, r"sync\s+issues", "Sync").unwrap();
        assert!(pattern.capture("please sync issues now").is_some());
        assert!(pattern.capture("sink issues").is_none());
    }

    #[test]
    fn invalid_regex_is_reported() {
        let err = CommandPattern::new(Operation::SendReport, r"send\s+(", "Send").unwrap_err();
        assert!(matches!(err, CommandError::InvalidPattern { operation: Operation::SendReport, .. }));
    }

    #[test]
    fn operation_names() {
        assert_eq!(Operation::RenameBranches.to_string(), "rename-branches");
        assert_eq!(Operation::SendReport.keyword(), "send");
        assert_eq!(Operation::ALL.len(), 8);
    }
}
