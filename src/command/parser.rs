//! Stateful front end over the registry.

use std::fmt;

use serde::Serialize;

use super::params::validate_parameters;
use super::pattern::{CommandPattern, Operation, Params};
use super::registry::CommandRegistry;

/// A matched command with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// The matched descriptor.
    pub command: CommandPattern,
    /// Extracted parameters.
    pub parameters: Params,
    /// 1.0 for a regex match, otherwise the fuzzy score.
    pub confidence: f64,
    /// Input as given, trimmed.
    pub original_input: String,
}

impl ParsedCommand {
    /// Target operation.
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.command.operation()
    }
}

impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command: {}, Params: {:?}, Confidence: {:.2}",
            self.command.description(),
            self.parameters,
            self.confidence
        )
    }
}

/// Serializable view of a [`ParsedCommand`] for machine-readable output.
#[derive(Debug, Serialize)]
pub struct ParsedCommandView<'p> {
    /// Operation identifier.
    pub operation: Operation,
    /// Extracted parameters.
    pub parameters: &'p Params,
    /// Match confidence.
    pub confidence: f64,
    /// Whether validation passed.
    pub valid: bool,
    /// Validation messages.
    pub errors: Vec<String>,
}

/// Parses free text into commands and remembers what it parsed.
#[derive(Debug, Clone)]
pub struct CommandParser {
    registry: CommandRegistry,
    history: Vec<ParsedCommand>,
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandParser {
    /// A parser over the built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(CommandRegistry::builtin())
    }

    /// A parser over `registry`.
    #[must_use]
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self { registry, history: Vec::new() }
    }

    /// The registry commands are matched against.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Matches `input` and records the result in the history.
    pub fn parse(&mut self, input: &str) -> Option<ParsedCommand> {
        let hit = self.registry.find_command(input)?;
        let parsed = ParsedCommand {
            command: hit.command.clone(),
            parameters: hit.parameters,
            confidence: hit.confidence,
            original_input: input.trim().to_string(),
        };
        self.history.push(parsed.clone());
        Some(parsed)
    }

    /// Every command parsed so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[ParsedCommand] {
        &self.history
    }

    /// See [`validate_parameters`].
    #[must_use]
    pub fn validate(&self, parsed: &ParsedCommand) -> (bool, Vec<String>) {
        validate_parameters(&parsed.command, &parsed.parameters)
    }

    /// Builds the serializable view of `parsed`, validating it.
    #[must_use]
    pub fn view<'p>(&self, parsed: &'p ParsedCommand) -> ParsedCommandView<'p> {
        let (valid, errors) = self.validate(parsed);
        ParsedCommandView {
            operation: parsed.operation(),
            parameters: &parsed.parameters,
            confidence: parsed.confidence,
            valid,
            errors,
        }
    }

    /// See [`CommandRegistry::suggestions`].
    #[must_use]
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        self.registry.suggestions(partial)
    }

    /// See [`CommandRegistry::command_help`].
    #[must_use]
    pub fn command_help(&self, name: &str) -> Option<&CommandPattern> {
        self.registry.command_help(name)
    }
}
