//! Pattern vocabularies for the analyzer.
//!
//! A [`Vocabulary`] is plain data (regex fragments grouped by category) with a
//! YAML form, so callers can substitute their own terms. [`PatternTable`] is
//! the compiled, immutable form handed to the analyzer.
//!
//! Compilation rules:
//! - every pattern is case-insensitive;
//! - keyword triggers and named patterns match whole words;
//! - task-indicator, dependency and deadline patterns are used as written and
//!   must capture the interesting span in group 1.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::task::{Priority, Size, TaskType};

/// Keyword triggers that select one value of a classification enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup<T> {
    /// Value selected when any trigger matches.
    pub value: T,
    /// Regex fragments, matched as whole words.
    pub triggers: Vec<String>,
}

/// A regex fragment reported under a canonical name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPattern {
    /// Canonical name recorded when the pattern matches.
    pub name: String,
    /// Regex fragment, matched as a whole word.
    pub pattern: String,
}

/// Uncompiled pattern vocabulary.
///
/// Groups are checked in list order; the first matching group of a
/// classification is the dominant one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Patterns whose group 1 captures an actionable phrase.
    pub task_indicators: Vec<String>,
    /// Priority triggers in check order (medium is the unmatched default).
    pub priorities: Vec<KeywordGroup<Priority>>,
    /// Type triggers in check order (task is the unmatched default).
    pub types: Vec<KeywordGroup<TaskType>>,
    /// Size triggers in check order (medium is the unmatched default).
    pub sizes: Vec<KeywordGroup<Size>>,
    /// Technology vocabulary.
    pub technologies: Vec<NamedPattern>,
    /// System component vocabulary.
    pub components: Vec<NamedPattern>,
    /// Patterns whose group 1 captures a referenced prerequisite.
    pub dependencies: Vec<String>,
    /// Patterns whose group 1 captures a raw deadline phrase.
    pub deadlines: Vec<String>,
    /// Lead-in phrases stripped from the start of generated titles.
    pub title_prefixes: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn group<T>(value: T, triggers: &[&str]) -> KeywordGroup<T> {
    KeywordGroup { value, triggers: strings(triggers) }
}

fn named(items: &[(&str, &str)]) -> Vec<NamedPattern> {
    items
        .iter()
        .map(|(name, pattern)| NamedPattern { name: (*name).to_string(), pattern: (*pattern).to_string() })
        .collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            task_indicators: strings(&[
                r"\b(?:we\s+)?(?:need\s+to|should|must|have\s+to|want\s+to)\s+([^.]+)",
                r"\b(?:implement|create|build|develop|design|add|integrate)\s+([^.]+)",
                r"\b(?:fix|resolve|debug|troubleshoot|patch)\s+([^.]+)",
                r"\b(?:test|verify|validate|ensure)\s+([^.]+)",
                r"\b(?:document|write\s+docs?\s+for|explain)\s+([^.]+)",
                r"(?m)^[ \t]*[-*•][ \t]*([^.\n]+)",
                r"(?m)^[ \t]*\d+[.)][ \t]*([^.\n]+)",
                r"\b(?:feature|functionality):\s*([^.\n]+)",
                r"\brequirement(?:\s+\d+)?:\s*([^.\n]+)",
            ]),
            priorities: vec![
                group(
                    Priority::Critical,
                    &[
                        r"critical",
                        r"urgent\w*",
                        r"asap",
                        r"immediate\w*",
                        r"blockers?",
                        r"show[\s-]?stoppers?",
                        r"top[\s-]?priority",
                    ],
                ),
                group(
                    Priority::High,
                    &[
                        r"important",
                        r"high[\s-]?priority",
                        r"high",
                        r"soon",
                        r"quickly",
                        r"next\s+sprint",
                    ],
                ),
                group(
                    Priority::Low,
                    &[
                        r"low[\s-]?priority",
                        r"nice[\s-]?to[\s-]?have",
                        r"optional",
                        r"when\s+possible",
                        r"future",
                        r"someday",
                        r"backlog",
                    ],
                ),
            ],
            types: vec![
                group(
                    TaskType::Bug,
                    &[
                        r"bugs?",
                        r"fix\w*",
                        r"issues?",
                        r"problems?",
                        r"errors?",
                        r"crash\w*",
                        r"broken",
                        r"not\s+working",
                        r"failures?",
                        r"defects?",
                    ],
                ),
                group(
                    TaskType::Feature,
                    &[
                        r"features?",
                        r"new",
                        r"implement\w*",
                        r"add(?:ing)?",
                        r"create",
                        r"functionality",
                        r"capabilit(?:y|ies)",
                        r"enhancements?",
                    ],
                ),
                group(
                    TaskType::Documentation,
                    &[
                        r"document\w*",
                        r"docs?",
                        r"readme",
                        r"guides?",
                        r"manual",
                        r"instructions",
                        r"wiki",
                    ],
                ),
                group(
                    TaskType::Research,
                    &[
                        r"research\w*",
                        r"investigat\w*",
                        r"explor\w*",
                        r"study",
                        r"analy[sz]\w*",
                        r"evaluat\w*",
                        r"assess\w*",
                        r"proof[\s-]?of[\s-]?concept",
                        r"poc",
                    ],
                ),
            ],
            sizes: vec![
                group(
                    Size::Small,
                    &[
                        r"small",
                        r"quick\w*",
                        r"simple",
                        r"easy",
                        r"minor",
                        r"trivial",
                        r"few\s+hours?",
                        r"1[\s-]?2\s+hours?",
                    ],
                ),
                group(
                    Size::Large,
                    &[
                        r"large",
                        r"big",
                        r"complex",
                        r"major",
                        r"significant",
                        r"several\s+days?",
                        r"weeks?",
                        r"sprints?",
                    ],
                ),
                group(
                    Size::Xlarge,
                    &[
                        r"huge",
                        r"massive",
                        r"epics?",
                        r"multi[\s-]?sprint",
                        r"months?",
                        r"quarters?",
                        r"long[\s-]?term",
                    ],
                ),
            ],
            technologies: named(&[
                ("python", r"python"),
                ("javascript", r"javascript"),
                ("typescript", r"typescript"),
                ("java", r"java"),
                ("go", r"golang"),
                ("rust", r"rust"),
                ("ruby", r"ruby"),
                ("react", r"react"),
                ("vue", r"vue(?:\.?js)?"),
                ("angular", r"angular"),
                ("django", r"django"),
                ("flask", r"flask"),
                ("fastapi", r"fastapi"),
                ("docker", r"docker"),
                ("kubernetes", r"kubernetes|k8s"),
                ("terraform", r"terraform"),
                ("aws", r"aws"),
                ("azure", r"azure"),
                ("gcp", r"gcp"),
                ("postgresql", r"postgres(?:ql)?"),
                ("mysql", r"mysql"),
                ("mongodb", r"mongo(?:db)?"),
                ("redis", r"redis"),
                ("elasticsearch", r"elasticsearch"),
                ("api", r"apis?"),
                ("rest", r"(?-i:REST)|restful"),
                ("graphql", r"graphql"),
                ("grpc", r"grpc"),
                ("websocket", r"websockets?"),
                ("oauth", r"oauth2?"),
                ("jwt", r"jwt"),
                ("auth", r"auth|authentication|authorization"),
                ("ci/cd", r"ci\s*/\s*cd|ci-cd|cicd"),
                ("gitlab-ci", r"gitlab[\s-]?ci"),
                ("github-actions", r"github[\s-]?actions"),
            ]),
            components: named(&[
                ("frontend", r"front[\s-]?end"),
                ("backend", r"back[\s-]?end"),
                ("database", r"databases?|db|schema"),
                ("api", r"apis?|endpoints?"),
                ("ui", r"ui|user\s+interface"),
                ("cli", r"cli"),
                ("cache", r"cach\w*"),
                ("pipeline", r"pipelines?"),
            ]),
            dependencies: strings(&[
                r"\bafter\s+(?:completing\s+)?([^,.\n]+)",
                r"\bdepends?\s+on\s+([^,.\n]+)",
                r"\brequires?\s+([^,.\n]+)",
                r"\bonce\s+([^,.\n]+?)\s+is\s+(?:done|completed|finished|ready)",
                r"\bblocked\s+by\s+([^,.\n]+)",
            ]),
            deadlines: strings(&[
                r"\bby\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
                r"\bbefore\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
                r"\bdeadline[:\s]+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
                r"\bdue\s+(?:date|by)[:\s]+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
                r"\bby\s+(end\s+of\s+(?:the\s+)?(?:day|week|month|quarter|year))",
                r"\bwithin\s+(\d+\s+(?:days?|weeks?|months?))",
            ]),
            title_prefixes: strings(&[
                "we need to",
                "we should",
                "we must",
                "need to",
                "should",
                "must",
                "have to",
                "want to",
                "implement",
                "create",
                "build",
                "develop",
            ]),
        }
    }
}

impl Vocabulary {
    /// Parses a YAML vocabulary. Sections absent from the document keep
    /// their built-in contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(ConfigError::Yaml)
    }

    /// Reads and parses a YAML vocabulary file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_yaml(&yaml)
    }

    /// Compiles every pattern into a [`PatternTable`].
    ///
    /// # Errors
    ///
    /// Returns an error naming the category and pattern that failed to compile.
    pub fn compile(&self) -> Result<PatternTable, PatternError> {
        Ok(PatternTable {
            task_indicators: compile_all("task_indicators", &self.task_indicators)?,
            priorities: compile_groups("priorities", &self.priorities)?,
            types: compile_groups("types", &self.types)?,
            sizes: compile_groups("sizes", &self.sizes)?,
            technologies: compile_named("technologies", &self.technologies)?,
            components: compile_named("components", &self.components)?,
            dependencies: compile_all("dependencies", &self.dependencies)?,
            deadlines: compile_all("deadlines", &self.deadlines)?,
            title_prefixes: self.title_prefixes.iter().map(|p| p.trim().to_lowercase()).collect(),
        })
    }
}

/// A vocabulary pattern that is not a valid regex.
#[derive(Debug, thiserror::Error)]
#[error("invalid {category} pattern `{pattern}`: {source}")]
pub struct PatternError {
    /// Vocabulary section containing the pattern.
    pub category: &'static str,
    /// The offending pattern as written.
    pub pattern: String,
    /// Underlying regex error.
    #[source]
    pub source: regex::Error,
}

/// Compiled, immutable pattern table consumed by the analyzer.
#[derive(Debug, Clone)]
pub struct PatternTable {
    pub(crate) task_indicators: Vec<Regex>,
    pub(crate) priorities: Vec<(Priority, Regex)>,
    pub(crate) types: Vec<(TaskType, Regex)>,
    pub(crate) sizes: Vec<(Size, Regex)>,
    pub(crate) technologies: Vec<(String, Regex)>,
    pub(crate) components: Vec<(String, Regex)>,
    pub(crate) dependencies: Vec<Regex>,
    pub(crate) deadlines: Vec<Regex>,
    pub(crate) title_prefixes: Vec<String>,
}

impl PatternTable {
    /// Compiles the built-in vocabulary.
    ///
    /// # Panics
    ///
    /// Panics only if the built-in vocabulary contains an invalid regex,
    /// which the unit tests rule out.
    #[must_use]
    pub fn builtin() -> Self {
        Vocabulary::default().compile().expect("built-in vocabulary compiles")
    }

    /// Lead-in phrases stripped from generated titles, lowercased.
    #[must_use]
    pub fn title_prefixes(&self) -> &[String] {
        &self.title_prefixes
    }

    /// Canonical names of named patterns matching anywhere in `text`, in
    /// order of first occurrence.
    pub(crate) fn detect_named(patterns: &[(String, Regex)], text: &str) -> Vec<String> {
        let mut hits: Vec<(usize, &str)> = patterns
            .iter()
            .filter_map(|(name, re)| re.find(text).map(|m| (m.start(), name.as_str())))
            .collect();
        hits.sort_by_key(|(start, _)| *start);
        let mut names: Vec<String> = Vec::with_capacity(hits.len());
        for (_, name) in hits {
            crate::task::push_unique(&mut names, name.to_string());
        }
        names
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compile_one(category: &'static str, pattern: &str, source: &str) -> Result<Regex, PatternError> {
    Regex::new(source).map_err(|source| PatternError {
        category,
        pattern: pattern.to_string(),
        source,
    })
}

fn compile_all(category: &'static str, patterns: &[String]) -> Result<Vec<Regex>, PatternError> {
    patterns.iter().map(|p| compile_one(category, p, &format!("(?i){p}"))).collect()
}

fn compile_groups<T: Copy>(
    category: &'static str,
    groups: &[KeywordGroup<T>],
) -> Result<Vec<(T, Regex)>, PatternError> {
    groups
        .iter()
        .filter(|g| !g.triggers.is_empty())
        .map(|g| {
            let joined = g.triggers.join("|");
            let re = compile_one(category, &joined, &format!(r"(?i)\b(?:{joined})\b"))?;
            Ok((g.value, re))
        })
        .collect()
}

fn compile_named(
    category: &'static str,
    patterns: &[NamedPattern],
) -> Result<Vec<(String, Regex)>, PatternError> {
    patterns
        .iter()
        .map(|p| {
            let re = compile_one(category, &p.pattern, &format!(r"(?i)\b(?:{})\b", p.pattern))?;
            Ok((p.name.clone(), re))
        })
        .collect()
}
