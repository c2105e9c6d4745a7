//! Turns analyzer output into task specs.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::analyzer::Analysis;
use super::title::{describe_with_context, generate_title, normalize_phrase};
use super::vocabulary::PatternTable;
use crate::task::{push_unique, Category, ExtractionMethod, TaskSpec, TaskType};

/// Candidates shorter than this many characters are noise.
pub const MIN_CANDIDATE_CHARS: usize = 10;
/// Inputs longer than this many characters get a fallback task when no
/// candidate survives.
pub const FALLBACK_MIN_CHARS: usize = 20;
/// Confidence assigned to the whole-description fallback task.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_TITLE_SOURCE_CHARS: usize = 100;

/// A candidate opening with one of these states a fact, not work to do:
/// "it should be high priority" yields "be high priority".
const COPULAS: &[&str] = &["be", "is", "are", "was", "were", "been", "being"];

fn is_state_phrase(phrase: &str) -> bool {
    phrase
        .split_whitespace()
        .next()
        .is_some_and(|word| COPULAS.iter().any(|c| word.eq_ignore_ascii_case(c)))
}

fn type_overrides() -> &'static [(TaskType, Regex)] {
    static RE: OnceLock<Vec<(TaskType, Regex)>> = OnceLock::new();
    RE.get_or_init(|| {
        [
            (TaskType::Bug, r"(?i)\b(?:bug|fix|error|issue)"),
            (TaskType::Documentation, r"(?i)\b(?:document|docs|readme)"),
            (TaskType::Research, r"(?i)\b(?:research|investigate|explore)"),
        ]
        .into_iter()
        .map(|(ty, pattern)| (ty, Regex::new(pattern).expect("Invalid regex pattern")))
        .collect()
    })
}

fn word_start(pattern: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{pattern})")).expect("Invalid regex pattern")
}

fn category_rules() -> &'static [(Category, Regex)] {
    static RE: OnceLock<Vec<(Category, Regex)>> = OnceLock::new();
    RE.get_or_init(|| {
        vec![
            (Category::Testing, word_start(r"test|verify")),
            (Category::Design, word_start(r"design|ui\b|ux\b")),
            (Category::Infrastructure, word_start(r"deploy|infrastructure|infra\b")),
            (Category::Refactoring, word_start(r"refactor|clean")),
        ]
    })
}

/// Category for a task of type `task_type` described by `text`.
///
/// Bug, documentation and research types map straight to their category;
/// everything else is decided by keywords, defaulting to implementation.
#[must_use]
pub fn categorize(task_type: TaskType, text: &str) -> Category {
    match task_type {
        TaskType::Bug => Category::Bugfix,
        TaskType::Documentation => Category::Documentation,
        TaskType::Research => Category::Research,
        TaskType::Feature | TaskType::Task => category_rules()
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map_or(Category::Implementation, |(category, _)| *category),
    }
}

/// Builds deduplicated [`TaskSpec`]s from a description and its analysis.
#[derive(Debug, Clone, Copy)]
pub struct TaskExtractor<'a> {
    table: &'a PatternTable,
}

impl<'a> TaskExtractor<'a> {
    /// Creates an extractor sharing `table` with the analyzer.
    #[must_use]
    pub fn new(table: &'a PatternTable) -> Self {
        Self { table }
    }

    /// Extracts tasks from `text`.
    ///
    /// Every candidate phrase becomes one task unless it is too short, opens
    /// with a copula, or yields a title already taken (case-insensitively).
    /// Overlapping indicators such as "need to implement X" therefore give
    /// one task. When nothing survives and the text is long enough, a single
    /// low-confidence fallback task covers it all.
    #[must_use]
    pub fn extract(&self, text: &str, analysis: &Analysis) -> Vec<TaskSpec> {
        let mut seen = HashSet::new();
        let mut tasks = Vec::new();

        for indicator in &analysis.task_indicators {
            let phrase = normalize_phrase(&indicator.text);
            if phrase.chars().count() < MIN_CANDIDATE_CHARS || is_state_phrase(&phrase) {
                continue;
            }
            let task = self.task_from_phrase(&phrase, text, analysis);
            if seen.insert(task.title.to_lowercase()) {
                tasks.push(task);
            }
        }

        if tasks.is_empty() && text.trim().chars().count() > FALLBACK_MIN_CHARS {
            debug!("no candidates survived, emitting fallback task");
            tasks.push(self.fallback_task(text, analysis));
        }

        debug!(candidates = analysis.task_indicators.len(), tasks = tasks.len(), "extracted tasks");
        tasks
    }

    fn task_from_phrase(&self, phrase: &str, text: &str, analysis: &Analysis) -> TaskSpec {
        let title = generate_title(phrase, self.table.title_prefixes());
        let mut task = TaskSpec::new(title, describe_with_context(phrase, text));

        task.task_type = type_overrides()
            .iter()
            .find(|(_, re)| re.is_match(phrase))
            .map_or_else(|| analysis.dominant_type(), |(ty, _)| *ty);
        task.priority = analysis.dominant_priority();
        task.size = analysis.dominant_size();
        task.category = categorize(task.task_type, phrase);
        task.technologies.clone_from(&analysis.technologies);
        task.components = PatternTable::detect_named(&self.table.components, phrase);
        task.due_date_hint = analysis.deadlines.first().cloned();
        task.source_text = Some(phrase.to_string());
        task.extraction_method = ExtractionMethod::Pattern;

        let phrase_lower = phrase.to_lowercase();
        for dependency in &analysis.dependencies {
            if phrase_lower.contains(&dependency.to_lowercase()) {
                continue;
            }
            let dep_title = generate_title(dependency, self.table.title_prefixes());
            if dep_title != task.title {
                push_unique(&mut task.dependencies, dep_title);
            }
        }

        task.refresh_labels();
        task
    }

    fn fallback_task(&self, text: &str, analysis: &Analysis) -> TaskSpec {
        let head: String = text.trim().chars().take(FALLBACK_TITLE_SOURCE_CHARS).collect();
        let mut task =
            TaskSpec::new(generate_title(&head, self.table.title_prefixes()), text.trim());
        task.task_type = analysis.dominant_type();
        task.priority = analysis.dominant_priority();
        task.size = analysis.dominant_size();
        task.category = categorize(task.task_type, text);
        task.technologies.clone_from(&analysis.technologies);
        task.components.clone_from(&analysis.components);
        task.due_date_hint = analysis.deadlines.first().cloned();
        task.confidence_score = FALLBACK_CONFIDENCE;
        task.source_text = Some(text.trim().to_string());
        task.extraction_method = ExtractionMethod::Fallback;
        task.refresh_labels();
        task
    }
}
