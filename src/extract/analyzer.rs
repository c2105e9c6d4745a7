//! Pattern-based text analysis.

use serde::Serialize;
use tracing::debug;

use super::vocabulary::PatternTable;
use crate::task::{push_unique, Priority, Size, TaskType};

/// A span matched by a task-indicator pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskIndicator {
    /// The captured phrase, trimmed.
    pub text: String,
    /// Index of the indicator pattern that matched.
    pub pattern: usize,
    /// Byte offset of the capture in the analyzed text.
    pub start: usize,
    /// Byte offset one past the end of the capture.
    pub end: usize,
}

/// Everything the analyzer found in one description.
///
/// Classification lists hold each matching group once, in check order, so
/// the first element is the dominant value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analysis {
    /// Candidate phrases, ordered by position in the text.
    pub task_indicators: Vec<TaskIndicator>,
    /// Matched priority groups.
    pub priorities: Vec<Priority>,
    /// Matched type groups.
    pub types: Vec<TaskType>,
    /// Matched size groups.
    pub sizes: Vec<Size>,
    /// Canonical technology names, first occurrence first.
    pub technologies: Vec<String>,
    /// Canonical component names, first occurrence first.
    pub components: Vec<String>,
    /// Referenced prerequisite phrases.
    pub dependencies: Vec<String>,
    /// Raw deadline phrases.
    pub deadlines: Vec<String>,
}

impl Analysis {
    /// Priority applied to tasks without their own evidence.
    #[must_use]
    pub fn dominant_priority(&self) -> Priority {
        self.priorities.first().copied().unwrap_or_default()
    }

    /// Type applied to tasks without their own evidence.
    #[must_use]
    pub fn dominant_type(&self) -> TaskType {
        self.types.first().copied().unwrap_or_default()
    }

    /// Size applied to every pattern-extracted task.
    #[must_use]
    pub fn dominant_size(&self) -> Size {
        self.sizes.first().copied().unwrap_or_default()
    }
}

/// Runs a [`PatternTable`] over free text.
#[derive(Debug, Clone, Copy)]
pub struct PatternAnalyzer<'a> {
    table: &'a PatternTable,
}

impl<'a> PatternAnalyzer<'a> {
    /// Creates an analyzer over `table`.
    #[must_use]
    pub fn new(table: &'a PatternTable) -> Self {
        Self { table }
    }

    /// The table this analyzer matches with.
    #[must_use]
    pub fn table(&self) -> &'a PatternTable {
        self.table
    }

    /// Collects task indicators and classification evidence from `text`.
    #[must_use]
    pub fn analyze(&self, text: &str) -> Analysis {
        let mut task_indicators = Vec::new();
        for (pattern, re) in self.table.task_indicators.iter().enumerate() {
            for caps in re.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                let phrase = m.as_str().trim();
                if phrase.is_empty() {
                    continue;
                }
                task_indicators.push(TaskIndicator {
                    text: phrase.to_string(),
                    pattern,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        // Stable: ties keep pattern order.
        task_indicators.sort_by_key(|ind| ind.start);

        let analysis = Analysis {
            task_indicators,
            priorities: matching_groups(&self.table.priorities, text),
            types: matching_groups(&self.table.types, text),
            sizes: matching_groups(&self.table.sizes, text),
            technologies: PatternTable::detect_named(&self.table.technologies, text),
            components: PatternTable::detect_named(&self.table.components, text),
            dependencies: captures(&self.table.dependencies, text),
            deadlines: captures(&self.table.deadlines, text),
        };

        debug!(
            indicators = analysis.task_indicators.len(),
            technologies = analysis.technologies.len(),
            dependencies = analysis.dependencies.len(),
            deadlines = analysis.deadlines.len(),
            "analyzed description"
        );
        analysis
    }
}

fn matching_groups<T: Copy>(groups: &[(T, regex::Regex)], text: &str) -> Vec<T> {
    groups.iter().filter(|(_, re)| re.is_match(text)).map(|(value, _)| *value).collect()
}

fn captures(patterns: &[regex::Regex], text: &str) -> Vec<String> {
    let mut found = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let phrase = m.as_str().trim();
                if !phrase.is_empty() {
                    push_unique(&mut found, phrase.to_string());
                }
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{TaskExtractor, Vocabulary};

    fn analyze(text: &str) -> Analysis {
        let table = PatternTable::builtin();
        PatternAnalyzer::new(&table).analyze(text)
    }

    #[test]
    fn finds_intent_phrases() {
        let analysis = analyze("We need to implement user authentication with OAuth support.");
        let texts: Vec<_> = analysis.task_indicators.iter().map(|i| i.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "implement user authentication with OAuth support",
                "user authentication with OAuth support"
            ]
        );
    }

    #[test]
    fn finds_bullet_and_numbered_items() {
        let analysis = analyze("Todo:\n- Set up the staging cluster\n2) Write the migration script\n");
        let texts: Vec<_> = analysis.task_indicators.iter().map(|i| i.text.as_str()).collect();
        assert!(texts.contains(&"Set up the staging cluster"));
        assert!(texts.contains(&"Write the migration script"));
    }

    #[test]
    fn indicators_are_ordered_by_position() {
        let analysis = analyze("Fix the crash on startup. We should add a retry button.");
        let starts: Vec<_> = analysis.task_indicators.iter().map(|i| i.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
        assert_eq!(analysis.task_indicators[0].text, "the crash on startup");
    }

    #[test]
    fn critical_wins_over_high() {
        let analysis = analyze("This is critical and important.");
        assert_eq!(analysis.priorities, vec![Priority::Critical, Priority::High]);
        assert_eq!(analysis.dominant_priority(), Priority::Critical);
    }

    #[test]
    fn high_priority_phrase_is_high() {
        let analysis = analyze("High priority: refresh the tokens.");
        assert_eq!(analysis.dominant_priority(), Priority::High);
    }

    #[test]
    fn triggers_need_word_boundaries() {
        let analysis = analyze("Highlight the newsletter in the addendum.");
        assert!(analysis.priorities.is_empty());
        assert!(analysis.types.is_empty());
        assert_eq!(analysis.dominant_type(), TaskType::Task);
        assert_eq!(analysis.dominant_size(), Size::Medium);
    }

    #[test]
    fn classifies_type_and_size() {
        let analysis = analyze("Investigate the huge memory regression.");
        assert_eq!(analysis.dominant_type(), TaskType::Research);
        assert_eq!(analysis.dominant_size(), Size::Xlarge);
    }

    #[test]
    fn collects_dependencies_and_deadlines() {
        let analysis = analyze(
            "After completing the database setup, implement the user model by 12/31/2025. \
             Reporting is blocked by the export job and must ship within 2 weeks.",
        );
        assert_eq!(analysis.dependencies, vec!["the database setup", "the export job and must ship within 2 weeks"]);
        assert_eq!(analysis.deadlines, vec!["12/31/2025", "2 weeks"]);
    }

    #[test]
    fn deadlines_stay_raw() {
        let analysis = analyze("Ship the dashboard by end of quarter.");
        assert_eq!(analysis.deadlines, vec!["end of quarter"]);
    }

    #[test]
    fn technologies_and_components() {
        let analysis = analyze("Use Python and FastAPI for the backend; cache results in Redis.");
        assert_eq!(analysis.technologies, vec!["python", "fastapi", "redis"]);
        assert_eq!(analysis.components, vec!["backend", "cache"]);
    }

    #[test]
    fn analysis_is_repeatable() {
        let text = "We need to implement user authentication with OAuth support. This is critical. \
                    After completing the database setup, add Redis caching within 2 weeks.";
        let table = PatternTable::builtin();
        let analyzer = PatternAnalyzer::new(&table);
        let first = analyzer.analyze(text);
        let second = analyzer.analyze(text);
        assert_eq!(first, second);

        let extractor = TaskExtractor::new(&table);
        assert_eq!(extractor.extract(text, &first), extractor.extract(text, &second));
    }

    #[test]
    fn custom_vocabulary_changes_detection() {
        let vocab = Vocabulary::from_yaml(
            "priorities:\n  - value: critical\n    triggers: [sev1]\ntechnologies:\n  - name: zig\n    pattern: zig\n",
        )
        .unwrap();
        let table = vocab.compile().unwrap();
        let analysis = PatternAnalyzer::new(&table).analyze("SEV1: port the parser to Zig, it is urgent.");
        assert_eq!(analysis.priorities, vec![Priority::Critical]);
        assert_eq!(analysis.technologies, vec!["zig"]);

        let builtin = analyze("SEV1: port the parser to Zig, it is urgent.");
        assert!(builtin.technologies.is_empty());
    }
}
