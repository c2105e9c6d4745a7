//! Title and description text for extracted tasks.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::task::MAX_TITLE_CHARS;

const ELLIPSIS: &str = "...";
const MAX_CONTEXT_SENTENCES: usize = 3;

fn sentence_splitter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("Invalid regex pattern"))
}

/// Collapses runs of whitespace to single spaces and drops trailing
/// punctuation (`.,;:`).
#[must_use]
pub fn normalize_phrase(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.trim_end_matches(['.', ',', ';', ':']).trim_end().to_string()
}

/// Truncates `title` to [`MAX_TITLE_CHARS`] characters, ending in `...`
/// when shortened.
#[must_use]
pub fn clamp_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let keep = MAX_TITLE_CHARS - ELLIPSIS.len();
    let mut out: String = title.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Builds a title from an extracted phrase.
///
/// The first lead-in in `prefixes` that starts the phrase (ignoring case,
/// followed by whitespace or the end) is removed, the first letter is
/// capitalized, and the result is clamped. Falls back to the phrase itself
/// when stripping would leave nothing.
#[must_use]
pub fn generate_title(text: &str, prefixes: &[String]) -> String {
    let phrase = normalize_phrase(text);
    let mut rest = phrase.as_str();
    for prefix in prefixes {
        if let Some(after) = strip_lead_in(&phrase, prefix) {
            rest = after;
            break;
        }
    }

    let rest = rest.trim();
    let title = if rest.is_empty() { phrase.as_str() } else { rest };
    clamp_title(&capitalize(title))
}

fn strip_lead_in<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
    if prefix.is_empty() {
        return None;
    }
    let head = text.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    let tail = &text[prefix.len()..];
    match tail.chars().next() {
        None => Some(tail),
        Some(c) if c.is_whitespace() => Some(tail),
        Some(_) => None,
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// The phrase followed by a `## Context` section quoting up to three
/// sentences of `full_text` that share at least two words with it.
#[must_use]
pub fn describe_with_context(phrase: &str, full_text: &str) -> String {
    let phrase_words = word_set(phrase);
    let related: Vec<&str> = sentence_splitter()
        .split(full_text)
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != phrase)
        .filter(|s| word_set(s).intersection(&phrase_words).count() >= 2)
        .take(MAX_CONTEXT_SENTENCES)
        .collect();

    let mut description = phrase.to_string();
    if !related.is_empty() {
        description.push_str("\n\n## Context");
        for sentence in related {
            description.push_str("\n- ");
            description.push_str(sentence);
        }
    }
    description
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::PatternTable;

    fn title(text: &str) -> String {
        generate_title(text, PatternTable::builtin().title_prefixes())
    }

    #[test]
    fn strips_first_matching_lead_in() {
        assert_eq!(title("we need to add caching"), "Add caching");
        assert_eq!(title("Implement user authentication"), "User authentication");
        assert_eq!(title("should  refresh   tokens."), "Refresh tokens");
    }

    #[test]
    fn lead_in_must_end_at_word_boundary() {
        assert_eq!(title("created accounts are never purged"), "Created accounts are never purged");
        assert_eq!(title("builder pattern for requests"), "Builder pattern for requests");
    }

    #[test]
    fn keeps_original_case_after_first_letter() {
        assert_eq!(title("integrate the GitLab API"), "Integrate the GitLab API");
    }

    #[test]
    fn bare_lead_in_falls_back_to_phrase() {
        assert_eq!(title("implement"), "Implement");
    }

    #[test]
    fn long_titles_are_clamped_by_characters() {
        let long = "é".repeat(120);
        let clamped = title(&long);
        assert_eq!(clamped.chars().count(), MAX_TITLE_CHARS);
        assert!(clamped.ends_with("..."));

        let exact = "a".repeat(MAX_TITLE_CHARS);
        assert_eq!(clamp_title(&exact), exact);
    }

    #[test]
    fn normalize_collapses_whitespace_and_trailing_punctuation() {
        assert_eq!(normalize_phrase("  add\n a   cache;: "), "add a cache");
    }

    #[test]
    fn context_quotes_related_sentences() {
        let text = "Add the export button. The export button needs an icon! Unrelated stuff here.";
        let description = describe_with_context("the export button", text);
        assert_eq!(
            description,
            "the export button\n\n## Context\n- Add the export button\n- The export button needs an icon"
        );
    }

    #[test]
    fn context_is_omitted_without_related_sentences() {
        assert_eq!(describe_with_context("refresh tokens", "Nothing in common."), "refresh tokens");
    }
}
