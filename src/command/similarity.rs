//! Fuzzy similarity between command text and registered examples.
//!
//! [`sequence_ratio`] is the Ratcliff/Obershelp "gestalt" ratio: twice the
//! number of characters in matching blocks over the combined length. Blocks
//! are found by repeatedly taking the longest common substring and recursing
//! on both sides. For `b` of 200 or more characters, elements occurring in
//! more than 1% of `b` are not used to seed matches.

use std::collections::{HashMap, HashSet};

/// Weight of the shared-word bonus in [`similarity`].
pub const WORD_BONUS: f64 = 0.3;

const AUTOJUNK_MIN_LEN: usize = 200;

struct Matcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> Matcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Longest matching block in `a[alo..ahi]` × `b[blo..bhi]`, earliest in
    /// `a` then in `b` on ties, as `(i, j, size)`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = if j == 0 { 1 } else { j2len.get(&(j - 1)).copied().unwrap_or(0) + 1 };
                    next.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular elements never seed a match but may extend one.
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }
        (best_i, best_j, best_size)
    }

    fn matched_chars(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }
}

/// Similarity of two strings in `[0, 1]`; 1.0 when both are empty.
#[must_use]
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = Matcher::new(&a, &b).matched_chars();
    #[allow(clippy::cast_precision_loss)]
    let ratio = 2.0 * matched as f64 / total as f64;
    ratio
}

/// Fuzzy score used by the command matcher: the sequence ratio of the
/// lowercased, trimmed texts plus [`WORD_BONUS`] times the fraction of
/// shared words, capped at 1.0.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    let ratio = sequence_ratio(&a, &b);

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    let longest = words_a.len().max(words_b.len());
    let bonus = if longest == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let fraction = words_a.intersection(&words_b).count() as f64 / longest as f64;
        fraction * WORD_BONUS
    };

    (ratio + bonus).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_matches_reference_values() {
        assert!(close(sequence_ratio("abcd", "bcde"), 0.75));
        assert!(close(sequence_ratio("", ""), 1.0));
        assert!(close(sequence_ratio("abc", ""), 0.0));
        assert!(close(sequence_ratio("same", "same"), 1.0));
        // Blocks "a" and "c": 2 * 2 / 6.
        assert!(close(sequence_ratio("abc", "axc"), 4.0 / 6.0));
    }

    #[test]
    fn ratio_recurses_on_both_sides() {
        // "qabxcd" vs "abycdf": blocks "ab" and "cd".
        assert!(close(sequence_ratio("qabxcd", "abycdf"), 8.0 / 12.0));
    }

    #[test]
    fn long_inputs_skip_popular_seeds() {
        let a = format!("b{}", "a".repeat(249));
        let b = "a".repeat(250);
        // Every element of b is popular, so nothing seeds a match.
        assert!(close(sequence_ratio(&a, &b), 0.0));
        // A match at the window start still extends over popular elements.
        assert!(close(sequence_ratio(&b, &b), 1.0));
    }

    #[test]
    fn ratio_counts_characters_not_bytes() {
        assert!(close(sequence_ratio("über", "uber"), 6.0 / 8.0));
    }

    #[test]
    fn similarity_adds_word_bonus_and_caps() {
        assert!(close(similarity("Rename Branch ", "rename branch"), 1.0));
        let plain = sequence_ratio("update branch", "rename branch");
        let scored = similarity("update branch", "rename branch");
        assert!(close(scored, (plain + 0.5 * WORD_BONUS).min(1.0)));
    }

    #[test]
    fn similarity_of_blank_inputs() {
        assert!(close(similarity("  ", ""), 1.0));
    }
}
