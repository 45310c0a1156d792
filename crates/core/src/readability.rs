//! Prose readability metrics.
//!
//! Computes word/sentence/paragraph counts, a syllable estimate, and the
//! Flesch Reading Ease score over extracted clean text. The syllable
//! counter is a deliberate heuristic: English syllabification has no
//! closed-form rule, and the estimate only needs to be stable and cheap.
//!
//! Division guards everywhere: sentence and paragraph counts floor at 1 so
//! the averages are defined for any input, including the empty string.

use regex::Regex;
use serde::Serialize;

/// Characters treated as vowels by the syllable heuristic.
const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'y'];

/// Readability profile of one document's clean text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_sentence_length: f64,
    pub avg_word_length: f64,
    /// Flesch Reading Ease, clamped to 0..=100.
    pub readability_score: f64,
    /// One of seven fixed bands, from "Very Easy" to "Very Difficult".
    pub readability_grade: String,
}

/// Analyzes the readability of plain text.
pub fn analyze_readability(text: &str) -> ReadabilityMetrics {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count();
    let paragraph_split = Regex::new(r"\n\s*\n").unwrap();
    let paragraphs = paragraph_split
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .count();

    let word_count = words.len();
    let sentence_count = sentences.max(1);
    let paragraph_count = paragraphs.max(1);

    let avg_sentence_length = word_count as f64 / sentence_count as f64;
    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_length = if word_count > 0 { total_chars as f64 / word_count as f64 } else { 0.0 };

    let syllable_count: usize = words.iter().map(|w| count_syllables(w)).sum();
    let avg_syllables_per_word = if word_count > 0 { syllable_count as f64 / word_count as f64 } else { 0.0 };

    let readability_score =
        (206.835 - 1.015 * avg_sentence_length - 84.6 * avg_syllables_per_word).clamp(0.0, 100.0);

    ReadabilityMetrics {
        word_count,
        sentence_count,
        paragraph_count,
        avg_sentence_length,
        avg_word_length,
        readability_score,
        readability_grade: grade_for_score(readability_score).to_string(),
    }
}

/// Maps a Flesch score to its grade band.
fn grade_for_score(score: f64) -> &'static str {
    if score >= 90.0 {
        "Very Easy (5th Grade)"
    } else if score >= 80.0 {
        "Easy (6th Grade)"
    } else if score >= 70.0 {
        "Fairly Easy (7th Grade)"
    } else if score >= 60.0 {
        "Standard (8th-9th Grade)"
    } else if score >= 50.0 {
        "Fairly Difficult (10th-12th)"
    } else if score >= 30.0 {
        "Difficult (College)"
    } else {
        "Very Difficult (Professional)"
    }
}

/// Estimates the syllable count of one word.
///
/// Case-folds and strips non-letters, counts short words as one syllable,
/// drops a trailing silent-e-style suffix (consonant + "e"/"es", or "ed"),
/// drops a leading "y", then counts maximal vowel runs; a word with no
/// vowel runs still counts as one syllable.
pub fn count_syllables(word: &str) -> usize {
    let word: String = word
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase())
        .collect();

    if word.is_empty() || word.len() <= 3 {
        return 1;
    }

    let word = strip_silent_suffix(&word);
    let word = word.strip_prefix('y').unwrap_or(word);

    let mut runs = 0;
    let mut in_run = false;
    for c in word.chars() {
        if VOWELS.contains(&c) {
            if !in_run {
                runs += 1;
            }
            in_run = true;
        } else {
            in_run = false;
        }
    }

    runs.max(1)
}

/// Strip a trailing "<consonant>es", "ed", or "<consonant>e".
///
/// The consonant class excludes 'l' along with the vowels, so "tales"
/// keeps its ending while "makes" loses "kes".
fn strip_silent_suffix(word: &str) -> &str {
    let is_consonant = |c: char| !matches!(c, 'l' | 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let chars: Vec<char> = word.chars().collect();
    let n = chars.len();

    if n >= 3 && chars[n - 2] == 'e' && chars[n - 1] == 's' && is_consonant(chars[n - 3]) {
        return &word[..n - 3];
    }
    if n >= 2 && chars[n - 2] == 'e' && chars[n - 1] == 'd' {
        return &word[..n - 2];
    }
    if n >= 2 && chars[n - 1] == 'e' && is_consonant(chars[n - 2]) {
        return &word[..n - 2];
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_counts_basic() {
        let m = analyze_readability("Word word.");
        assert_eq!(m.word_count, 2);
        assert_eq!(m.sentence_count, 1);
        assert_eq!(m.paragraph_count, 1);
        assert_eq!(m.avg_sentence_length, 2.0);
    }

    #[test]
    fn test_sentence_split_on_terminator_runs() {
        let m = analyze_readability("One two. Three four!! Five six?");
        assert_eq!(m.sentence_count, 3);
        assert_eq!(m.word_count, 6);
        assert_eq!(m.avg_sentence_length, 2.0);
    }

    #[test]
    fn test_paragraph_split() {
        let m = analyze_readability("First paragraph here.\n\nSecond paragraph here.\n\nThird.");
        assert_eq!(m.paragraph_count, 3);
    }

    #[test]
    fn test_empty_text_floors() {
        let m = analyze_readability("");
        assert_eq!(m.word_count, 0);
        assert_eq!(m.sentence_count, 1);
        assert_eq!(m.paragraph_count, 1);
        assert_eq!(m.avg_sentence_length, 0.0);
        assert_eq!(m.avg_word_length, 0.0);
        // No words: the formula degenerates to its constant, clamped.
        assert_eq!(m.readability_score, 100.0);
    }

    #[test]
    fn test_no_terminators_floors_sentences() {
        let m = analyze_readability("a stream of words with no punctuation at all");
        assert_eq!(m.sentence_count, 1);
        assert_eq!(m.word_count, 9);
    }

    #[test]
    fn test_score_clamped_for_pathological_input() {
        // Many long polysyllabic "words" in one endless sentence push the
        // raw formula far below zero.
        let text = "internationalization ".repeat(200);
        let m = analyze_readability(&text);
        assert_eq!(m.readability_score, 0.0);
        assert_eq!(m.readability_grade, "Very Difficult (Professional)");

        // All one-letter words push it above 100.
        let text = "a a a a a a.";
        let m = analyze_readability(text);
        assert!(m.readability_score <= 100.0);
        assert!(m.readability_score >= 0.0);
    }

    #[rstest]
    #[case(95.0, "Very Easy (5th Grade)")]
    #[case(85.0, "Easy (6th Grade)")]
    #[case(75.0, "Fairly Easy (7th Grade)")]
    #[case(65.0, "Standard (8th-9th Grade)")]
    #[case(55.0, "Fairly Difficult (10th-12th)")]
    #[case(40.0, "Difficult (College)")]
    #[case(10.0, "Very Difficult (Professional)")]
    #[case(90.0, "Very Easy (5th Grade)")]
    #[case(30.0, "Difficult (College)")]
    fn test_grade_bands(#[case] score: f64, #[case] grade: &str) {
        assert_eq!(grade_for_score(score), grade);
    }

    #[rstest]
    #[case("a", 1)]
    #[case("the", 1)]
    #[case("word", 1)]
    #[case("hello", 2)]
    #[case("reading", 2)]
    #[case("syllable", 3)]
    #[case("rhythm", 1)] // the mid-word "y" is the only vowel run
    #[case("wanted", 1)] // "ed" stripped, single run remains
    #[case("makes", 1)] // consonant + "es" stripped with its consonant
    #[case("O'Neill", 2)] // punctuation stripped before counting
    #[case("12345", 1)] // no letters at all
    fn test_syllable_heuristic(#[case] word: &str, #[case] expected: usize) {
        assert_eq!(count_syllables(word), expected);
    }

    #[test]
    fn test_avg_word_length() {
        let m = analyze_readability("ab abcd.");
        assert_eq!(m.avg_word_length, 3.0);
    }
}
