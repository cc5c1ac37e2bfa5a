//! Text analyzer.
//! Maps a document's text to the fixed set of word, character and sentence
//! statistics. Stateless and re-entrant; safe to call from any worker.

use std::collections::{HashMap, HashSet};

use crate::domain::metrics::{Metric, MetricResult};

/// Placeholder shown when a word-identity metric has no candidate.
pub const NO_WORD: &str = "-";

/// Number of entries reported under [`Metric::TopWords`].
pub const TOP_WORDS: usize = 5;

pub struct TextAnalyzer;

impl TextAnalyzer {
    pub fn analyze(text: &str) -> MetricResult {
        if text.trim().is_empty() {
            return empty_result();
        }

        let lowered = text.to_lowercase();
        let tokens = tokenize(&lowered);
        let total_words = tokens.len();

        let unique_words = tokens.iter().collect::<HashSet<_>>().len();

        let freq = FrequencyTable::build(&tokens);

        let chars_with_spaces = code_units(text);
        let chars_no_spaces = code_units(&text.replace(' ', ""));

        let sentences = sentence_count(text);

        let total_length: usize = tokens.iter().map(|t| code_units(t)).sum();

        let (longest, shortest) = longest_and_shortest(&tokens);

        let most_frequent = freq
            .most_frequent
            .map(|(word, count)| format!("{} ({})", word, count))
            .unwrap_or_else(|| NO_WORD.to_string());

        MetricResult::from_values([
            total_words.to_string(),
            unique_words.to_string(),
            most_frequent,
            chars_with_spaces.to_string(),
            chars_no_spaces.to_string(),
            sentences.to_string(),
            format_average(total_length, total_words),
            longest.unwrap_or(NO_WORD).to_string(),
            shortest.unwrap_or(NO_WORD).to_string(),
            freq.top(TOP_WORDS),
        ])
    }
}

fn empty_result() -> MetricResult {
    MetricResult::from_values(Metric::ALL.map(|metric| match metric {
        Metric::MostFrequentWord
        | Metric::LongestWord
        | Metric::ShortestWord
        | Metric::TopWords => NO_WORD.to_string(),
        _ => "0".to_string(),
    }))
}

/// `[A-Za-z0-9_]`; every other character, accented letters included, separates words.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Splits `text` on maximal runs of delimiter characters.
///
/// Every run closes the current segment, so a leading run yields a leading
/// empty segment and a trailing run yields a trailing empty segment.
fn split_runs(text: &str, is_delim: impl Fn(char) -> bool) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_run = false;

    for (idx, c) in text.char_indices() {
        if is_delim(c) {
            if !in_run {
                segments.push(&text[start..idx]);
                in_run = true;
            }
        } else if in_run {
            start = idx;
            in_run = false;
        }
    }
    segments.push(if in_run { "" } else { &text[start..] });
    segments
}

/// Word tokens of already-lowercased text.
///
/// Leading empty tokens are kept; trailing empty tokens are dropped unless
/// nothing else remains, in which case a single empty token is returned.
pub fn tokenize(lowered: &str) -> Vec<&str> {
    let mut tokens = split_runs(lowered, |c| !is_word_char(c));
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Segments between runs of `.`, `!` and `?`.
///
/// A trailing empty segment counts; a run at the very start does not open one.
pub fn sentence_count(text: &str) -> usize {
    let segments = split_runs(text, is_sentence_terminator);
    let leading_empty = segments.len() > 1 && segments[0].is_empty();
    segments.len() - usize::from(leading_empty)
}

/// UTF-16 code units, the unit all lengths are reported in.
fn code_units(s: &str) -> usize {
    s.encode_utf16().count()
}

fn is_blank(token: &str) -> bool {
    token.trim().is_empty()
}

/// Mean token length with two decimals, rounding half away from zero.
fn format_average(total_length: usize, total_words: usize) -> String {
    if total_words == 0 {
        return "0.00".to_string();
    }
    let hundredths = (total_length * 200 + total_words) / (2 * total_words);
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

fn longest_and_shortest<'a>(tokens: &[&'a str]) -> (Option<&'a str>, Option<&'a str>) {
    let mut longest: Option<(&'a str, usize)> = None;
    let mut shortest: Option<(&'a str, usize)> = None;

    for &token in tokens.iter().filter(|t| !is_blank(t)) {
        let len = code_units(token);
        if longest.map_or(true, |(_, l)| len > l) {
            longest = Some((token, len));
        }
        if shortest.map_or(true, |(_, l)| len < l) {
            shortest = Some((token, len));
        }
    }
    (longest.map(|(t, _)| t), shortest.map(|(t, _)| t))
}

/// Occurrence counts of non-blank tokens in first-seen order.
struct FrequencyTable<'a> {
    counts: Vec<(&'a str, usize)>,
    most_frequent: Option<(&'a str, usize)>,
}

impl<'a> FrequencyTable<'a> {
    fn build(tokens: &[&'a str]) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut counts: Vec<(&'a str, usize)> = Vec::new();
        let mut most_frequent: Option<(&'a str, usize)> = None;

        for &token in tokens.iter().filter(|t| !is_blank(t)) {
            let slot = *index.entry(token).or_insert_with(|| {
                counts.push((token, 0));
                counts.len() - 1
            });
            counts[slot].1 += 1;

            let count = counts[slot].1;
            // Strictly greater: an equal count never displaces the incumbent.
            if most_frequent.map_or(true, |(_, max)| count > max) {
                most_frequent = Some((token, count));
            }
        }

        Self { counts, most_frequent }
    }

    /// `"w1 (c1), w2 (c2), ..."` by descending count, first-seen order on ties.
    fn top(&self, n: usize) -> String {
        if self.counts.is_empty() {
            return NO_WORD.to_string();
        }
        let mut ranked = self.counts.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
            .iter()
            .take(n)
            .map(|(word, count)| format!("{} ({})", word, count))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(result: &MetricResult, m: Metric) -> String {
        result.get(m).to_string()
    }

    #[test]
    fn test_empty_input() {
        let r = TextAnalyzer::analyze("");
        assert_eq!(metric(&r, Metric::TotalWords), "0");
        assert_eq!(metric(&r, Metric::UniqueWords), "0");
        assert_eq!(metric(&r, Metric::MostFrequentWord), "-");
        assert_eq!(metric(&r, Metric::CharactersWithSpaces), "0");
        assert_eq!(metric(&r, Metric::CharactersNoSpaces), "0");
        assert_eq!(metric(&r, Metric::SentenceCount), "0");
        assert_eq!(metric(&r, Metric::AverageWordLength), "0");
        assert_eq!(metric(&r, Metric::LongestWord), "-");
        assert_eq!(metric(&r, Metric::ShortestWord), "-");
        assert_eq!(metric(&r, Metric::TopWords), "-");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert_eq!(TextAnalyzer::analyze(" \t\n  "), TextAnalyzer::analyze(""));
    }

    #[test]
    fn test_simple_sentence() {
        let r = TextAnalyzer::analyze("The cat sat on the mat.");
        assert_eq!(metric(&r, Metric::TotalWords), "6");
        assert_eq!(metric(&r, Metric::UniqueWords), "5");
        assert_eq!(metric(&r, Metric::MostFrequentWord), "the (2)");
        assert_eq!(metric(&r, Metric::CharactersWithSpaces), "23");
        assert_eq!(metric(&r, Metric::CharactersNoSpaces), "18");
        assert_eq!(metric(&r, Metric::SentenceCount), "2");
        // 3 + 3 + 3 + 2 + 3 + 3 = 17 over 6 tokens
        assert_eq!(metric(&r, Metric::AverageWordLength), "2.83");
        assert_eq!(metric(&r, Metric::LongestWord), "the");
        assert_eq!(metric(&r, Metric::ShortestWord), "on");
        assert_eq!(
            metric(&r, Metric::TopWords),
            "the (2), cat (1), sat (1), on (1), mat (1)"
        );
    }

    #[test]
    fn test_punctuation_only() {
        let r = TextAnalyzer::analyze("!!!");
        assert_eq!(metric(&r, Metric::TotalWords), "1");
        assert_eq!(metric(&r, Metric::UniqueWords), "1");
        assert_eq!(metric(&r, Metric::MostFrequentWord), "-");
        assert_eq!(metric(&r, Metric::CharactersWithSpaces), "3");
        assert_eq!(metric(&r, Metric::SentenceCount), "1");
        assert_eq!(metric(&r, Metric::AverageWordLength), "0.00");
        assert_eq!(metric(&r, Metric::LongestWord), "-");
        assert_eq!(metric(&r, Metric::TopWords), "-");
    }

    #[test]
    fn test_tokenize_keeps_leading_empty_token() {
        assert_eq!(tokenize("  hello world"), vec!["", "hello", "world"]);
        assert_eq!(tokenize("hello, world!!"), vec!["hello", "world"]);
        assert_eq!(tokenize("snake_case 42"), vec!["snake_case", "42"]);
    }

    #[test]
    fn test_sentence_count_segments() {
        assert_eq!(sentence_count("One. Two! Three?"), 4);
        assert_eq!(sentence_count("No terminator"), 1);
        assert_eq!(sentence_count("...Wait"), 1);
        assert_eq!(sentence_count("Really?!? Yes."), 3);
    }

    #[test]
    fn test_no_spaces_keeps_other_whitespace() {
        let r = TextAnalyzer::analyze("a b\tc\nd");
        assert_eq!(metric(&r, Metric::CharactersWithSpaces), "7");
        assert_eq!(metric(&r, Metric::CharactersNoSpaces), "6");
    }

    #[test]
    fn test_most_frequent_tie_keeps_first_to_reach_max() {
        let r = TextAnalyzer::analyze("b a a b");
        // "a" reaches 2 first; "b" only ties it.
        assert_eq!(metric(&r, Metric::MostFrequentWord), "a (2)");
    }

    #[test]
    fn test_top_words_ties_use_first_seen_order() {
        let r = TextAnalyzer::analyze("z y x w v u z u");
        assert_eq!(
            metric(&r, Metric::TopWords),
            "z (2), u (2), y (1), x (1), w (1)"
        );
    }

    #[test]
    fn test_lowercasing_merges_words() {
        let r = TextAnalyzer::analyze("Rust rust RUST");
        assert_eq!(metric(&r, Metric::UniqueWords), "1");
        assert_eq!(metric(&r, Metric::MostFrequentWord), "rust (3)");
    }

    #[test]
    fn test_average_rounds_half_up() {
        // 25 / 8 = 3.125
        assert_eq!(format_average(25, 8), "3.13");
        assert_eq!(format_average(10, 3), "3.33");
        assert_eq!(format_average(0, 0), "0.00");
    }

    #[test]
    fn test_lengths_in_utf16_units() {
        let r = TextAnalyzer::analyze("na\u{ef}ve \u{1F600}");
        assert_eq!(metric(&r, Metric::CharactersWithSpaces), "8");
        assert_eq!(metric(&r, Metric::CharactersNoSpaces), "7");
        // the non-ASCII letter splits the word
        assert_eq!(metric(&r, Metric::TotalWords), "2");
        assert_eq!(metric(&r, Metric::LongestWord), "na");
    }

    #[test]
    fn test_word_chars_are_ascii_only() {
        assert_eq!(tokenize("x\u{b2} y"), vec!["x", "y"]);
        assert_eq!(tokenize("\u{bd} cup"), vec!["", "cup"]);
        assert_eq!(tokenize("cafe\u{301} au lait"), vec!["cafe", "au", "lait"]);
        assert_eq!(tokenize("\u{fc}ber"), vec!["", "ber"]);

        let r = TextAnalyzer::analyze("\u{bd} cup");
        assert_eq!(metric(&r, Metric::TopWords), "cup (1)");
        assert_eq!(metric(&r, Metric::TotalWords), "2");
    }

    #[test]
    fn test_always_ten_keys_in_order() {
        for input in ["", "!!!", "hello", "A. B? C!", "  leading"] {
            let r = TextAnalyzer::analyze(input);
            let keys: Vec<Metric> = r.iter().map(|(m, _)| m).collect();
            assert_eq!(keys, Metric::ALL.to_vec());
        }
    }

    #[test]
    fn test_deterministic() {
        let text = "one two three two one four five six one";
        assert_eq!(TextAnalyzer::analyze(text), TextAnalyzer::analyze(text));
    }
}
