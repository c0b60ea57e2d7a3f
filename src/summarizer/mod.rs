//! Extractive description generator
//!
//! Descriptions are built only from sentences already present in the input:
//! the text is cleaned, split into sentences, the candidates are scored with
//! fixed heuristics and the best few are joined in document order. The same
//! input always yields the same description.

use crate::config::SummarizerConfig;
use crate::content::collapse_whitespace;
use regex::Regex;
use std::sync::LazyLock;

/// Only this many leading sentences are scored
const MAX_SCORED_SENTENCES: usize = 20;

/// Accepted sentence length range, in characters
const MIN_SENTENCE_CHARS: usize = 20;
const MAX_SENTENCE_CHARS: usize = 300;

/// Hard cap on a description, in characters
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Verbs that mark a sentence as describing functionality
const ACTION_WORDS: &[&str] = &[
    "provides",
    "enables",
    "allows",
    "supports",
    "manages",
    "handles",
    "processes",
    "creates",
    "generates",
    "sends",
    "receives",
    "configures",
    "sets",
    "displays",
    "shows",
];

// Everything from a lead-in phrase to the end of the text is dropped
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:See also:|Related:|Note:|Warning:|Example:|For more information|Click here|Learn more).*",
    )
    .expect("Failed to compile noise regex")
});

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("Failed to compile URL regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("Failed to compile email regex"));

static NAVIGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:[A-Z][a-z]+\s+→|Click\s+|Select\s+|Navigate\s+to|Go\s+to|Menu\s*:|Home\s*$|Back\s*$)",
    )
    .expect("Failed to compile navigation regex")
});

/// Extractive summarizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summarizer {
    max_sentences: usize,
    min_length: usize,
}

impl Default for Summarizer {
    fn default() -> Self {
        Self::from_config(&SummarizerConfig::default())
    }
}

impl Summarizer {
    /// Creates a summarizer
    ///
    /// # Arguments
    ///
    /// * `max_sentences` - Sentences kept per description
    /// * `min_length` - Inputs and results shorter than this (in characters) yield ""
    pub fn new(max_sentences: usize, min_length: usize) -> Self {
        Self {
            max_sentences,
            min_length,
        }
    }

    pub fn from_config(config: &SummarizerConfig) -> Self {
        Self::new(config.max_sentences, config.min_length)
    }

    /// Generates a description for `content`
    ///
    /// Returns an empty string when the content is too short or holds no
    /// usable sentence. Non-empty results end in `.`, `!` or `?`.
    pub fn describe(&self, content: &str) -> String {
        if content.trim().chars().count() < self.min_length {
            return String::new();
        }

        let cleaned = clean_content(content);
        let sentences = candidate_sentences(&cleaned);
        if sentences.is_empty() {
            return String::new();
        }

        let selected = self.select(&sentences);
        self.finalize(&selected.join(" "))
    }

    /// Best-scoring sentences, back in document order
    fn select<'a>(&self, sentences: &[&'a str]) -> Vec<&'a str> {
        let mut scored: Vec<(usize, f64)> = sentences
            .iter()
            .take(MAX_SCORED_SENTENCES)
            .enumerate()
            .map(|(index, sentence)| (index, score_sentence(sentence)))
            .collect();

        // Stable: equal scores keep document order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut chosen: Vec<usize> = scored
            .into_iter()
            .take(self.max_sentences)
            .map(|(index, _)| index)
            .collect();
        chosen.sort_unstable();

        if chosen.is_empty() {
            return sentences.iter().take(self.max_sentences).copied().collect();
        }
        chosen.into_iter().map(|index| sentences[index]).collect()
    }

    fn finalize(&self, text: &str) -> String {
        let mut description = collapse_whitespace(text);

        match description.chars().last() {
            Some('.' | '!' | '?') | None => {}
            Some(_) => description.push('.'),
        }

        if description.chars().count() < self.min_length {
            return String::new();
        }

        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            description = truncate_to_sentences(&description, MAX_DESCRIPTION_CHARS);
        }

        description.trim().to_string()
    }
}

/// Generates a description with the default settings
///
/// # Examples
///
/// ```
/// use docmap::describe;
///
/// assert_eq!(describe("short"), "");
///
/// let text = "The billing service generates an invoice for every account each month";
/// assert_eq!(
///     describe(text),
///     "The billing service generates an invoice for every account each month."
/// );
/// ```
pub fn describe(content: &str) -> String {
    Summarizer::default().describe(content)
}

fn clean_content(content: &str) -> String {
    let text = collapse_whitespace(content);
    let text = NOISE_RE.replace_all(&text, "");
    let text = URL_RE.replace_all(&text, "");
    let text = EMAIL_RE.replace_all(&text, "");
    text.trim().to_string()
}

/// Sentences within the length range that do not look like navigation
fn candidate_sentences(text: &str) -> Vec<&str> {
    split_sentences(text)
        .into_iter()
        .map(str::trim)
        .filter(|sentence| {
            let len = sentence.chars().count();
            (MIN_SENTENCE_CHARS..=MAX_SENTENCE_CHARS).contains(&len)
        })
        .filter(|sentence| !NAVIGATION_RE.is_match(sentence))
        .collect()
}

/// Splits on whitespace runs that follow `.`, `!` or `?`
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut after_terminal = false;
    let mut in_break = false;

    for (index, c) in text.char_indices() {
        if c.is_whitespace() {
            if after_terminal && !in_break {
                sentences.push(&text[start..index]);
                in_break = true;
            }
            if in_break {
                start = index + c.len_utf8();
            }
            after_terminal = false;
        } else {
            in_break = false;
            after_terminal = matches!(c, '.' | '!' | '?');
        }
    }

    sentences.push(&text[start..]);
    sentences
}

fn score_sentence(sentence: &str) -> f64 {
    let mut score = 0.0;
    let lowered = sentence.to_lowercase();
    let len = sentence.chars().count();

    if ACTION_WORDS.iter().any(|word| lowered.contains(word)) {
        score += 2.0;
    }

    if sentence.contains('?') {
        score -= 1.0;
    }

    if sentence.split_whitespace().count() >= 8 {
        score += 1.0;
    }

    let uppercase = sentence.chars().filter(|c| c.is_uppercase()).count();
    if uppercase as f64 > len as f64 * 0.3 {
        score -= 2.0;
    }

    if len < 40 {
        score -= 0.5;
    }

    score
}

/// Keeps whole sentences while they fit in `budget` characters
fn truncate_to_sentences(text: &str, budget: usize) -> String {
    let mut kept = Vec::new();
    let mut length = 0;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if length + len > budget {
            break;
        }
        kept.push(sentence);
        length += len + 1;
    }

    kept.join(" ")
}
