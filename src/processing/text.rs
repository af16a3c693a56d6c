//! Text normalization, contact patterns and keyword tokenization

use crate::processing::taxonomy::is_stop_word;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("Invalid email regex")
});

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-. \t]?)?\(?\d{1,4}\)?[-. \t]?\d{1,4}[-. \t]?\d{1,9}")
        .expect("Invalid phone regex")
});

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("Invalid token separator regex"));

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 14;

/// Normalize raw extracted text: strip a BOM, unify line endings, and fold
/// typographic quotes and dashes to ASCII.
pub fn normalize(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            _ => c,
        })
        .collect()
}

/// First email-shaped substring, or empty.
pub fn find_email(text: &str) -> String {
    EMAIL_RE
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// First phone-shaped substring carrying 7 to 14 digits, or empty.
pub fn find_phone(text: &str) -> String {
    PHONE_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits)
        })
        .map(str::to_string)
        .unwrap_or_default()
}

/// Lowercase tokens longer than three characters, without stop words or
/// pure numbers, deduplicated in first-seen order and capped at `limit`.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();

    NON_WORD_RE
        .split(&lowered)
        .filter(|word| word.len() > 3)
        .filter(|word| !is_stop_word(word))
        .filter(|word| !word.chars().all(|c| c.is_ascii_digit()))
        .filter(|word| seen.insert(word.to_string()))
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// "jOHN" -> "John"
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
