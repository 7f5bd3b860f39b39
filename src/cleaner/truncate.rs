use std::sync::LazyLock;

use regex::Regex;

static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());

/// Shorten `text` to at most `max_chars` characters, preferring whole
/// sentences. When not even the first sentence fits, cut at a word boundary
/// and append `...`.
pub fn smart_truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let mut result = String::new();
    for sentence in SENTENCE_SPLIT_RE.split(text) {
        let candidate = format!("{result}{sentence}.");
        if candidate.chars().count() > max_chars {
            break;
        }
        result = candidate;
    }

    if result.is_empty() {
        for word in text.split(' ') {
            let candidate = if result.is_empty() {
                word.to_string()
            } else {
                format!("{result} {word}")
            };
            if candidate.chars().count() > max_chars {
                break;
            }
            result = candidate;
        }
        result.push_str("...");
    }

    result.trim().to_string()
}
