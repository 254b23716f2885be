//! Repetitive text detection.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Sentence terminators, CJK and Latin.
static SENTENCE_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[。！？\n.!?]+").expect("sentence split pattern"));

const MIN_TEXT_LEN: usize = 50;
const WINDOW_SIZE: usize = 10;

/// Whether the record is free of excessive repetition.
///
/// A string field of at least 50 characters fails when, split into sentences,
/// one sentence of more than five characters repeats at least three times and
/// accounts for over 30% of all sentences; or when, for text over 100
/// characters, one fixed 10-character window repeats more than three times
/// and covers over half of all windows.
pub fn check_repetitive_text(fields: &Map<String, Value>) -> bool {
    for value in fields.values() {
        let Value::String(text) = value else {
            continue;
        };
        let chars: Vec<char> = text.chars().collect();
        if chars.len() < MIN_TEXT_LEN {
            continue;
        }

        let segments: Vec<&str> = SENTENCE_SPLIT
            .split(text)
            .map(str::trim)
            .filter(|segment| segment.chars().count() > 5)
            .collect();

        if segments.len() >= 3 {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for segment in &segments {
                *counts.entry(segment).or_insert(0) += 1;
            }
            let most_common = counts.values().copied().max().unwrap_or(0);
            if most_common >= 3 && most_common as f64 / segments.len() as f64 > 0.3 {
                return false;
            }
        }

        if chars.len() > 100 {
            let mut windows: Vec<String> = Vec::new();
            let mut start = 0;
            while start + WINDOW_SIZE < chars.len() {
                windows.push(chars[start..start + WINDOW_SIZE].iter().collect());
                start += WINDOW_SIZE;
            }
            if !windows.is_empty() {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                for window in &windows {
                    *counts.entry(window).or_insert(0) += 1;
                }
                let top = counts.values().copied().max().unwrap_or(0);
                if top as f64 / windows.len() as f64 > 0.5 && top > 3 {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn varied_text_passes() {
        let text = "The first sentence is here. A second one follows. Then a third one, \
                    different again. Finally something else entirely.";
        assert!(check_repetitive_text(&fields(json!({"text": text}))));
    }

    #[test]
    fn repeated_sentences_fail() {
        let text = "This line repeats now. This line repeats now. This line repeats now.";
        assert!(!check_repetitive_text(&fields(json!({"text": text}))));
    }

    #[test]
    fn repeated_windows_fail() {
        // One 10-char block dominating a long text, with no sentence breaks.
        let text = "abcdefghij".repeat(15);
        assert!(!check_repetitive_text(&fields(json!({"text": text}))));
    }

    #[test]
    fn short_text_is_skipped() {
        assert!(check_repetitive_text(&fields(json!({"text": "short. short. short."}))));
    }

    #[test]
    fn cjk_terminators_split_sentences() {
        let text = "同样的一句话在这里不断地重复出现没完没了。\
                    同样的一句话在这里不断地重复出现没完没了。\
                    同样的一句话在这里不断地重复出现没完没了。";
        assert!(!check_repetitive_text(&fields(json!({"text": text}))));
    }
}
