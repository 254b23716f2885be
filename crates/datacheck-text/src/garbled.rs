//! Garbled / mis-decoded text detection.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

static GARBLED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f\x{FFFD}\x{FFFE}\x{FFFF}]").expect("garbled pattern")
});

/// Three or more consecutive Latin-1 supplement characters are a strong
/// mojibake signal (UTF-8 bytes decoded as Latin-1).
static ENCODING_ERROR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x{C0}-\x{FF}]{3,}").expect("encoding error pattern"));

/// Whether the record is free of garbled text. A string field of at least
/// five characters fails when control or replacement characters exceed 1% of
/// its length, or when it contains a mojibake run.
pub fn check_garbled_text(fields: &Map<String, Value>) -> bool {
    for value in fields.values() {
        let Value::String(text) = value else {
            continue;
        };
        let char_count = text.chars().count();
        if char_count < 5 {
            continue;
        }
        let garbled_count = GARBLED_PATTERN.find_iter(text).count();
        if garbled_count > 0 && garbled_count as f64 / char_count as f64 > 0.01 {
            return false;
        }
        if ENCODING_ERROR_PATTERN.is_match(text) {
            return false;
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
    fn clean_text_passes() {
        assert!(check_garbled_text(&fields(json!({"text": "A perfectly normal sentence."}))));
    }

    #[test]
    fn replacement_characters_fail_above_density() {
        let noisy = format!("bad \u{fffd}\u{fffd} text");
        assert!(!check_garbled_text(&fields(json!({"text": noisy}))));
    }

    #[test]
    fn sparse_control_characters_are_tolerated() {
        // One control character in 200 is under the 1% density threshold.
        let text = format!("{}{}", "a".repeat(199), '\u{0001}');
        assert!(check_garbled_text(&fields(json!({"text": text}))));
    }

    #[test]
    fn latin1_runs_fail() {
        assert!(!check_garbled_text(&fields(json!({"text": "caf\u{e9}\u{e8}\u{ea} corrupted"}))));
    }

    #[test]
    fn short_strings_are_skipped() {
        assert!(check_garbled_text(&fields(json!({"text": "\u{fffd}\u{fffd}"}))));
    }
}
