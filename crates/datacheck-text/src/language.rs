//! Script-based language detection.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Unicode script ranges checked in order; ties go to the earlier entry.
static LANG_RANGES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    vec![
        ("zh", Regex::new(r"[\x{4E00}-\x{9FFF}\x{3400}-\x{4DBF}]").expect("zh range")),
        ("ja", Regex::new(r"[\x{3040}-\x{309F}\x{30A0}-\x{30FF}]").expect("ja range")),
        ("ko", Regex::new(r"[\x{AC00}-\x{D7AF}\x{1100}-\x{11FF}]").expect("ko range")),
        ("ar", Regex::new(r"[\x{0600}-\x{06FF}\x{0750}-\x{077F}]").expect("ar range")),
        ("ru", Regex::new(r"[\x{0400}-\x{04FF}]").expect("ru range")),
        ("th", Regex::new(r"[\x{0E00}-\x{0E7F}]").expect("th range")),
    ]
});

static LATIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").expect("latin range"));

/// Detect the dominant script of a text.
///
/// Returns a language code (`zh`, `ja`, `ko`, `ar`, `ru`, `th`, `latin`, or
/// `unknown`) and a confidence in [0, 1], rounded to two decimals.
pub fn detect_language(text: &str) -> (&'static str, f64) {
    if text.trim().chars().count() < 3 {
        return ("unknown", 0.0);
    }

    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    let mut total = 0usize;

    for (lang, pattern) in LANG_RANGES.iter() {
        let count = pattern.find_iter(text).count();
        if count > 0 {
            counts.push((lang, count));
            total += count;
        }
    }

    let latin_count = LATIN.find_iter(text).count();
    if latin_count > 0 {
        counts.push(("latin", latin_count));
        total += latin_count;
    }

    if total == 0 {
        return ("unknown", 0.0);
    }

    // First entry wins ties, keeping the range order authoritative.
    let mut dominant = "unknown";
    let mut count = 0usize;
    for (lang, n) in counts {
        if n > count {
            dominant = lang;
            count = n;
        }
    }
    let confidence = (count as f64 / total as f64 * 100.0).round() / 100.0;
    (dominant, confidence)
}

/// Whether all substantial text fields of the record agree on a dominant
/// language. Fields shorter than ten characters, or without a confident
/// detection, do not participate.
pub fn check_language_consistency(fields: &Map<String, Value>) -> bool {
    let mut languages = Vec::new();

    for value in fields.values() {
        let Value::String(text) = value else {
            continue;
        };
        if text.chars().count() <= 10 {
            continue;
        }
        let (lang, confidence) = detect_language(text);
        if lang != "unknown" && confidence > 0.3 {
            languages.push(lang);
        }
    }

    if languages.len() < 2 {
        return true;
    }
    languages.iter().all(|lang| *lang == languages[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn detects_dominant_scripts() {
        assert_eq!(detect_language("hello world").0, "latin");
        assert_eq!(detect_language("你好，世界，今天怎么样").0, "zh");
        assert_eq!(detect_language("Привет мир").0, "ru");
        assert_eq!(detect_language("??"), ("unknown", 0.0));
    }

    #[test]
    fn confidence_is_a_ratio() {
        let (lang, confidence) = detect_language("abc 你好吗朋友们");
        assert_eq!(lang, "zh");
        assert!(confidence > 0.5 && confidence < 1.0);
    }

    #[test]
    fn consistent_fields_pass() {
        assert!(check_language_consistency(&fields(json!({
            "instruction": "Write a short poem about rain",
            "response": "Rain falls gently on the quiet street",
        }))));
    }

    #[test]
    fn mixed_languages_fail() {
        assert!(!check_language_consistency(&fields(json!({
            "instruction": "Write a short poem about rain",
            "response": "雨点轻轻地落在安静的街道上面",
        }))));
    }

    #[test]
    fn single_text_field_is_vacuously_consistent() {
        assert!(check_language_consistency(&fields(json!({
            "instruction": "Only one long field here",
            "score": 5,
        }))));
    }
}
