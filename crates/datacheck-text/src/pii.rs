//! PII detection and redaction.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Ordered PII patterns with their redaction tokens. The national ID pattern
/// embeds a birth date and must run before the phone patterns, which would
/// otherwise consume part of the ID digits.
static PII_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern"),
            "[EMAIL]",
        ),
        (
            Regex::new(r"\d{6}(18|19|20)\d{2}(0[1-9]|1[0-2])(0[1-9]|[12]\d|3[01])\d{3}[\dXx]")
                .expect("national id pattern"),
            "[ID]",
        ),
        (Regex::new(r"1[3-9]\d{9}").expect("mobile pattern"), "[PHONE]"),
        (
            Regex::new(r"\+\d{1,3}[-.\s]?\d{4,14}").expect("international phone pattern"),
            "[PHONE]",
        ),
    ]
});

/// Whether the record is free of PII. Returns `false` if any string field
/// matches an email, national ID or phone number pattern.
pub fn check_pii(fields: &Map<String, Value>) -> bool {
    for value in fields.values() {
        let Value::String(text) = value else {
            continue;
        };
        if PII_PATTERNS.iter().any(|(pattern, _)| pattern.is_match(text)) {
            return false;
        }
    }
    true
}

/// Replace every PII match in `text` with its redaction token, applying the
/// patterns in detection order.
pub fn redact_pii(text: &str) -> String {
    let mut redacted = text.to_string();
    for (pattern, replacement) in PII_PATTERNS.iter() {
        redacted = pattern.replace_all(&redacted, *replacement).into_owned();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().expect("object").clone()
    }

    #[test]
    fn email_and_phone_are_detected() {
        assert!(!check_pii(&fields(json!({"text": "contact user@example.com"}))));
        assert!(!check_pii(&fields(json!({"text": "call 13812345678"}))));
        assert!(!check_pii(&fields(json!({"text": "call +86-13812345678"}))));
        assert!(check_pii(&fields(json!({"text": "Hello world"}))));
    }

    #[test]
    fn non_string_fields_are_ignored() {
        assert!(check_pii(&fields(json!({"n": 13812345678u64, "ok": true}))));
    }

    #[test]
    fn id_redacts_before_phone() {
        // An 18-digit ID contains an 11-digit run that looks like a mobile
        // number; the ID pattern must win.
        let text = "id 110101199003071234 end";
        assert_eq!(redact_pii(text), "id [ID] end");
    }

    #[test]
    fn redaction_covers_all_patterns() {
        let text = "a@b.com / 13812345678 / +1 5551234567";
        assert_eq!(redact_pii(text), "[EMAIL] / [PHONE] / [PHONE]");
    }
}
