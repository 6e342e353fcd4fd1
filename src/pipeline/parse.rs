//! Response parsing: raw model reply → [`ExtractedFields`].
//!
//! Models asked for "only the JSON object" still tend to wrap it in a
//! ```` ```json ```` fence and leave a trailing comma after the last member.
//! Both are repaired here with cheap deterministic passes before decoding:
//!
//! 1. Strip a leading ```` ```json ```` / ```` ``` ```` marker and a trailing
//!    ```` ``` ```` marker, then trim.
//! 2. Drop any comma that is followed only by whitespace and then `}` or
//!    `]`. Commas inside string literals are left alone.
//! 3. Decode as JSON and pick out the five reply keys.

use crate::error::VersePinError;
use crate::record::{ExtractedFields, RawExtraction};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static RE_LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```(?:json)?").unwrap());
static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```$").unwrap());

/// Parse a reply into the five extraction fields.
///
/// Fails only when the cleaned text is not JSON at all; the error keeps the
/// reply exactly as received. A JSON value that is not an object (a list, a
/// number…) decodes to all-absent fields.
pub fn parse_reply(raw: &RawExtraction) -> Result<ExtractedFields, VersePinError> {
    let cleaned = clean_reply(raw.as_str());
    debug!("Cleaned reply: {} → {} bytes", raw.as_str().len(), cleaned.len());

    let value: Value = serde_json::from_str(&cleaned).map_err(|source| VersePinError::Parse {
        source,
        raw: raw.as_str().to_string(),
    })?;

    Ok(fields_from_value(&value))
}

/// Fence stripping followed by trailing-comma repair.
pub fn clean_reply(input: &str) -> String {
    let stripped = strip_code_fences(input);
    remove_trailing_commas(stripped.trim())
}

// ── Pass 1: code fences ──────────────────────────────────────────────────────

/// Remove one leading and one trailing fence marker.
///
/// Input without any fence marker is returned unchanged (not even trimmed).
pub fn strip_code_fences(input: &str) -> String {
    let trimmed = input.trim();
    let leading = RE_LEADING_FENCE.find(trimmed).map(|m| m.end());
    let without_leading = match leading {
        Some(end) => &trimmed[end..],
        None => trimmed,
    };
    let trailing = RE_TRAILING_FENCE.find(without_leading).map(|m| m.start());
    match (leading, trailing) {
        (None, None) => input.to_string(),
        (_, Some(start)) => without_leading[..start].trim().to_string(),
        (Some(_), None) => without_leading.trim().to_string(),
    }
}

// ── Pass 2: trailing commas ──────────────────────────────────────────────────

/// Drop commas that directly precede (modulo whitespace) a closing `}` or `]`.
pub fn remove_trailing_commas(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                result.push(c);
            }
            ',' => {
                let mut ahead = chars.clone();
                while ahead.peek().is_some_and(|n| n.is_whitespace()) {
                    ahead.next();
                }
                if !matches!(ahead.peek(), Some('}') | Some(']')) {
                    result.push(c);
                }
            }
            _ => result.push(c),
        }
    }

    result
}

// ── Pass 3: field selection ──────────────────────────────────────────────────

fn fields_from_value(value: &Value) -> ExtractedFields {
    let Some(map) = value.as_object() else {
        debug!("Reply decoded to a non-object; all fields absent");
        return ExtractedFields::default();
    };

    let field = |key: &str| match map.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    };

    ExtractedFields {
        title: field("title"),
        malayalam_verse: field("extracted_bible_verse_malayalam"),
        english_translation: field("bible_verse_english_translation"),
        alt_text_source: field("alternative_text_for_main_content"),
        confidence_level: field("confidence_level"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ExtractedFields, VersePinError> {
        parse_reply(&RawExtraction::from(s))
    }

    #[test]
    fn strip_fences_with_language_tag() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strip_fences_without_tag() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn strip_fences_is_noop_without_markers() {
        for s in ["{\"a\": 1}", "  {\"a\": 1}\n", "", "plain text", "a ` b `` c"] {
            assert_eq!(strip_code_fences(s), s);
        }
    }

    #[test]
    fn strip_lone_closing_fence() {
        assert_eq!(strip_code_fences("{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn trailing_comma_before_brace_and_bracket() {
        assert_eq!(remove_trailing_commas("{\"a\": 1,\n}"), "{\"a\": 1\n}");
        assert_eq!(remove_trailing_commas("[1, 2,]"), "[1, 2]");
        assert_eq!(remove_trailing_commas("{\"a\": [1,],}"), "{\"a\": [1]}");
    }

    #[test]
    fn comma_inside_string_is_kept() {
        let s = r#"{"a": "x,}", "b": "y\",]"}"#;
        assert_eq!(remove_trailing_commas(s), s);
    }

    #[test]
    fn trailing_comma_repair_recovers_document() {
        let original = serde_json::json!({
            "title": "Psalm 23:1",
            "nested": {"list": [1, 2, {"k": "v"}]},
            "empty": []
        });
        let text = serde_json::to_string_pretty(&original).unwrap();
        let last = text.rfind('}').unwrap();
        let broken = format!("{},{}", &text[..last], &text[last..]);
        assert!(serde_json::from_str::<Value>(&broken).is_err());

        let repaired: Value = serde_json::from_str(&remove_trailing_commas(&broken)).unwrap();
        assert_eq!(repaired, original);
    }

    #[test]
    fn full_reply_with_all_keys() {
        let fields = parse(
            r#"{"title":"Psalm 23:1","extracted_bible_verse_malayalam":"യഹോവ എന്റെ ഇടയനാകുന്നു","bible_verse_english_translation":"The Lord is my shepherd","alternative_text_for_main_content":"Verse over green hills","confidence_level":"medium"}"#,
        )
        .unwrap();
        assert_eq!(fields.title.as_deref(), Some("Psalm 23:1"));
        assert_eq!(fields.malayalam_verse.as_deref(), Some("യഹോവ എന്റെ ഇടയനാകുന്നു"));
        assert_eq!(fields.english_translation.as_deref(), Some("The Lord is my shepherd"));
        assert_eq!(fields.alt_text_source.as_deref(), Some("Verse over green hills"));
        assert_eq!(fields.confidence_level.as_deref(), Some("medium"));
    }

    #[test]
    fn missing_keys_are_absent_and_present_keys_verbatim() {
        let fields = parse(r#"{"title":"  John 1:1 ","confidence_level":"HIGH","extra":"x"}"#).unwrap();
        assert_eq!(fields.title.as_deref(), Some("  John 1:1 "));
        assert_eq!(fields.confidence_level.as_deref(), Some("HIGH"));
        assert!(fields.malayalam_verse.is_none());
        assert!(fields.english_translation.is_none());
        assert!(fields.alt_text_source.is_none());
    }

    #[test]
    fn null_values_are_absent() {
        let fields = parse(r#"{"title": null, "confidence_level": "low"}"#).unwrap();
        assert!(fields.title.is_none());
    }

    #[test]
    fn non_object_json_yields_all_absent() {
        assert_eq!(parse("[1, 2, 3]").unwrap(), ExtractedFields::default());
        assert_eq!(parse("\"just a string\"").unwrap(), ExtractedFields::default());
        assert_eq!(parse("42").unwrap(), ExtractedFields::default());
    }

    #[test]
    fn malformed_reply_keeps_raw_text() {
        let raw = "```json\nI could not read this image.\n```";
        match parse(raw) {
            Err(VersePinError::Parse { raw: kept, .. }) => assert_eq!(kept, raw),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn fenced_reply_with_trailing_comma() {
        let raw = "```json\n{\"title\":\"John 3:16\",\"confidence_level\":\"HIGH\",}\n```";
        let fields = parse(raw).unwrap();
        assert_eq!(fields.title.as_deref(), Some("John 3:16"));
        assert_eq!(fields.confidence_level.as_deref(), Some("HIGH"));
    }
}
