//! Last-resort textual repair for near-JSON generation output.
//!
//! Only runs when strict parsing has already failed. Fixes a narrow class of
//! model habits: typographic quotes, `word"s` contraction mis-escaping,
//! unescaped interior quotes inside known long-text fields, trailing commas,
//! and literal newlines inside strings. The fixes are pattern-based and can
//! corrupt unrelated content that happens to look like the patterns -
//! accepted limitation, this is not general JSON repair.

use std::sync::OnceLock;

use regex_lite::Regex;

fn contraction() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\b(\w+)"s\b"#).expect("hardcoded pattern is valid"))
}

fn text_field_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)"(narration_text|history_entry|backstory|content|description|text)"\s*:\s*"(.*?)"\s*([,}\]])"#,
        )
        .expect("hardcoded pattern is valid")
    })
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([\]}])").expect("hardcoded pattern is valid"))
}

/// Apply the fixed sequence of textual corrections.
pub fn fix_json_common_errors(json_str: &str) -> String {
    // Replace smart quotes with plain quotes
    let fixed = json_str
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // Fix common contraction issues (e.g., He"s -> He's)
    let fixed = contraction().replace_all(&fixed, "${1}'s").into_owned();

    // Escape unescaped quotes inside likely long-text fields
    let fixed = escape_quotes_in_text_fields(&fixed);

    // Remove trailing commas in objects and arrays
    let fixed = trailing_comma().replace_all(&fixed, "${1}").into_owned();

    // Remove newline control characters
    fixed.replace('\r', "").replace('\n', "\\n")
}

/// Re-escape interior quotes in `"field": "value"` spans for the known
/// long-text fields. The span is taken up to the closing quote that precedes
/// a `,`, `}` or `]`, so a value containing unescaped quotes is captured
/// whole and re-escaped.
fn escape_quotes_in_text_fields(input: &str) -> String {
    let re = text_field_span();
    let mut out = String::with_capacity(input.len());
    let mut last = 0;

    for caps in re.captures_iter(input) {
        let (Some(whole), Some(key), Some(value), Some(close)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };

        // Unescape safe escapes first, then escape everything uniformly
        let unescaped = value.as_str().replace("\\\"", "\"");
        let escaped = unescaped.replace('"', "\\\"");

        out.push_str(&input[last..whole.start()]);
        out.push('"');
        out.push_str(key.as_str());
        out.push_str("\": \"");
        out.push_str(&escaped);
        out.push('"');
        out.push_str(close.as_str());
        last = whole.end();
    }

    out.push_str(&input[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_quotes_normalized() {
        let fixed = fix_json_common_errors("{\u{201c}key\u{201d}: \u{201c}it\u{2019}s\u{201d}}");
        assert_eq!(fixed, "{\"key\": \"it's\"}");
        assert!(!fixed.contains('\u{201c}'));
        assert!(!fixed.contains('\u{2019}'));
    }

    #[test]
    fn test_contraction_fix() {
        let fixed = fix_json_common_errors(r#"{"text": "He"s gone"}"#);
        assert!(fixed.contains("He's gone"));
    }

    #[test]
    fn test_trailing_commas_removed() {
        let fixed = fix_json_common_errors(r#"{"options": ["a", "b",], "x": 1,}"#);
        assert_eq!(fixed, r#"{"options": ["a", "b"], "x": 1}"#);
        assert!(serde_json::from_str::<serde_json::Value>(&fixed).is_ok());
    }

    #[test]
    fn test_interior_quotes_in_text_fields_escaped() {
        let broken = r#"{"narration_text": "She whispered "run" and fled", "mood_atmosphere": "tense"}"#;
        let fixed = fix_json_common_errors(broken);
        let value: serde_json::Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(
            value["narration_text"].as_str().unwrap(),
            r#"She whispered "run" and fled"#
        );
    }

    #[test]
    fn test_newlines_collapsed() {
        let fixed = fix_json_common_errors("{\"description\": \"line one\nline two\"}");
        assert!(fixed.contains("line one\\nline two"));
        assert!(!fixed.contains('\n'));
        assert!(serde_json::from_str::<serde_json::Value>(&fixed).is_ok());
    }

    #[test]
    fn test_combined_smart_quotes_and_trailing_comma_parse() {
        let broken = "{\u{201c}mood_atmosphere\u{201d}: \u{201c}grim\u{201d}, \"options\": [\"Run\", \"Hide\",],}";
        let fixed = fix_json_common_errors(broken);
        let value: serde_json::Value = serde_json::from_str(&fixed).unwrap();
        assert_eq!(value["mood_atmosphere"].as_str().unwrap(), "grim");
        assert!(!fixed.contains('\u{201c}'));
    }
}
