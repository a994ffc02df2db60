//! JSON extraction from noisy model output
//!
//! Models wrap tool payloads in prose ("Sure! Here you go: {...} Thanks").
//! Extraction is a single linear scan: find the earliest `{` or `[` (brace
//! wins ties), walk forward tracking bracket depth with a string/escape
//! state machine, slice the balanced span, and keep it only if it parses.
//!
//! Absence of a balanced span is a normal "nothing to extract" outcome, not
//! an error; the scan never panics on malformed input.

use serde_json::Value;

/// Extract the first complete JSON value embedded in `text`.
///
/// A directly-parseable input is returned unchanged.
pub fn extract_json(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }

    if serde_json::from_str::<Value>(text).is_ok() {
        return Some(text.to_string());
    }

    let trimmed = text.trim();
    let open_brace = trimmed.find('{');
    let open_bracket = trimmed.find('[');
    let start = match (open_brace, open_bracket) {
        (Some(brace), Some(bracket)) => {
            if brace <= bracket {
                brace
            } else {
                bracket
            }
        }
        (Some(brace), None) => brace,
        (None, Some(bracket)) => bracket,
        (None, None) => return None,
    };

    let end = find_closing(trimmed, start)?;
    let candidate = &trimmed[start..=end];

    if serde_json::from_str::<Value>(candidate).is_ok() {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// Index of the bracket closing the one at `open_index`, if balanced.
///
/// Brackets inside quoted strings are ignored; backslash escapes are
/// honored so an escaped quote does not end the string state.
fn find_closing(text: &str, open_index: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = bytes[open_index];
    let close = if open == b'{' { b'}' } else { b']' };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in bytes.iter().enumerate().skip(open_index) {
        if escaped {
            escaped = false;
            continue;
        }
        if c == b'\\' && in_string {
            escaped = true;
            continue;
        }
        if c == b'"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }

        if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let result = extract_json("Sure! Here you go: {\"a\":1} Thanks");

        assert_eq!(result.as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn valid_input_is_returned_unchanged() {
        let input = "  {\"a\": 1}  ";

        assert_eq!(extract_json(input).as_deref(), Some(input));
    }

    #[test]
    fn extracts_arrays() {
        let result = extract_json("The result is [1, 2, 3] as requested.");

        assert_eq!(result.as_deref(), Some("[1, 2, 3]"));
    }

    #[test]
    fn earliest_opener_wins() {
        let result = extract_json("noise [1,2] then {\"a\":1}");

        assert_eq!(result.as_deref(), Some("[1,2]"));
    }

    #[test]
    fn brackets_inside_strings_are_ignored() {
        let result = extract_json("text {\"key\": \"value with } brace\"} more");

        assert_eq!(result.as_deref(), Some("{\"key\": \"value with } brace\"}"));
    }

    #[test]
    fn escaped_quotes_do_not_end_the_string_state() {
        let result = extract_json(r#"out {"key": "quoted \" and } inside"} end"#);

        assert_eq!(result.as_deref(), Some(r#"{"key": "quoted \" and } inside"}"#));
    }

    #[test]
    fn nested_objects_are_sliced_whole() {
        let result = extract_json("x {\"a\": {\"b\": [1, {\"c\": 2}]}} y");

        assert_eq!(result.as_deref(), Some("{\"a\": {\"b\": [1, {\"c\": 2}]}}"));
    }

    #[test]
    fn unbalanced_input_yields_nothing() {
        assert!(extract_json("start {\"a\": 1 and never closed").is_none());
    }

    #[test]
    fn input_without_json_yields_nothing() {
        assert!(extract_json("no structured data here").is_none());
        assert!(extract_json("").is_none());
        assert!(extract_json("   ").is_none());
    }

    #[test]
    fn balanced_but_invalid_span_yields_nothing() {
        assert!(extract_json("oops {not json at all} sorry").is_none());
    }

    #[test]
    fn round_trips_embedded_values() {
        let cases = [
            ("prefix {\"k\": [true, null, 1.5]} suffix", "{\"k\": [true, null, 1.5]}"),
            ("[\"a\", \"b\"] trailing", "[\"a\", \"b\"]"),
        ];

        for (input, expected) in cases {
            let extracted = extract_json(input).unwrap();
            assert_eq!(extracted, expected);
            let original: Value = serde_json::from_str(expected).unwrap();
            let parsed: Value = serde_json::from_str(&extracted).unwrap();
            assert_eq!(parsed, original);
        }
    }

    #[test]
    fn never_panics_on_garbage() {
        for garbage in ["}{", "]{[", "\"", "\\", "{\"a\\", "日本語 { テスト"] {
            let _ = extract_json(garbage);
        }
    }
}
