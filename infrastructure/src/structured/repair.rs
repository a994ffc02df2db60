//! Heuristic JSON repair
//!
//! Attempts to repair the handful of syntax mistakes language models
//! actually make: trailing commas, typographic quotes, single-quoted or
//! unquoted keys, unterminated strings, and unbalanced brackets. Repairs
//! are deterministic, applied in a fixed order, and recorded by name so
//! callers can see exactly what was changed.
//!
//! This is not a general-purpose JSON fixer; input that stays invalid after
//! the full pass fails with a diagnostic.

use argos_domain::RepairResult;
use serde_json::Value;

/// Applies ordered repair heuristics to malformed model JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Attempt to repair `json`, returning immediately when already valid.
    pub fn try_repair(&self, json: &str) -> RepairResult {
        if json.trim().is_empty() {
            return RepairResult::failed(json, "Input is empty or whitespace");
        }

        if is_valid_json(json) {
            return RepairResult::already_valid(json);
        }

        let mut result = json.to_string();
        let mut repairs = Vec::new();

        // Ordered roughly by how often each mistake shows up in model output.
        let passes: [(&str, fn(&str) -> (String, bool)); 7] = [
            ("removed_trailing_commas", remove_trailing_commas),
            ("normalized_smart_quotes", normalize_smart_quotes),
            ("replaced_single_quotes", replace_single_quotes),
            ("quoted_unquoted_keys", quote_unquoted_keys),
            ("closed_unclosed_string", close_unclosed_string),
            ("balanced_braces", balance_braces),
            ("balanced_brackets", balance_brackets),
        ];

        for (name, pass) in passes {
            let (next, applied) = pass(&result);
            if applied {
                result = next;
                repairs.push(name.to_string());
            }
        }

        if is_valid_json(&result) {
            tracing::debug!(repairs = ?repairs, "Repaired malformed JSON");
            RepairResult::repaired(json, result, repairs)
        } else {
            RepairResult::failed(json, "Unable to repair JSON after applying heuristics")
        }
    }
}

fn is_valid_json(json: &str) -> bool {
    serde_json::from_str::<Value>(json).is_ok()
}

/// Remove commas directly preceding a closing brace or bracket.
fn remove_trailing_commas(json: &str) -> (String, bool) {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    let applied = out != json;
    (out, applied)
}

/// Replace typographic quotes with their ASCII forms.
fn normalize_smart_quotes(json: &str) -> (String, bool) {
    let out: String = json
        .chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect();

    let applied = out != json;
    (out, applied)
}

/// Replace single quotes with double quotes outside double-quoted strings.
fn replace_single_quotes(json: &str) -> (String, bool) {
    let mut out = String::with_capacity(json.len());
    let mut in_double_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if escaped {
            escaped = false;
            out.push(c);
            continue;
        }
        match c {
            '\\' => {
                escaped = true;
                out.push(c);
            }
            '"' => {
                in_double_string = !in_double_string;
                out.push(c);
            }
            '\'' if !in_double_string => out.push('"'),
            other => out.push(other),
        }
    }

    let applied = out != json;
    (out, applied)
}

/// Quote bare property keys (`{key: 1}` → `{"key": 1}`).
fn quote_unquoted_keys(json: &str) -> (String, bool) {
    let chars: Vec<char> = json.chars().collect();
    let mut out = String::with_capacity(json.len() + 8);
    let mut in_string = false;
    let mut escaped = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if escaped {
            escaped = false;
            out.push(c);
            i += 1;
            continue;
        }
        if c == '\\' && in_string {
            escaped = true;
            out.push(c);
            i += 1;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            out.push(c);
            i += 1;
            continue;
        }

        if !in_string && (c == '{' || c == ',') {
            out.push(c);
            i += 1;

            while i < chars.len() && chars[i].is_whitespace() {
                out.push(chars[i]);
                i += 1;
            }

            // A bare identifier followed by a colon is an unquoted key.
            if i < chars.len() && (chars[i].is_alphabetic() || chars[i] == '_') {
                let key_start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let key: String = chars[key_start..i].iter().collect();

                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }

                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&key);
                    out.push('"');
                } else {
                    out.push_str(&key);
                }
            }
            continue;
        }

        out.push(c);
        i += 1;
    }

    let applied = out != json;
    (out, applied)
}

/// Close an unterminated string literal (odd number of unescaped quotes).
fn close_unclosed_string(json: &str) -> (String, bool) {
    let mut quotes = 0usize;
    let mut escaped = false;

    for c in json.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == '"' {
            quotes += 1;
        }
    }

    if quotes % 2 == 1 {
        (format!("{}\"", json), true)
    } else {
        (json.to_string(), false)
    }
}

fn balance_braces(json: &str) -> (String, bool) {
    balance(json, '{', '}')
}

fn balance_brackets(json: &str) -> (String, bool) {
    balance(json, '[', ']')
}

/// Append missing closers for `open`/`close`, ignoring bracket characters
/// inside strings.
fn balance(json: &str, open: char, close: char) -> (String, bool) {
    let mut opens = 0usize;
    let mut closes = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for c in json.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' && in_string {
            escaped = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            continue;
        }
        if in_string {
            continue;
        }
        if c == open {
            opens += 1;
        } else if c == close {
            closes += 1;
        }
    }

    if opens > closes {
        let missing: String = std::iter::repeat(close).take(opens - closes).collect();
        (format!("{}{}", json, missing), true)
    } else {
        (json.to_string(), false)
    }
}
