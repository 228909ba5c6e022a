// crates/xbe-harness/src/json.rs
// ============================================================================
// Module: JSON Filters
// Description: jq-style field extraction over CLI JSON output.
// Purpose: Provide `json_get` with jq-compatible paths and `-r` rendering.
// Dependencies: jsonpath_lib, serde_json
// ============================================================================

//! ## Overview
//! Suites address response fields with the jq path subset the bash scripts
//! used (`.id`, `.[0].id`, `.data.attributes["company-name"]`, `.[] .id`,
//! `. | length`). Paths compile to `JSONPath` and are evaluated with
//! `jsonpath_lib`; filters starting with `$` are passed through unchanged.
//! Invariants:
//! - A path that matches nothing yields `None`, never an error.
//! - Several matches are collected into a JSON array.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonpath_lib::select;
use serde_json::Number;
use serde_json::Value;

use crate::error::HarnessError;

// ============================================================================
// SECTION: Filter Types
// ============================================================================

/// One step of a jq path.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Object member access.
    Key(String),
    /// Array element access.
    Index(usize),
    /// Every element (`[]`).
    Iterate,
}

/// A compiled jq-style filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFilter {
    /// Filter text as written.
    source: String,
    /// Compiled `JSONPath`; `None` selects the whole document.
    path: Option<String>,
    /// Whether `| length` is applied to the selection.
    length: bool,
}

impl JsonFilter {
    /// Compiles a filter.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Filter`] for syntax outside the supported subset.
    pub fn parse(filter: &str) -> Result<Self, HarnessError> {
        let invalid = |reason: &str| HarnessError::Filter {
            filter: filter.to_string(),
            reason: reason.to_string(),
        };
        let mut stages = filter.split('|').map(str::trim);
        let head = stages.next().unwrap_or_default();
        let length = match stages.next() {
            None => false,
            Some("length") => true,
            Some(_) => return Err(invalid("only `| length` may follow a path")),
        };
        if stages.next().is_some() {
            return Err(invalid("at most one pipe is supported"));
        }
        if head.starts_with('$') {
            return Ok(Self {
                source: filter.to_string(),
                path: Some(head.to_string()),
                length,
            });
        }
        let segments = parse_segments(head).map_err(|reason| invalid(&reason))?;
        let path = if segments.is_empty() { None } else { Some(render_jsonpath(&segments)) };
        Ok(Self {
            source: filter.to_string(),
            path,
            length,
        })
    }

    /// Returns the filter text as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluates the filter against a document.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Filter`] when the compiled path is rejected by
    /// the `JSONPath` engine or `length` is applied to a boolean.
    pub fn eval(&self, document: &Value) -> Result<Option<Value>, HarnessError> {
        let selected = match &self.path {
            None => Some(document.clone()),
            Some(path) => {
                let matches = select(document, path).map_err(|err| HarnessError::Filter {
                    filter: self.source.clone(),
                    reason: err.to_string(),
                })?;
                match matches.as_slice() {
                    [] => None,
                    [single] => Some((*single).clone()),
                    many => Some(Value::Array(many.iter().map(|value| (*value).clone()).collect())),
                }
            }
        };
        if !self.length {
            return Ok(selected);
        }
        let length = match &selected {
            None | Some(Value::Null) => 0,
            Some(Value::Array(items)) => items.len(),
            Some(Value::Object(map)) => map.len(),
            Some(Value::String(text)) => text.chars().count(),
            Some(Value::Number(number)) => return Ok(Some(number_length(number))),
            Some(Value::Bool(_)) => {
                return Err(HarnessError::Filter {
                    filter: self.source.clone(),
                    reason: "boolean has no length".to_string(),
                });
            }
        };
        Ok(Some(Value::from(length)))
    }
}

/// `length` of a number is its absolute value; integers stay integers.
fn number_length(number: &Number) -> Value {
    if let Some(int) = number.as_i64() {
        Value::from(int.unsigned_abs())
    } else if let Some(uint) = number.as_u64() {
        Value::from(uint)
    } else {
        Value::from(number.as_f64().map_or(0.0, f64::abs))
    }
}

// ============================================================================
// SECTION: Public Helpers
// ============================================================================

/// Applies a filter to a document (`json_get`).
///
/// # Errors
///
/// Returns [`HarnessError::Filter`] when the filter is invalid.
pub fn json_get(document: &Value, filter: &str) -> Result<Option<Value>, HarnessError> {
    JsonFilter::parse(filter)?.eval(document)
}

/// Renders a selection the way `jq -r` prints it.
#[must_use]
pub fn render_raw(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Returns an identifier only when it is non-empty and not the literal `null`.
#[must_use]
pub fn usable_id(value: Option<&Value>) -> Option<String> {
    let rendered = match value {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => return None,
    };
    if rendered.is_empty() || rendered == "null" { None } else { Some(rendered) }
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Splits a jq path into segments.
fn parse_segments(path: &str) -> Result<Vec<Segment>, String> {
    let chars: Vec<char> = path.trim().chars().collect();
    if chars.first() != Some(&'.') {
        return Err("paths must start with `.` or `$`".to_string());
    }
    let mut segments = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        match chars[pos] {
            '.' => {
                pos += 1;
                match chars.get(pos) {
                    None | Some('[') => {}
                    Some('"') => {
                        let (key, next) = parse_quoted(&chars, pos)?;
                        segments.push(Segment::Key(key));
                        pos = next;
                    }
                    Some(_) => {
                        let start = pos;
                        while pos < chars.len() && is_key_char(chars[pos]) {
                            pos += 1;
                        }
                        if start == pos {
                            return Err(format!("unexpected `{}`", chars[pos]));
                        }
                        segments.push(Segment::Key(chars[start..pos].iter().collect()));
                    }
                }
            }
            '[' => {
                let close = chars[pos..]
                    .iter()
                    .position(|ch| *ch == ']')
                    .map(|offset| pos + offset)
                    .ok_or_else(|| "unclosed `[`".to_string())?;
                let inner: String = chars[pos + 1..close].iter().collect();
                segments.push(parse_bracket(&inner)?);
                pos = close + 1;
            }
            ch if ch.is_whitespace() => pos += 1,
            other => return Err(format!("unexpected `{other}`")),
        }
    }
    Ok(segments)
}

/// Parses a double-quoted key starting at `start`; returns the key and the next position.
fn parse_quoted(chars: &[char], start: usize) -> Result<(String, usize), String> {
    let mut key = String::new();
    let mut pos = start + 1;
    while pos < chars.len() {
        match chars[pos] {
            '"' => return Ok((key, pos + 1)),
            '\\' if pos + 1 < chars.len() => {
                key.push(chars[pos + 1]);
                pos += 2;
            }
            ch => {
                key.push(ch);
                pos += 1;
            }
        }
    }
    Err("unterminated string".to_string())
}

/// Parses the contents of `[...]`.
fn parse_bracket(inner: &str) -> Result<Segment, String> {
    if inner.is_empty() {
        return Ok(Segment::Iterate);
    }
    if inner.starts_with('"') {
        let chars: Vec<char> = inner.chars().collect();
        let (key, next) = parse_quoted(&chars, 0)?;
        if next != chars.len() {
            return Err("trailing characters after key".to_string());
        }
        return Ok(Segment::Key(key));
    }
    if inner.starts_with('-') {
        return Err("negative indices are not supported".to_string());
    }
    inner.parse::<usize>().map(Segment::Index).map_err(|_| format!("invalid index `{inner}`"))
}

/// Characters allowed in a bare key.
const fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

/// Renders segments as bracket-notation `JSONPath`.
fn render_jsonpath(segments: &[Segment]) -> String {
    let mut path = String::from("$");
    for segment in segments {
        match segment {
            Segment::Key(key) => {
                path.push_str("['");
                path.push_str(&key.replace('\'', "\\'"));
                path.push_str("']");
            }
            Segment::Index(index) => {
                path.push('[');
                path.push_str(&index.to_string());
                path.push(']');
            }
            Segment::Iterate => path.push_str("[*]"),
        }
    }
    path
}
