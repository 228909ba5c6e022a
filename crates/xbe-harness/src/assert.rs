// crates/xbe-harness/src/assert.rs
// ============================================================================
// Module: Output Assertions
// Description: Pure checks over CLI exit codes and JSON output.
// Purpose: Back the session's `assert_*` helpers with testable predicates.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Each check returns `Ok(())` when it holds and a human-readable mismatch
//! message otherwise. Checks never panic; the session turns mismatches into
//! `fail` outcomes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::cli::CliOutput;
use crate::json::json_get;
use crate::json::render_raw;

// ============================================================================
// SECTION: Exit Status
// ============================================================================

/// Checks that the CLI exited with status zero.
///
/// # Errors
///
/// Returns the mismatch message when the status is non-zero.
pub fn expect_success(output: &CliOutput) -> Result<(), String> {
    if output.success() {
        Ok(())
    } else {
        Err(format!("expected success, {}", output.describe()))
    }
}

/// Checks that the CLI exited with a non-zero status.
///
/// # Errors
///
/// Returns the mismatch message when the status is zero.
pub fn expect_failure(output: &CliOutput) -> Result<(), String> {
    if output.success() {
        Err(format!("expected failure, {}", output.describe()))
    } else {
        Ok(())
    }
}

// ============================================================================
// SECTION: JSON Shape
// ============================================================================

/// Checks that the document is a JSON array.
///
/// # Errors
///
/// Returns the mismatch message naming the actual JSON type.
pub fn expect_json_array(document: &Value) -> Result<(), String> {
    if document.is_array() {
        Ok(())
    } else {
        Err(format!("expected JSON array, got {}", type_name(document)))
    }
}

/// Checks that `filter` selects a non-null value.
///
/// # Errors
///
/// Returns the mismatch message when the value is missing or null, or the
/// filter is invalid.
pub fn expect_json_has(document: &Value, filter: &str) -> Result<(), String> {
    match json_get(document, filter).map_err(|err| err.to_string())? {
        None | Some(Value::Null) => Err(format!("expected `{filter}` to be present and non-null")),
        Some(_) => Ok(()),
    }
}

/// Checks that `filter` renders (as `jq -r` would) to `expected`.
///
/// # Errors
///
/// Returns the mismatch message with the actual rendering.
pub fn expect_json_equals(document: &Value, filter: &str, expected: &str) -> Result<(), String> {
    let actual = json_get(document, filter).map_err(|err| err.to_string())?;
    let rendered = render_raw(actual.as_ref());
    if rendered == expected {
        Ok(())
    } else {
        Err(format!("expected `{filter}` == `{expected}`, got `{rendered}`"))
    }
}

/// Checks that `filter` selects the boolean `expected`.
///
/// Accepts JSON booleans and the strings `"true"`/`"false"`, which some CLI
/// views emit for tri-state attributes.
///
/// # Errors
///
/// Returns the mismatch message when the value differs or is not boolean-like.
pub fn expect_json_bool(document: &Value, filter: &str, expected: bool) -> Result<(), String> {
    let actual = json_get(document, filter).map_err(|err| err.to_string())?;
    let parsed = match &actual {
        Some(Value::Bool(value)) => Some(*value),
        Some(Value::String(text)) if text == "true" => Some(true),
        Some(Value::String(text)) if text == "false" => Some(false),
        _ => None,
    };
    match parsed {
        Some(value) if value == expected => Ok(()),
        Some(value) => Err(format!("expected `{filter}` to be {expected}, got {value}")),
        None => Err(format!(
            "expected `{filter}` to be boolean {expected}, got {}",
            render_raw(actual.as_ref())
        )),
    }
}

/// Checks that the document is an array with at most `limit` elements.
///
/// # Errors
///
/// Returns the mismatch message when the document is not an array or too long.
pub fn expect_array_len_at_most(document: &Value, limit: usize) -> Result<(), String> {
    let Value::Array(items) = document else {
        return Err(format!("expected JSON array, got {}", type_name(document)));
    };
    if items.len() <= limit {
        Ok(())
    } else {
        Err(format!("expected at most {limit} rows, got {}", items.len()))
    }
}

/// Names a JSON value's type for messages.
const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
