//! Attribute constructors
//!
//! Builds leaf attribute changes and the headers of composite attributes
//! from classified lines, and coerces raw value text into typed values.

use super::error::{PlanParseError, Result};
use super::line::{ATTRIBUTE_CHANGE_DELIMITER, ChangeMarker, Line, dequote};
use super::types::{SENSITIVE_VALUE, SENSITIVE_VALUE_SHORT, ScalarChange, UpdateType, Value};

/// Name and update type of a composite attribute, known from its opening line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    pub name: String,
    pub update_type: UpdateType,
}

impl BlockHeader {
    pub fn from_line(line: &Line<'_>) -> Self {
        Self {
            name: line.block_name().to_string(),
            update_type: update_type_of(line),
        }
    }
}

/// Map a line's change marker to an update type
///
/// `~` lines carrying the forces-replacement annotation become `ForceReplace`.
pub fn update_type_of(line: &Line<'_>) -> UpdateType {
    match line.marker() {
        ChangeMarker::Add => UpdateType::New,
        ChangeMarker::Remove => UpdateType::Destroy,
        ChangeMarker::Change if line.forces_replacement() => UpdateType::ForceReplace,
        ChangeMarker::Change => UpdateType::UpdateInPlace,
        ChangeMarker::Read | ChangeMarker::None => UpdateType::NoOp,
    }
}

/// Convert raw value text into a typed value
///
/// Quoted text becomes a string without its quotes and `{}` becomes absent.
/// Anything that is not a bool or a number is kept verbatim as a string,
/// which includes the sensitive and computed sentinels.
pub fn coerce_value(raw: &str) -> Option<Value> {
    let raw = raw.trim();

    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Some(Value::String(dequote(raw).to_string()));
    }

    match raw {
        "{}" => return None,
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }

    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::Integer(i));
    }

    // `inf` and `NaN` parse as floats but are identifiers in plan output
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => return Some(Value::Float(f)),
        _ => {}
    }

    Some(Value::String(raw.to_string()))
}

fn is_sensitive_text(text: &str) -> bool {
    text == SENSITIVE_VALUE || text == SENSITIVE_VALUE_SHORT
}

/// Whether `prefix` ends inside an open string literal
fn inside_quotes(prefix: &str) -> bool {
    let mut in_quotes = false;
    let mut escaped = false;
    for c in prefix.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = in_quotes,
            '"' => in_quotes = !in_quotes,
            _ => {}
        }
    }
    in_quotes
}

/// Split a value on the change delimiters found outside string literals
fn split_change(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (pos, _) in value.match_indices(ATTRIBUTE_CHANGE_DELIMITER) {
        if !inside_quotes(&value[..pos]) {
            parts.push(value[start..pos].trim());
            start = pos + ATTRIBUTE_CHANGE_DELIMITER.len();
        }
    }
    parts.push(value[start..].trim());
    parts
}

/// Build a named leaf attribute from a scalar line
pub fn scalar_from_line(line: &Line<'_>) -> Result<ScalarChange> {
    let (name, value) = line
        .split_name_value()
        .ok_or_else(|| PlanParseError::malformed(line.text(), "expected a name and a value"))?;
    let update_type = update_type_of(line);

    let (old_value, new_value) = match update_type {
        UpdateType::New => (None, coerce_value(value)),
        UpdateType::Destroy => {
            let old = split_change(value).into_iter().next().unwrap_or(value);
            (coerce_value(old), None)
        }
        UpdateType::UpdateInPlace | UpdateType::ForceReplace => {
            match split_change(value).as_slice() {
                [old, new] => (coerce_value(old), coerce_value(new)),
                // A replaced sensitive value discloses no diff
                [only] if is_sensitive_text(only) => (coerce_value(only), coerce_value(only)),
                _ => {
                    return Err(PlanParseError::malformed(
                        line.text(),
                        "expected exactly one old and one new value",
                    ));
                }
            }
        }
        UpdateType::NoOp | UpdateType::Read => (coerce_value(value), coerce_value(value)),
    };

    Ok(ScalarChange {
        name: dequote(name).to_string(),
        old_value,
        new_value,
        update_type,
    })
}

/// Build an unnamed array element from a line inside an array body
pub fn array_item_from_line(line: &Line<'_>) -> Result<ScalarChange> {
    let value = line.body().trim_end_matches(',').trim();
    if value.is_empty() {
        return Err(PlanParseError::malformed(line.text(), "empty element"));
    }

    let (old_value, new_value, update_type) = match line.marker() {
        ChangeMarker::Add => (None, coerce_value(value), UpdateType::New),
        ChangeMarker::Remove => (coerce_value(value), None, UpdateType::Destroy),
        // Array elements are added or removed, never changed in place
        ChangeMarker::Change => {
            return Err(PlanParseError::malformed(
                line.text(),
                "unexpected in-place change of a single array element",
            ));
        }
        ChangeMarker::Read | ChangeMarker::None => {
            (coerce_value(value), coerce_value(value), UpdateType::NoOp)
        }
    };

    Ok(ScalarChange {
        name: String::new(),
        old_value,
        new_value,
        update_type,
    })
}
