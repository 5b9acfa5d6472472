//! Before/after projections of a change tree
//!
//! Projections are pure traversals producing `serde_json::Value`s. Object
//! keys are ordered, so the same tree and filters always give the same
//! output.

use serde_json::{Map, Value as JsonValue};

use super::types::{AttributeChange, ResourceChange, UpdateType, Value};

/// Predicate excluding an attribute (and its subtree) from a projection
pub type Filter<'a> = &'a dyn Fn(&AttributeChange) -> bool;

/// Exclude attributes holding a sensitive value anywhere in their subtree
pub fn ignore_sensitive(attribute: &AttributeChange) -> bool {
    attribute.is_sensitive()
}

/// Exclude attributes holding a computed value anywhere in their subtree
pub fn ignore_computed(attribute: &AttributeChange) -> bool {
    attribute.is_computed()
}

/// Exclude unchanged attributes
pub fn ignore_no_op(attribute: &AttributeChange) -> bool {
    attribute.is_no_op()
}

/// Keep only attributes with a computed value in their subtree
pub fn computed_only(attribute: &AttributeChange) -> bool {
    !attribute.is_computed()
}

/// Keep only attributes with a sensitive value in their subtree
pub fn sensitive_only(attribute: &AttributeChange) -> bool {
    !attribute.is_sensitive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

impl Side {
    /// Whether a child with this update type exists on this side at all
    fn includes(self, update_type: UpdateType) -> bool {
        match self {
            Side::Before => update_type != UpdateType::New,
            Side::After => update_type != UpdateType::Destroy,
        }
    }
}

fn excluded(attribute: &AttributeChange, filters: &[Filter<'_>]) -> bool {
    filters.iter().any(|filter| filter(attribute))
}

fn scalar_to_json(value: Option<&Value>) -> JsonValue {
    match value {
        None => JsonValue::Null,
        Some(Value::Bool(b)) => JsonValue::Bool(*b),
        Some(Value::Integer(i)) => JsonValue::from(*i),
        Some(Value::Float(f)) => JsonValue::from(*f),
        Some(Value::String(s)) => JsonValue::String(s.clone()),
    }
}

fn project_object(children: &[AttributeChange], side: Side, filters: &[Filter<'_>]) -> JsonValue {
    let mut object = Map::new();
    for child in children {
        if !side.includes(child.update_type()) || excluded(child, filters) {
            continue;
        }
        // Later duplicates overwrite earlier ones
        object.insert(child.name().to_string(), project(child, side, filters));
    }
    JsonValue::Object(object)
}

fn project_array(children: &[AttributeChange], side: Side, filters: &[Filter<'_>]) -> JsonValue {
    children
        .iter()
        .filter(|child| side.includes(child.update_type()) && !excluded(child, filters))
        .map(|child| project(child, side, filters))
        .collect()
}

fn project(attribute: &AttributeChange, side: Side, filters: &[Filter<'_>]) -> JsonValue {
    match attribute {
        AttributeChange::Scalar(scalar) => match side {
            Side::Before => scalar_to_json(scalar.old_value.as_ref()),
            Side::After => scalar_to_json(scalar.new_value.as_ref()),
        },
        AttributeChange::Map(map) => project_object(&map.children, side, filters),
        AttributeChange::JsonEncode(json) => project_object(&json.children, side, filters),
        AttributeChange::Array(array) => project_array(&array.children, side, filters),
        AttributeChange::Heredoc(heredoc) => {
            let lines = match side {
                Side::Before => &heredoc.before,
                Side::After => &heredoc.after,
            };
            JsonValue::String(lines.join("\n"))
        }
    }
}

impl AttributeChange {
    /// Value of this attribute before the change
    ///
    /// Children matching any filter are left out, as are children that only
    /// exist after the change.
    pub fn before(&self, filters: &[Filter<'_>]) -> JsonValue {
        project(self, Side::Before, filters)
    }

    /// Value of this attribute after the change
    pub fn after(&self, filters: &[Filter<'_>]) -> JsonValue {
        project(self, Side::After, filters)
    }
}

impl ResourceChange {
    /// Attribute values of the resource before the change, keyed by name
    pub fn before(&self, filters: &[Filter<'_>]) -> JsonValue {
        project_object(&self.attributes, Side::Before, filters)
    }

    /// Attribute values of the resource after the change, keyed by name
    pub fn after(&self, filters: &[Filter<'_>]) -> JsonValue {
        project_object(&self.attributes, Side::After, filters)
    }
}
