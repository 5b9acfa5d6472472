//! Data types for the plan change tree
//!
//! This module defines the structures produced by the parser: resources,
//! the polymorphic attribute changes nested inside them, and the typed
//! scalar values carried by leaf attributes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal shown by the plan in place of a redacted value
pub const SENSITIVE_VALUE: &str = "(sensitive value)";

/// Short form of the sensitive sentinel used by newer plan output
pub const SENSITIVE_VALUE_SHORT: &str = "(sensitive)";

/// Literal shown by the plan for values not known until apply
pub const COMPUTED_VALUE: &str = "(known after apply)";

/// The kind of change proposed for a resource or attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// Unchanged, shown for context
    NoOp,
    /// Will be created
    New,
    /// Will be updated in-place
    UpdateInPlace,
    /// Will be destroyed and recreated
    ForceReplace,
    /// Will be destroyed
    Destroy,
    /// Data source read (resources only)
    Read,
}

impl UpdateType {
    /// Get the symbol used to represent this change type
    pub fn symbol(&self) -> &'static str {
        match self {
            UpdateType::New => "+",
            UpdateType::UpdateInPlace => "~",
            UpdateType::ForceReplace => "±",
            UpdateType::Destroy => "-",
            UpdateType::Read => "≤",
            UpdateType::NoOp => " ",
        }
    }

    /// Get the label for this change type
    pub fn label(&self) -> &'static str {
        match self {
            UpdateType::New => "will be created",
            UpdateType::UpdateInPlace => "will be updated in-place",
            UpdateType::ForceReplace => "must be replaced",
            UpdateType::Destroy => "will be destroyed",
            UpdateType::Read => "will be read during apply",
            UpdateType::NoOp => "no changes",
        }
    }

    /// Get RGB color tuple for this change type
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            UpdateType::New => (152, 225, 152),           // Pastel mint green
            UpdateType::UpdateInPlace => (255, 230, 160), // Pastel cream/yellow
            UpdateType::ForceReplace => (181, 174, 254),  // Pastel lavender
            UpdateType::Destroy => (255, 160, 160),       // Pastel coral
            UpdateType::Read => (160, 200, 255),          // Pastel sky blue
            UpdateType::NoOp => (160, 160, 160),          // Grey
        }
    }
}

impl fmt::Display for UpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdateType::NoOp => "no-op",
            UpdateType::New => "created",
            UpdateType::UpdateInPlace => "update-in-place",
            UpdateType::ForceReplace => "force-replace",
            UpdateType::Destroy => "destroyed",
            UpdateType::Read => "read",
        };
        f.write_str(name)
    }
}

/// A typed scalar value as written in the plan
///
/// An absent value (`null`, `{}` or a missing side of a change) is
/// represented by `Option::None` on the owning attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Value {
    /// Borrow the string payload, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this value is one of the sensitive sentinels
    pub fn is_sensitive(&self) -> bool {
        matches!(self.as_str(), Some(SENSITIVE_VALUE | SENSITIVE_VALUE_SHORT))
    }

    /// Whether this value is the computed sentinel
    pub fn is_computed(&self) -> bool {
        self.as_str() == Some(COMPUTED_VALUE)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// Leaf attribute with literal old and new values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarChange {
    /// Attribute name, empty for array elements
    pub name: String,
    pub old_value: Option<Value>,
    pub new_value: Option<Value>,
    pub update_type: UpdateType,
}

/// Nested block or map attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapChange {
    pub name: String,
    pub children: Vec<AttributeChange>,
    pub update_type: UpdateType,
}

/// List or set attribute; children are positional and unnamed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayChange {
    pub name: String,
    pub children: Vec<AttributeChange>,
    pub update_type: UpdateType,
}

/// Multi-line string attribute written as `<<~EOT ... EOT`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeredocChange {
    pub name: String,
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub update_type: UpdateType,
}

/// Attribute written as `jsonencode( ... )`
///
/// Holds a single unnamed composite child carrying the decoded body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonEncodeChange {
    pub name: String,
    pub children: Vec<AttributeChange>,
    pub update_type: UpdateType,
}

/// A single attribute change within a resource or composite attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttributeChange {
    Scalar(ScalarChange),
    Map(MapChange),
    Array(ArrayChange),
    Heredoc(HeredocChange),
    JsonEncode(JsonEncodeChange),
}

impl AttributeChange {
    /// Name of the attribute; empty for array elements and synthetic bodies
    pub fn name(&self) -> &str {
        match self {
            AttributeChange::Scalar(s) => &s.name,
            AttributeChange::Map(m) => &m.name,
            AttributeChange::Array(a) => &a.name,
            AttributeChange::Heredoc(h) => &h.name,
            AttributeChange::JsonEncode(j) => &j.name,
        }
    }

    pub fn update_type(&self) -> UpdateType {
        match self {
            AttributeChange::Scalar(s) => s.update_type,
            AttributeChange::Map(m) => m.update_type,
            AttributeChange::Array(a) => a.update_type,
            AttributeChange::Heredoc(h) => h.update_type,
            AttributeChange::JsonEncode(j) => j.update_type,
        }
    }

    /// Child attributes of a composite; empty for leaves
    pub fn children(&self) -> &[AttributeChange] {
        match self {
            AttributeChange::Map(m) => &m.children,
            AttributeChange::Array(a) => &a.children,
            AttributeChange::JsonEncode(j) => &j.children,
            AttributeChange::Scalar(_) | AttributeChange::Heredoc(_) => &[],
        }
    }

    /// True if this attribute or any descendant holds the sensitive sentinel
    pub fn is_sensitive(&self) -> bool {
        match self {
            AttributeChange::Scalar(s) => {
                s.old_value.as_ref().is_some_and(Value::is_sensitive)
                    || s.new_value.as_ref().is_some_and(Value::is_sensitive)
            }
            AttributeChange::Heredoc(h) => h
                .before
                .iter()
                .chain(h.after.iter())
                .any(|l| l == SENSITIVE_VALUE || l == SENSITIVE_VALUE_SHORT),
            _ => self.children().iter().any(AttributeChange::is_sensitive),
        }
    }

    /// True if this attribute or any descendant holds the computed sentinel
    pub fn is_computed(&self) -> bool {
        match self {
            AttributeChange::Scalar(s) => {
                s.old_value.as_ref().is_some_and(Value::is_computed)
                    || s.new_value.as_ref().is_some_and(Value::is_computed)
            }
            AttributeChange::Heredoc(h) => h
                .before
                .iter()
                .chain(h.after.iter())
                .any(|l| l == COMPUTED_VALUE),
            _ => self.children().iter().any(AttributeChange::is_computed),
        }
    }

    pub fn is_no_op(&self) -> bool {
        self.update_type() == UpdateType::NoOp
    }
}

/// Index key of a resource created with `count` or `for_each`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceIndex {
    /// `count` index
    Integer(i64),
    /// `for_each` key
    String(String),
}

impl fmt::Display for ResourceIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceIndex::Integer(i) => write!(f, "{}", i),
            ResourceIndex::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// A resource change block in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceChange {
    /// Full resource address as written (e.g., "module.vpc.aws_subnet.main[0]")
    pub address: String,

    /// Module portion of the address, empty at the root module
    pub module_address: String,

    /// Resource type (e.g., "aws_instance")
    pub resource_type: String,

    /// Resource name (e.g., "example")
    pub resource_name: String,

    /// Index key for `count`/`for_each` instances
    pub index: Option<ResourceIndex>,

    /// Type of change for this resource
    pub update_type: UpdateType,

    /// Whether the resource is tainted
    pub tainted: bool,

    /// Attribute changes within this resource, in source order
    pub attributes: Vec<AttributeChange>,
}

impl ResourceChange {
    /// Names of top-level attributes that force replacement
    pub fn forces_replacement(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.update_type() == UpdateType::ForceReplace)
            .map(AttributeChange::name)
            .collect()
    }

    pub fn is_sensitive(&self) -> bool {
        self.attributes.iter().any(AttributeChange::is_sensitive)
    }

    pub fn is_computed(&self) -> bool {
        self.attributes.iter().any(AttributeChange::is_computed)
    }
}

/// Summary statistics for a parsed plan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Number of resources to add
    pub to_add: usize,

    /// Number of resources to change
    pub to_change: usize,

    /// Number of resources to destroy
    pub to_destroy: usize,

    /// Number of resources to replace
    pub to_replace: usize,

    /// Number of data sources to read
    pub to_read: usize,

    /// Number of unchanged resources
    pub unchanged: usize,
}

impl PlanSummary {
    /// Compute summary from parsed resources
    pub fn from_resources(resources: &[ResourceChange]) -> Self {
        let mut summary = PlanSummary::default();

        for resource in resources {
            match resource.update_type {
                UpdateType::New => summary.to_add += 1,
                UpdateType::UpdateInPlace => summary.to_change += 1,
                UpdateType::Destroy => summary.to_destroy += 1,
                UpdateType::ForceReplace => summary.to_replace += 1,
                UpdateType::Read => summary.to_read += 1,
                UpdateType::NoOp => summary.unchanged += 1,
            }
        }

        summary
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total_changes() > 0
    }

    /// Get total number of changes
    pub fn total_changes(&self) -> usize {
        self.to_add + self.to_change + self.to_destroy + self.to_replace
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(
        name: &str,
        old: Option<Value>,
        new: Option<Value>,
        ut: UpdateType,
    ) -> AttributeChange {
        AttributeChange::Scalar(ScalarChange {
            name: name.to_string(),
            old_value: old,
            new_value: new,
            update_type: ut,
        })
    }

    #[test]
    fn test_update_type_symbol() {
        assert_eq!(UpdateType::New.symbol(), "+");
        assert_eq!(UpdateType::UpdateInPlace.symbol(), "~");
        assert_eq!(UpdateType::Destroy.symbol(), "-");
        assert_eq!(UpdateType::ForceReplace.symbol(), "±");
    }

    #[test]
    fn test_sensitive_sentinels() {
        assert!(Value::from(SENSITIVE_VALUE).is_sensitive());
        assert!(Value::from(SENSITIVE_VALUE_SHORT).is_sensitive());
        assert!(!Value::from("sensitive").is_sensitive());
        assert!(Value::from(COMPUTED_VALUE).is_computed());
        assert!(!Value::Integer(1).is_computed());
    }

    #[test]
    fn test_composite_sensitivity_is_or_of_children() {
        let plain = scalar("a", None, Some("x".into()), UpdateType::New);
        let secret = scalar("b", None, Some(SENSITIVE_VALUE.into()), UpdateType::New);

        let map = AttributeChange::Map(MapChange {
            name: "m".to_string(),
            children: vec![plain.clone()],
            update_type: UpdateType::New,
        });
        assert!(!map.is_sensitive());

        let nested = AttributeChange::Array(ArrayChange {
            name: "arr".to_string(),
            children: vec![
                plain,
                AttributeChange::Map(MapChange {
                    name: String::new(),
                    children: vec![secret],
                    update_type: UpdateType::New,
                }),
            ],
            update_type: UpdateType::New,
        });
        assert!(nested.is_sensitive());
        assert!(!nested.is_computed());
    }

    #[test]
    fn test_forces_replacement_names() {
        let (old, new) = (Some(Value::from("a")), Some(Value::from("b")));
        let resource = ResourceChange {
            address: "aws_instance.web".to_string(),
            module_address: String::new(),
            resource_type: "aws_instance".to_string(),
            resource_name: "web".to_string(),
            index: None,
            update_type: UpdateType::ForceReplace,
            tainted: false,
            attributes: vec![
                scalar("ami", old.clone(), new.clone(), UpdateType::ForceReplace),
                scalar("tags", old, new, UpdateType::UpdateInPlace),
            ],
        };

        assert_eq!(resource.forces_replacement(), vec!["ami"]);
    }

    #[test]
    fn test_plan_summary() {
        let make = |ut| ResourceChange {
            address: "t.n".to_string(),
            module_address: String::new(),
            resource_type: "t".to_string(),
            resource_name: "n".to_string(),
            index: None,
            update_type: ut,
            tainted: false,
            attributes: Vec::new(),
        };
        let resources = vec![
            make(UpdateType::New),
            make(UpdateType::UpdateInPlace),
            make(UpdateType::Destroy),
            make(UpdateType::Read),
        ];

        let summary = PlanSummary::from_resources(&resources);
        assert!(summary.has_changes());
        assert_eq!(summary.to_add, 1);
        assert_eq!(summary.to_change, 1);
        assert_eq!(summary.to_destroy, 1);
        assert_eq!(summary.to_read, 1);
        assert_eq!(summary.total_changes(), 3);
        assert!(!PlanSummary::default().has_changes());
    }

    #[test]
    fn test_serialize_tags_attribute_kind() {
        let attr = scalar("count", None, Some(Value::Integer(3)), UpdateType::New);
        let json = serde_json::to_value(&attr).unwrap();

        assert_eq!(json["kind"], "scalar");
        assert_eq!(json["new_value"], 3);
        assert_eq!(json["update_type"], "new");
    }
}
