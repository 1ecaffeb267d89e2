//! Schema introspection: wrapper unwrapping, readable type names, shape merging.

use super::{SchemaKind, SchemaNode, Shape};
use serde_json::Value;

/// Result of stripping `optional`/`default` wrappers off a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unwrapped<'a> {
    /// First non-wrapper node reached.
    pub node: &'a SchemaNode,
    /// True if any `optional` wrapper was seen.
    pub optional: bool,
    /// Innermost `default` value, if any.
    pub default: Option<&'a Value>,
    /// First description found walking from the outer wrapper inward.
    pub description: Option<&'a str>,
}

/// Strip `optional` and `default` wrappers recursively.
pub fn unwrap(node: &SchemaNode) -> Unwrapped<'_> {
    let own_description = node.description.as_deref();
    match &node.kind {
        SchemaKind::Optional { inner } => {
            let mut unwrapped = unwrap(inner);
            unwrapped.optional = true;
            unwrapped.description = own_description.or(unwrapped.description);
            unwrapped
        }
        SchemaKind::Default { inner, value } => {
            let mut unwrapped = unwrap(inner);
            unwrapped.default = unwrapped.default.or(Some(value));
            unwrapped.description = own_description.or(unwrapped.description);
            unwrapped
        }
        _ => Unwrapped {
            node,
            optional: false,
            default: None,
            description: own_description,
        },
    }
}

/// Canonical short label for a node, shown in generated documentation.
///
/// Total: kinds without a dedicated label read as `any`.
pub fn readable_type_name(node: &SchemaNode) -> String {
    let inner = unwrap(node).node;
    match &inner.kind {
        SchemaKind::String => "string".to_string(),
        SchemaKind::Number => "number".to_string(),
        SchemaKind::Boolean => "boolean".to_string(),
        SchemaKind::Array { .. } => "array".to_string(),
        SchemaKind::Object { .. } => "object".to_string(),
        SchemaKind::Enum { .. } => "enum".to_string(),
        SchemaKind::Literal { .. } => "literal".to_string(),
        SchemaKind::Union { .. } => "union".to_string(),
        SchemaKind::Record { key, value } => format!(
            "record<{}, {}>",
            readable_type_name(key),
            readable_type_name(value)
        ),
        _ => "any".to_string(),
    }
}

/// Field mapping of an object-like node.
///
/// Objects yield their fields; intersections merge both flattened sides with
/// right-hand fields replacing left-hand ones. Anything else yields `None`.
pub fn flatten(node: &SchemaNode) -> Option<Shape> {
    match &node.kind {
        SchemaKind::Object { fields } => Some(fields.clone()),
        SchemaKind::Intersection { left, right } => {
            let mut merged = flatten(left).unwrap_or_default();
            for (name, field) in flatten(right).unwrap_or_default() {
                merged.insert(name, field);
            }
            Some(merged)
        }
        _ => None,
    }
}
