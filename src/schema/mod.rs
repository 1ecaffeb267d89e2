//! Structural schemas for tool inputs and outputs.
//!
//! `SchemaNode` is a closed tagged union. Schemas arriving from elsewhere
//! (JSON Schema documents, derived schemas) are translated into it at the
//! boundary by [`json`]; everything downstream switches on [`SchemaKind`].

pub mod introspect;
pub mod json;

pub use introspect::{flatten, readable_type_name, unwrap, Unwrapped};
pub use json::{node_to_json_schema, shape_to_json_schema};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered field name → schema mapping of an object-like schema.
pub type Shape = IndexMap<String, SchemaNode>;

// =============================================================================
// Schema kinds
// =============================================================================

/// Kind of a schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Array {
        items: Box<SchemaNode>,
    },
    Object {
        fields: Shape,
    },
    Record {
        key: Box<SchemaNode>,
        value: Box<SchemaNode>,
    },
    Enum {
        values: Vec<String>,
    },
    Literal {
        value: Value,
    },
    Union {
        options: Vec<SchemaNode>,
    },
    Intersection {
        left: Box<SchemaNode>,
        right: Box<SchemaNode>,
    },
    Optional {
        inner: Box<SchemaNode>,
    },
    Default {
        inner: Box<SchemaNode>,
        value: Value,
    },
    /// Also the landing spot for kinds this crate does not know.
    #[serde(other)]
    Any,
}

impl SchemaKind {
    /// `optional` and `default` wrap another node; every other kind is concrete.
    pub fn is_wrapper(&self) -> bool {
        matches!(self, SchemaKind::Optional { .. } | SchemaKind::Default { .. })
    }
}

// =============================================================================
// Schema node
// =============================================================================

/// A schema node: a kind plus an optional human description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(flatten)]
    pub kind: SchemaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<SchemaKind> for SchemaNode {
    fn from(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
        }
    }
}

impl SchemaNode {
    pub fn string() -> Self {
        SchemaKind::String.into()
    }

    pub fn number() -> Self {
        SchemaKind::Number.into()
    }

    pub fn boolean() -> Self {
        SchemaKind::Boolean.into()
    }

    pub fn any() -> Self {
        SchemaKind::Any.into()
    }

    pub fn array(items: SchemaNode) -> Self {
        SchemaKind::Array {
            items: Box::new(items),
        }
        .into()
    }

    /// Object schema with fields in the given order.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        SchemaKind::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
        .into()
    }

    pub fn record(key: SchemaNode, value: SchemaNode) -> Self {
        SchemaKind::Record {
            key: Box::new(key),
            value: Box::new(value),
        }
        .into()
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SchemaKind::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
        .into()
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        SchemaKind::Literal {
            value: value.into(),
        }
        .into()
    }

    pub fn union(options: Vec<SchemaNode>) -> Self {
        SchemaKind::Union { options }.into()
    }

    pub fn intersection(left: SchemaNode, right: SchemaNode) -> Self {
        SchemaKind::Intersection {
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }

    /// Wrap in an `optional` node.
    pub fn optional(self) -> Self {
        SchemaKind::Optional {
            inner: Box::new(self),
        }
        .into()
    }

    /// Wrap in a `default` node carrying `value`.
    pub fn with_default(self, value: impl Into<Value>) -> Self {
        SchemaKind::Default {
            inner: Box::new(self),
            value: value.into(),
        }
        .into()
    }

    /// Attach a description to this node.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// See [`introspect::unwrap`].
    pub fn unwrapped(&self) -> Unwrapped<'_> {
        introspect::unwrap(self)
    }

    /// See [`introspect::readable_type_name`].
    pub fn readable_type_name(&self) -> String {
        introspect::readable_type_name(self)
    }

    /// See [`introspect::flatten`].
    pub fn flatten(&self) -> Option<Shape> {
        introspect::flatten(self)
    }

    /// Translate a JSON Schema document. See [`json::from_json_schema`].
    pub fn from_json_schema(schema: &Value) -> Self {
        json::from_json_schema(schema)
    }

    /// Render as a JSON Schema document. See [`json::node_to_json_schema`].
    pub fn to_json_schema(&self) -> Value {
        json::node_to_json_schema(self)
    }
}
