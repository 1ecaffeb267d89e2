//! JSON Schema boundary.
//!
//! Translates JSON Schema documents (hand-written or derived with schemars)
//! into [`SchemaNode`] trees, and renders flattened shapes back into the
//! object schema hosts advertise to protocol clients.

use super::{introspect, SchemaKind, SchemaNode, Shape};
use serde_json::{json, Map, Value};
use std::cell::RefCell;

/// Backstop for `$ref` chains deeper than this; they resolve to `any`.
const MAX_REF_DEPTH: usize = 32;

// =============================================================================
// JSON Schema → SchemaNode
// =============================================================================

/// Translate a JSON Schema document into a schema node.
///
/// Local `$ref`s (`#/definitions/..`, `#/$defs/..`) resolve against the
/// document root. A `$ref` met again while it is still being resolved
/// (a recursive type) becomes `any`. Constructs without a counterpart
/// become `any`.
pub fn from_json_schema(schema: &Value) -> SchemaNode {
    Translator {
        root: schema,
        resolving: RefCell::new(Vec::new()),
    }
    .node(schema, 0)
}

struct Translator<'a> {
    root: &'a Value,
    /// `$ref` pointers on the current resolution path.
    resolving: RefCell<Vec<String>>,
}

impl<'a> Translator<'a> {
    fn node(&self, schema: &'a Value, depth: usize) -> SchemaNode {
        let Some(obj) = schema.as_object() else {
            // `true`, `false` and malformed fragments.
            return SchemaNode::any();
        };

        let mut node = self.concrete(obj, depth);
        if let Some(description) = obj.get("description").and_then(Value::as_str) {
            node.description = Some(description.to_string());
        }
        match obj.get("default") {
            Some(value) => node.with_default(value.clone()),
            None => node,
        }
    }

    fn concrete(&self, obj: &'a Map<String, Value>, depth: usize) -> SchemaNode {
        if let Some(reference) = obj.get("$ref").and_then(Value::as_str) {
            return self.reference(reference, depth);
        }
        if let Some(value) = obj.get("const") {
            return SchemaNode::literal(value.clone());
        }
        if let Some(values) = obj.get("enum").and_then(Value::as_array) {
            return enum_node(values);
        }
        if let Some(options) = obj
            .get("anyOf")
            .or_else(|| obj.get("oneOf"))
            .and_then(Value::as_array)
        {
            return self.union(options, depth);
        }
        if let Some(parts) = obj.get("allOf").and_then(Value::as_array) {
            return self.intersection(parts, depth);
        }

        match obj.get("type") {
            Some(Value::String(ty)) => self.typed(ty, obj, depth),
            Some(Value::Array(types)) => {
                let types: Vec<&str> = types
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|t| *t != "null")
                    .collect();
                match types.as_slice() {
                    [] => SchemaNode::any(),
                    [single] => self.typed(single, obj, depth),
                    many => SchemaNode::union(
                        many.iter().map(|t| self.typed(t, obj, depth)).collect(),
                    ),
                }
            }
            _ if obj.contains_key("properties") => self.typed("object", obj, depth),
            _ => SchemaNode::any(),
        }
    }

    fn typed(&self, ty: &str, obj: &'a Map<String, Value>, depth: usize) -> SchemaNode {
        match ty {
            "string" => SchemaNode::string(),
            "number" | "integer" => SchemaNode::number(),
            "boolean" => SchemaNode::boolean(),
            "array" => match obj.get("items") {
                Some(items) if items.is_object() => SchemaNode::array(self.node(items, depth)),
                _ => SchemaNode::array(SchemaNode::any()),
            },
            "object" => self.object(obj, depth),
            _ => SchemaNode::any(),
        }
    }

    fn object(&self, obj: &'a Map<String, Value>, depth: usize) -> SchemaNode {
        let properties = obj.get("properties").and_then(Value::as_object);
        let additional = obj.get("additionalProperties").filter(|v| v.is_object());

        if let (None, Some(values)) = (properties, additional) {
            return SchemaNode::record(SchemaNode::string(), self.node(values, depth));
        }

        let required: Vec<&str> = obj
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let fields: Shape = properties
            .map(|props| {
                props
                    .iter()
                    .map(|(name, prop)| {
                        let field = self.node(prop, depth);
                        let field = if required.contains(&name.as_str()) {
                            field
                        } else {
                            field.optional()
                        };
                        (name.clone(), field)
                    })
                    .collect()
            })
            .unwrap_or_default();

        SchemaKind::Object { fields }.into()
    }

    fn union(&self, options: &'a [Value], depth: usize) -> SchemaNode {
        let mut members: Vec<SchemaNode> = options
            .iter()
            .filter(|option| !is_null_schema(option))
            .map(|option| self.node(option, depth))
            .collect();
        match members.len() {
            0 => SchemaNode::any(),
            1 => members.remove(0),
            _ => SchemaNode::union(members),
        }
    }

    fn intersection(&self, parts: &'a [Value], depth: usize) -> SchemaNode {
        parts
            .iter()
            .map(|part| self.node(part, depth))
            .reduce(SchemaNode::intersection)
            .unwrap_or_else(SchemaNode::any)
    }

    fn reference(&self, reference: &str, depth: usize) -> SchemaNode {
        if self.resolving.borrow().iter().any(|r| r == reference) {
            tracing::debug!("schema_ref_recursive: ref={}", reference);
            return SchemaNode::any();
        }
        if depth >= MAX_REF_DEPTH {
            tracing::warn!("schema_ref_depth_exceeded: ref={}", reference);
            return SchemaNode::any();
        }
        match reference
            .strip_prefix('#')
            .and_then(|pointer| self.root.pointer(pointer))
        {
            Some(target) => {
                self.resolving.borrow_mut().push(reference.to_string());
                let node = self.node(target, depth + 1);
                self.resolving.borrow_mut().pop();
                node
            }
            None => {
                tracing::debug!("schema_ref_unresolved: ref={}", reference);
                SchemaNode::any()
            }
        }
    }
}

fn enum_node(values: &[Value]) -> SchemaNode {
    let strings: Option<Vec<&str>> = values.iter().map(Value::as_str).collect();
    match strings {
        Some(strings) => SchemaNode::enumeration(strings),
        None => SchemaNode::union(values.iter().cloned().map(SchemaNode::literal).collect()),
    }
}

fn is_null_schema(schema: &Value) -> bool {
    schema.get("type").and_then(Value::as_str) == Some("null")
}

// =============================================================================
// SchemaNode → JSON Schema
// =============================================================================

/// Render a flattened shape as an object schema.
///
/// A field is listed under `required` when it is neither optional nor
/// defaulted, matching the `*required*` marker in compiled descriptions.
pub fn shape_to_json_schema(shape: &Shape) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for (name, field) in shape {
        let unwrapped = introspect::unwrap(field);
        if !unwrapped.optional && unwrapped.default.is_none() {
            required.push(Value::String(name.clone()));
        }
        properties.insert(name.clone(), node_to_json_schema(field));
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

/// Render a single node as JSON Schema.
pub fn node_to_json_schema(node: &SchemaNode) -> Value {
    let mut schema = match &node.kind {
        SchemaKind::String => json!({"type": "string"}),
        SchemaKind::Number => json!({"type": "number"}),
        SchemaKind::Boolean => json!({"type": "boolean"}),
        SchemaKind::Array { items } => json!({
            "type": "array",
            "items": node_to_json_schema(items),
        }),
        SchemaKind::Object { fields } => shape_to_json_schema(fields),
        SchemaKind::Record { value, .. } => json!({
            "type": "object",
            "additionalProperties": node_to_json_schema(value),
        }),
        SchemaKind::Enum { values } => json!({"type": "string", "enum": values}),
        SchemaKind::Literal { value } => json!({"const": value}),
        SchemaKind::Union { options } => json!({
            "anyOf": options.iter().map(node_to_json_schema).collect::<Vec<_>>(),
        }),
        SchemaKind::Intersection { left, right } => json!({
            "allOf": [node_to_json_schema(left), node_to_json_schema(right)],
        }),
        SchemaKind::Optional { inner } => node_to_json_schema(inner),
        SchemaKind::Default { inner, value } => {
            let mut inner = node_to_json_schema(inner);
            if let Some(obj) = inner.as_object_mut() {
                obj.insert("default".to_string(), value.clone());
            }
            inner
        }
        SchemaKind::Any => json!({}),
    };

    if let (Some(description), Some(obj)) = (&node.description, schema.as_object_mut()) {
        obj.insert(
            "description".to_string(),
            Value::String(description.clone()),
        );
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_primitive_types() {
        assert_eq!(from_json_schema(&json!({"type": "string"})), SchemaNode::string());
        assert_eq!(from_json_schema(&json!({"type": "integer"})), SchemaNode::number());
        assert_eq!(from_json_schema(&json!({"type": "number"})), SchemaNode::number());
        assert_eq!(from_json_schema(&json!({"type": "boolean"})), SchemaNode::boolean());
        assert_eq!(from_json_schema(&json!({"type": "null"})), SchemaNode::any());
        assert_eq!(from_json_schema(&json!(true)), SchemaNode::any());
        assert_eq!(from_json_schema(&json!({})), SchemaNode::any());
    }

    #[test]
    fn test_object_required_and_defaults() {
        let node = from_json_schema(&json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "Search query"},
                "limit": {"type": "integer", "default": 10},
                "tags": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["query"]
        }));

        let shape = node.flatten().unwrap();
        let keys: Vec<&str> = shape.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["query", "limit", "tags"]);

        let query = shape["query"].unwrapped();
        assert!(!query.optional);
        assert_eq!(query.description, Some("Search query"));

        let limit = shape["limit"].unwrapped();
        assert!(limit.optional);
        assert_eq!(limit.default, Some(&json!(10)));

        assert_eq!(shape["tags"].readable_type_name(), "array");
    }

    #[test]
    fn test_nullable_type_array() {
        let node = from_json_schema(&json!({"type": ["string", "null"]}));
        assert_eq!(node, SchemaNode::string());
    }

    #[test]
    fn test_enum_and_const() {
        assert_eq!(
            from_json_schema(&json!({"enum": ["asc", "desc"]})),
            SchemaNode::enumeration(["asc", "desc"])
        );
        assert_eq!(from_json_schema(&json!({"const": 3})), SchemaNode::literal(3));
        assert_eq!(
            from_json_schema(&json!({"enum": [1, "two"]})).readable_type_name(),
            "union"
        );
    }

    #[test]
    fn test_record() {
        let node = from_json_schema(&json!({
            "type": "object",
            "additionalProperties": {"type": "number"}
        }));
        assert_eq!(node.readable_type_name(), "record<string, number>");
    }

    #[test]
    fn test_any_of_drops_null_members() {
        let node = from_json_schema(&json!({
            "anyOf": [{"type": "string"}, {"type": "null"}]
        }));
        assert_eq!(node, SchemaNode::string());

        let node = from_json_schema(&json!({
            "oneOf": [{"type": "string"}, {"type": "number"}]
        }));
        assert_eq!(node.readable_type_name(), "union");
    }

    #[test]
    fn test_all_of_becomes_intersection() {
        let node = from_json_schema(&json!({
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "string"}}, "required": ["a"]},
                {"type": "object", "properties": {"a": {"type": "number"}}, "required": ["a"]}
            ]
        }));
        let shape = node.flatten().unwrap();
        assert_eq!(shape["a"], SchemaNode::number());
    }

    #[test]
    fn test_refs_resolve_against_root() {
        let node = from_json_schema(&json!({
            "type": "object",
            "properties": {
                "order": {"$ref": "#/definitions/Order"}
            },
            "required": ["order"],
            "definitions": {
                "Order": {"type": "string", "enum": ["asc", "desc"]}
            }
        }));
        let shape = node.flatten().unwrap();
        assert_eq!(shape["order"].readable_type_name(), "enum");

        let dangling = from_json_schema(&json!({"$ref": "#/definitions/Missing"}));
        assert_eq!(dangling, SchemaNode::any());
    }

    #[test]
    fn test_recursive_ref_is_bounded() {
        let node = from_json_schema(&json!({
            "$ref": "#/definitions/Node",
            "definitions": {
                "Node": {"$ref": "#/definitions/Node"}
            }
        }));
        assert_eq!(node, SchemaNode::any());
    }

    #[test]
    fn test_self_referencing_definition_with_two_fields() {
        let node = from_json_schema(&json!({
            "$ref": "#/definitions/Node",
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": {
                        "left": {"$ref": "#/definitions/Node"},
                        "right": {"$ref": "#/definitions/Node"}
                    }
                }
            }
        }));

        let shape = node.flatten().unwrap();
        assert_eq!(shape.len(), 2);
        assert_eq!(shape["left"].readable_type_name(), "any");
        assert!(shape["left"].unwrapped().optional);
        assert_eq!(shape["right"].readable_type_name(), "any");
    }

    #[test]
    fn test_sibling_refs_to_same_definition_both_resolve() {
        let node = from_json_schema(&json!({
            "type": "object",
            "properties": {
                "from": {"$ref": "#/definitions/Point"},
                "to": {"$ref": "#/definitions/Point"}
            },
            "required": ["from", "to"],
            "definitions": {
                "Point": {"type": "object", "properties": {"x": {"type": "number"}}}
            }
        }));

        let shape = node.flatten().unwrap();
        assert_eq!(shape["from"].readable_type_name(), "object");
        assert_eq!(shape["to"].readable_type_name(), "object");
    }

    #[test]
    fn test_schemars_derived_schema() {
        #[derive(schemars::JsonSchema)]
        #[allow(dead_code)]
        struct SearchArgs {
            /// Search query
            query: String,
            /// Maximum number of results
            limit: Option<u32>,
            labels: std::collections::HashMap<String, String>,
        }

        let root = serde_json::to_value(schemars::schema_for!(SearchArgs)).unwrap();
        let shape = from_json_schema(&root).flatten().unwrap();

        let query = shape["query"].unwrapped();
        assert!(!query.optional);
        assert_eq!(query.description, Some("Search query"));
        assert_eq!(shape["limit"].readable_type_name(), "number");
        assert!(shape["limit"].unwrapped().optional);
        assert_eq!(shape["labels"].readable_type_name(), "record<string, string>");
    }

    #[test]
    fn test_shape_to_json_schema() {
        let shape = SchemaNode::object([
            ("query", SchemaNode::string().describe("Search query")),
            ("limit", SchemaNode::number().with_default(10)),
            ("order", SchemaNode::enumeration(["asc", "desc"]).optional()),
        ])
        .flatten()
        .unwrap();

        assert_eq!(
            shape_to_json_schema(&shape),
            json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"},
                    "limit": {"type": "number", "default": 10},
                    "order": {"type": "string", "enum": ["asc", "desc"]}
                },
                "required": ["query"]
            })
        );
    }

    #[test]
    fn test_empty_shape_has_no_required() {
        assert_eq!(
            shape_to_json_schema(&Shape::new()),
            json!({"type": "object", "properties": {}})
        );
    }

    #[test]
    fn test_render_then_translate_preserves_labels() {
        let node = SchemaNode::object([
            ("meta", SchemaNode::record(SchemaNode::string(), SchemaNode::boolean())),
            ("ids", SchemaNode::array(SchemaNode::number()).optional()),
        ]);
        let back = from_json_schema(&node.to_json_schema()).flatten().unwrap();
        assert_eq!(back["meta"].readable_type_name(), "record<string, boolean>");
        assert!(back["ids"].unwrapped().optional);
    }
}
