//! Description compiler. Renders a ToolSpec into the text shown to models.
//!
//! Sections appear in a fixed order and are separated by a blank line:
//! summary, explicit parameters, schema-derived parameters, output
//! description, use cases, examples, hints. Empty sections are skipped.

use super::spec::{ExampleSpec, ParameterSpec, ToolSpec};
use crate::schema::{self, Shape};

const PARAMETERS_HEADER: &str = "**Parameters:**";

/// Compile the full description of a tool.
pub fn compile_description(spec: &ToolSpec) -> String {
    let mut sections: Vec<String> = vec![spec.summary.clone()];

    if !spec.parameters.is_empty() {
        sections.push(parameters_section(&spec.parameters));
    }

    // Emitted alongside the explicit list when both are supplied, and as a
    // bare header for an object schema with no fields.
    if let Some(shape) = spec.input_schema.as_ref().and_then(schema::flatten) {
        sections.push(schema_parameters_section(&shape));
    }

    if let Some(output) = &spec.output_description {
        sections.push(format!("**Output Description:** {}", output));
    }

    if !spec.use_cases.is_empty() {
        sections.push(format!("**Use Cases:** {}", numbered(&spec.use_cases)));
    }

    if !spec.examples.is_empty() {
        sections.push(examples_section(&spec.examples));
    }

    if !spec.hints.is_empty() {
        sections.push(format!("**Hints:** {}", numbered(&spec.hints)));
    }

    sections
        .into_iter()
        .filter(|section| !section.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
        .trim()
        .to_string()
}

/// One line per explicit parameter, constraints indented beneath it.
fn parameters_section(parameters: &[ParameterSpec]) -> String {
    let mut lines = vec![PARAMETERS_HEADER.to_string()];

    for parameter in parameters {
        let mut line = format!(
            "- {} ({})",
            parameter.name,
            schema::readable_type_name(&parameter.schema)
        );
        if parameter.required {
            line.push_str(" *required*");
        }
        if let Some(description) = &parameter.description {
            line.push_str(": ");
            line.push_str(description);
        }
        if !parameter.examples.is_empty() {
            line.push_str(&format!(" (e.g. {})", parameter.examples.join(", ")));
        }
        lines.push(line);

        for constraint in &parameter.constraints {
            lines.push(format!("  - {}", constraint));
        }
    }

    lines.join("\n")
}

/// One line per field of an object-like input schema.
fn schema_parameters_section(shape: &Shape) -> String {
    let mut lines = vec![PARAMETERS_HEADER.to_string()];
    lines.extend(shape.iter().map(|(key, field)| schema_field_line(key, field)));
    lines.join("\n")
}

fn schema_field_line(key: &str, field: &schema::SchemaNode) -> String {
    let unwrapped = schema::unwrap(field);

    let mut line = format!("- {} ({})", key, schema::readable_type_name(unwrapped.node));
    if !unwrapped.optional && unwrapped.default.is_none() {
        line.push_str(" *required*");
    }
    if let Some(description) = unwrapped.description {
        line.push_str(": ");
        line.push_str(description);
    }
    if let Some(default) = unwrapped.default {
        line.push_str(&format!(" (default: {})", default));
    }
    line
}

fn examples_section(examples: &[ExampleSpec]) -> String {
    let mut lines = vec!["**Examples:**".to_string()];

    for (i, example) in examples.iter().enumerate() {
        let parameters = serde_json::to_string_pretty(&example.parameters)
            .unwrap_or_else(|_| example.parameters.to_string());

        lines.push(format!("{}. {}", i + 1, example.description));
        lines.push("```json".to_string());
        lines.push(parameters);
        lines.push("```".to_string());
        if let Some(expected) = &example.expected_output {
            lines.push(format!("Expected Output: {}", expected));
        }
    }

    lines.join("\n")
}

/// `1. first 2. second ...`
fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join(" ")
}
