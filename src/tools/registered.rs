//! Compiled registration artifact for one tool.

use super::annotations::{derive_annotations, ToolAnnotations};
use super::description::compile_description;
use super::invoke::{ConfigCheck, RequestContext, ToolHandler, ToolInvoker};
use super::naming::normalize_name;
use super::result::InvocationResult;
use super::spec::{ParameterSpec, ToolSpec};
use crate::schema::{self, Shape};
use crate::telemetry::TelemetrySink;
use crate::types::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Metadata handed to the host alongside the invoker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    pub title: String,
    pub description: String,
    pub input_schema: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    pub annotations: ToolAnnotations,
}

/// Identity of the client a tool is compiled for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOwner {
    pub name: String,
    pub tool_prefix: String,
}

/// A tool after compilation: everything a host needs to expose it.
#[derive(Debug)]
pub struct RegisteredTool {
    pub name: String,
    pub title: String,
    pub description: String,
    pub input_shape: Shape,
    pub output_shape: Option<Shape>,
    pub annotations: ToolAnnotations,
    invoker: Arc<ToolInvoker>,
}

impl RegisteredTool {
    /// Compile `spec` for `owner`. Runs once per tool at registration time.
    pub fn compile(
        owner: &ToolOwner,
        spec: &ToolSpec,
        is_configured: ConfigCheck,
        handler: Arc<dyn ToolHandler>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        spec.validate()?;

        let name = normalize_name(&owner.tool_prefix, &spec.title);
        let title = format!("{}: {}", owner.name, spec.title);
        let description = compile_description(spec);
        let annotations = derive_annotations(&title, spec);

        let input_shape = spec
            .input_schema
            .as_ref()
            .and_then(schema::flatten)
            .unwrap_or_else(|| parameters_shape(&spec.parameters));
        let output_shape = spec.output_schema.as_ref().and_then(schema::flatten);

        let invoker = ToolInvoker::new(
            name.clone(),
            title.clone(),
            owner.name.clone(),
            is_configured,
            handler,
            telemetry,
        )
        .with_output_schema(spec.output_schema.is_some());

        Ok(Self {
            name,
            title,
            description,
            input_shape,
            output_shape,
            annotations,
            invoker: Arc::new(invoker),
        })
    }

    pub fn metadata(&self) -> ToolMetadata {
        ToolMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            input_schema: schema::shape_to_json_schema(&self.input_shape),
            output_schema: self.output_shape.as_ref().map(schema::shape_to_json_schema),
            annotations: self.annotations.clone(),
        }
    }

    /// The guarded wrapper, shared with the host.
    pub fn invoker(&self) -> Arc<ToolInvoker> {
        self.invoker.clone()
    }

    pub async fn invoke(&self, args: Value, ctx: RequestContext) -> Result<InvocationResult> {
        self.invoker.invoke(args, ctx).await
    }
}

/// Input shape derived from an explicit parameter list.
fn parameters_shape(parameters: &[ParameterSpec]) -> Shape {
    parameters
        .iter()
        .map(|parameter| {
            let mut field = parameter.schema.clone();
            if field.description.is_none() {
                field.description = parameter.description.clone();
            }
            let field = if parameter.required {
                field
            } else {
                field.optional()
            };
            (parameter.name.clone(), field)
        })
        .collect()
}
