//! Resource registration.
//!
//! Resources are addressed as `{tool_prefix}://{name}/{path_template}`. The
//! wrapper adds error reporting only: every failure is reported and re-raised,
//! with no domain-error carve-out.

pub mod invoke;
pub mod template;

pub use invoke::{resource_fn, ResourceHandler, ResourceInvoker};
pub use template::UriTemplate;

use crate::tools::ResourceContents;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of reading a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContents::text(uri, text)],
        }
    }
}

/// Compose the resource URL template for a client.
pub fn resource_url(tool_prefix: &str, name: &str, path_template: &str) -> String {
    format!("{}://{}/{}", tool_prefix, name, path_template)
}

/// A resource after registration.
#[derive(Debug, Clone)]
pub struct RegisteredResource {
    pub name: String,
    pub url: String,
    pub template: UriTemplate,
    pub invoker: Arc<ResourceInvoker>,
}
