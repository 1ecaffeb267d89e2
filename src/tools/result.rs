//! Tool invocation results and typed content items.

use crate::types::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Contents of a resource, embedded in results or returned by resource reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded binary payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
}

impl ResourceContents {
    pub fn text(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: Some("text/plain".to_string()),
            text: Some(text.into()),
            blob: None,
        }
    }
}

/// A typed content item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        /// Base64-encoded image bytes.
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        resource: ResourceContents,
    },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }
}

/// Result of one tool call, in the protocol wire shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResult {
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

impl InvocationResult {
    /// Successful result with a single text item.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            ..Self::default()
        }
    }

    /// Successful result carrying only structured content.
    pub fn structured(value: Value) -> Self {
        Self {
            structured_content: Some(value),
            ..Self::default()
        }
    }

    /// Error result with a single text item.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            content: vec![Content::text(text)],
            structured_content: None,
        }
    }

    /// Synthesize a text item from structured content when content is empty.
    pub fn normalize(&mut self) -> Result<()> {
        if self.content.is_empty() {
            if let Some(structured) = &self.structured_content {
                let text = serde_json::to_string(structured)?;
                self.content.push(Content::text(text));
            }
        }
        Ok(())
    }
}
