//! Host registration capability.
//!
//! The registrar never subclasses or owns a protocol server. It is handed a
//! [`ToolHost`] and calls its registration methods with fully compiled
//! artifacts. [`LocalHost`] is the in-process implementation.

pub mod local;

pub use local::LocalHost;

use crate::prompts::PromptSpec;
use crate::resources::{ResourceInvoker, UriTemplate};
use crate::tools::{ToolInvoker, ToolMetadata};
use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Registration handles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    Tool,
    Resource,
    Prompt,
}

/// Returned by every successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationHandle {
    pub kind: HandleKind,
    pub name: String,
}

impl RegistrationHandle {
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            kind: HandleKind::Tool,
            name: name.into(),
        }
    }

    pub fn resource(name: impl Into<String>) -> Self {
        Self {
            kind: HandleKind::Resource,
            name: name.into(),
        }
    }

    pub fn prompt(name: impl Into<String>) -> Self {
        Self {
            kind: HandleKind::Prompt,
            name: name.into(),
        }
    }
}

// =============================================================================
// Elicitation
// =============================================================================

/// A request for structured input from the end user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElicitRequest {
    pub message: String,
    pub requested_schema: Value,
}

impl ElicitRequest {
    pub fn new(message: impl Into<String>, requested_schema: Value) -> Self {
        Self {
            message: message.into(),
            requested_schema,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElicitAction {
    Accept,
    Decline,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElicitResult {
    pub action: ElicitAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl ElicitResult {
    pub fn accept(content: Value) -> Self {
        Self {
            action: ElicitAction::Accept,
            content: Some(content),
        }
    }

    pub fn decline() -> Self {
        Self {
            action: ElicitAction::Decline,
            content: None,
        }
    }

    pub fn cancel() -> Self {
        Self {
            action: ElicitAction::Cancel,
            content: None,
        }
    }
}

/// Per-request elicitation options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElicitOptions {
    /// Overrides the configured default when set.
    pub timeout: Option<Duration>,
}

// =============================================================================
// Host trait
// =============================================================================

/// Registration and elicitation capabilities consumed from a protocol host.
///
/// Registration methods take `&self`; hosts keep their own interior state.
#[async_trait]
pub trait ToolHost: Send + Sync {
    fn register_tool(
        &self,
        name: &str,
        metadata: ToolMetadata,
        invoker: Arc<ToolInvoker>,
    ) -> Result<RegistrationHandle>;

    fn register_resource(
        &self,
        name: &str,
        template: UriTemplate,
        invoker: Arc<ResourceInvoker>,
    ) -> Result<RegistrationHandle>;

    fn register_prompt(&self, prompt: PromptSpec) -> Result<RegistrationHandle>;

    async fn elicit(&self, request: ElicitRequest) -> Result<ElicitResult>;
}
