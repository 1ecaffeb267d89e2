//! Prompt registration.
//!
//! Prompts pass straight through to the host. No wrapping, no reporting.

use crate::tools::{Content, RequestContext};
use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: Content,
}

impl PromptMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Content::text(text),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Content::text(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetPromptResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub messages: Vec<PromptMessage>,
}

/// A declared prompt argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl PromptArgument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Client-supplied prompt callback.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn get(&self, args: HashMap<String, String>, ctx: RequestContext)
        -> Result<GetPromptResult>;
}

#[async_trait]
impl<F, Fut> PromptHandler for F
where
    F: Fn(HashMap<String, String>, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<GetPromptResult>> + Send + 'static,
{
    async fn get(
        &self,
        args: HashMap<String, String>,
        ctx: RequestContext,
    ) -> Result<GetPromptResult> {
        (self)(args, ctx).await
    }
}

/// Box an async closure as a prompt handler.
pub fn prompt_fn<F, Fut>(f: F) -> Arc<dyn PromptHandler>
where
    F: Fn(HashMap<String, String>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GetPromptResult>> + Send + 'static,
{
    Arc::new(f)
}

/// A prompt as handed to the host.
#[derive(Clone)]
pub struct PromptSpec {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub arguments: Vec<PromptArgument>,
    pub handler: Arc<dyn PromptHandler>,
}

impl std::fmt::Debug for PromptSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSpec")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

impl PromptSpec {
    pub fn new(name: impl Into<String>, handler: Arc<dyn PromptHandler>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            arguments: Vec::new(),
            handler,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn argument(mut self, argument: PromptArgument) -> Self {
        self.arguments.push(argument);
        self
    }

    pub async fn get(
        &self,
        args: HashMap<String, String>,
        ctx: RequestContext,
    ) -> Result<GetPromptResult> {
        self.handler.get(args, ctx).await
    }
}
