//! In-process host: stores registrations and dispatches calls to them.

use super::{ElicitRequest, ElicitResult, RegistrationHandle, ToolHost};
use crate::prompts::{GetPromptResult, PromptSpec};
use crate::resources::{ReadResourceResult, ResourceInvoker, UriTemplate};
use crate::tools::{InvocationResult, RequestContext, ToolInvoker, ToolMetadata};
use crate::types::{Error, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Answers elicitation requests on behalf of a user.
pub type ElicitResponder = Arc<dyn Fn(&ElicitRequest) -> ElicitResult + Send + Sync>;

#[derive(Debug, Clone)]
struct HostedTool {
    metadata: ToolMetadata,
    invoker: Arc<ToolInvoker>,
}

#[derive(Debug, Clone)]
struct HostedResource {
    name: String,
    template: UriTemplate,
    invoker: Arc<ResourceInvoker>,
}

/// A [`ToolHost`] that keeps everything in memory.
///
/// Locks are only held to clone an entry out; never across an await.
#[derive(Default)]
pub struct LocalHost {
    tools: RwLock<IndexMap<String, HostedTool>>,
    /// Keyed by URI template.
    resources: RwLock<IndexMap<String, HostedResource>>,
    prompts: RwLock<IndexMap<String, PromptSpec>>,
    responder: Option<ElicitResponder>,
}

impl std::fmt::Debug for LocalHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalHost")
            .field("tools", &read(&self.tools).len())
            .field("resources", &read(&self.resources).len())
            .field("prompts", &read(&self.prompts).len())
            .field("has_responder", &self.responder.is_some())
            .finish()
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl LocalHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer elicitation requests with `responder` instead of declining.
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ElicitRequest) -> ElicitResult + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    pub async fn call_tool(&self, name: &str, args: Value) -> Result<InvocationResult> {
        self.call_tool_with(name, args, RequestContext::new()).await
    }

    pub async fn call_tool_with(
        &self,
        name: &str,
        args: Value,
        ctx: RequestContext,
    ) -> Result<InvocationResult> {
        let invoker = read(&self.tools)
            .get(name)
            .map(|tool| tool.invoker.clone())
            .ok_or_else(|| Error::not_found(format!("Unknown tool: {}", name)))?;
        invoker.invoke(args, ctx).await
    }

    /// Read the first registered resource whose template matches `uri`.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult> {
        self.read_resource_with(uri, RequestContext::new()).await
    }

    pub async fn read_resource_with(
        &self,
        uri: &str,
        ctx: RequestContext,
    ) -> Result<ReadResourceResult> {
        let (invoker, vars) = read(&self.resources)
            .values()
            .find_map(|resource| {
                resource
                    .template
                    .match_uri(uri)
                    .map(|vars| (resource.invoker.clone(), vars))
            })
            .ok_or_else(|| Error::not_found(format!("No resource matches: {}", uri)))?;
        invoker.read(uri.to_string(), vars, ctx).await
    }

    pub async fn get_prompt(
        &self,
        name: &str,
        args: HashMap<String, String>,
    ) -> Result<GetPromptResult> {
        let prompt = read(&self.prompts)
            .get(name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Unknown prompt: {}", name)))?;
        prompt.get(args, RequestContext::new()).await
    }

    // =========================================================================
    // Listing
    // =========================================================================

    pub fn tool_metadata(&self, name: &str) -> Option<ToolMetadata> {
        read(&self.tools).get(name).map(|tool| tool.metadata.clone())
    }

    /// Registered tool names with their metadata, in registration order.
    pub fn list_tools(&self) -> Vec<(String, ToolMetadata)> {
        read(&self.tools)
            .iter()
            .map(|(name, tool)| (name.clone(), tool.metadata.clone()))
            .collect()
    }

    /// Registered resource names with their URI templates.
    pub fn list_resources(&self) -> Vec<(String, String)> {
        read(&self.resources)
            .values()
            .map(|resource| (resource.name.clone(), resource.template.to_string()))
            .collect()
    }

    pub fn list_prompts(&self) -> Vec<String> {
        read(&self.prompts).keys().cloned().collect()
    }
}

#[async_trait]
impl ToolHost for LocalHost {
    fn register_tool(
        &self,
        name: &str,
        metadata: ToolMetadata,
        invoker: Arc<ToolInvoker>,
    ) -> Result<RegistrationHandle> {
        write(&self.tools).insert(name.to_string(), HostedTool { metadata, invoker });
        Ok(RegistrationHandle::tool(name))
    }

    fn register_resource(
        &self,
        name: &str,
        template: UriTemplate,
        invoker: Arc<ResourceInvoker>,
    ) -> Result<RegistrationHandle> {
        let resource = HostedResource {
            name: name.to_string(),
            template,
            invoker,
        };
        write(&self.resources).insert(resource.template.to_string(), resource);
        Ok(RegistrationHandle::resource(name))
    }

    fn register_prompt(&self, prompt: PromptSpec) -> Result<RegistrationHandle> {
        let handle = RegistrationHandle::prompt(&prompt.name);
        write(&self.prompts).insert(prompt.name.clone(), prompt);
        Ok(handle)
    }

    async fn elicit(&self, request: ElicitRequest) -> Result<ElicitResult> {
        Ok(match &self.responder {
            Some(responder) => responder(&request),
            None => ElicitResult::decline(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ElicitAction;
    use crate::prompts::{prompt_fn, PromptMessage};
    use crate::resources::resource_fn;
    use crate::telemetry::MemorySink;
    use crate::tools::{tool_fn, ToolAnnotations};
    use serde_json::json;

    fn metadata(title: &str) -> ToolMetadata {
        ToolMetadata {
            title: title.to_string(),
            description: String::new(),
            input_schema: json!({"type": "object", "properties": {}}),
            output_schema: None,
            annotations: ToolAnnotations::new(title),
        }
    }

    fn echo_invoker() -> Arc<ToolInvoker> {
        Arc::new(ToolInvoker::new(
            "acme_echo",
            "Acme: Echo",
            "Acme",
            Arc::new(|| true),
            tool_fn(|args, _ctx| async move { Ok(InvocationResult::text(args.to_string())) }),
            Arc::new(MemorySink::new()),
        ))
    }

    #[tokio::test]
    async fn test_call_registered_tool() {
        let host = LocalHost::new();
        let handle = host
            .register_tool("acme_echo", metadata("Acme: Echo"), echo_invoker())
            .unwrap();
        assert_eq!(handle, RegistrationHandle::tool("acme_echo"));

        let result = host.call_tool("acme_echo", json!({"a": 1})).await.unwrap();
        assert_eq!(result.content[0].as_text(), Some(r#"{"a":1}"#));
        assert_eq!(host.list_tools().len(), 1);
        assert_eq!(host.tool_metadata("acme_echo").unwrap().title, "Acme: Echo");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let host = LocalHost::new();
        let err = host.call_tool("missing", json!({})).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_read_resource_by_template() {
        let host = LocalHost::new();
        let url = "acme://issues/{id}";
        let invoker = Arc::new(ResourceInvoker::new(
            "issues",
            url,
            resource_fn(|uri, vars, _ctx| async move {
                Ok(ReadResourceResult::text(uri, vars["id"].clone()))
            }),
            Arc::new(MemorySink::new()),
        ));
        host.register_resource("issues", UriTemplate::parse(url).unwrap(), invoker)
            .unwrap();

        let result = host.read_resource("acme://issues/7").await.unwrap();
        assert_eq!(result.contents[0].uri, "acme://issues/7");
        assert_eq!(result.contents[0].text.as_deref(), Some("7"));

        let err = host.read_resource("acme://other/7").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_prompt() {
        let host = LocalHost::new();
        host.register_prompt(PromptSpec::new(
            "greet",
            prompt_fn(|_args, _ctx| async move {
                Ok(GetPromptResult {
                    description: None,
                    messages: vec![PromptMessage::user("hi")],
                })
            }),
        ))
        .unwrap();

        let result = host.get_prompt("greet", HashMap::new()).await.unwrap();
        assert_eq!(result.messages.len(), 1);
        assert_eq!(host.list_prompts(), vec!["greet".to_string()]);
    }

    #[tokio::test]
    async fn test_elicit_declines_without_responder() {
        let host = LocalHost::new();
        let result = host
            .elicit(ElicitRequest::new("?", json!({})))
            .await
            .unwrap();
        assert_eq!(result.action, ElicitAction::Decline);

        let host = LocalHost::new().with_responder(|_| ElicitResult::accept(json!({"ok": true})));
        let result = host
            .elicit(ElicitRequest::new("?", json!({})))
            .await
            .unwrap();
        assert_eq!(result.action, ElicitAction::Accept);
    }
}
