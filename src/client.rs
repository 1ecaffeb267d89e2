//! Product client capability and the registration handles passed to it.
//!
//! A client never sees the host. During [`Registrar::register_client`] it is
//! handed narrow registration objects that compile and forward whatever it
//! registers.
//!
//! [`Registrar::register_client`]: crate::registrar::Registrar::register_client

use crate::host::{ElicitOptions, ElicitRequest, ElicitResult, RegistrationHandle, ToolHost};
use crate::prompts::PromptSpec;
use crate::registrar::Registrar;
use crate::resources::ResourceHandler;
use crate::tools::{ConfigCheck, ToolHandler, ToolOwner, ToolSpec};
use crate::types::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// A product integration contributing tools, resources and prompts.
pub trait ProductClient: Send + Sync {
    /// Display name, used in tool titles and the configuration error.
    fn name(&self) -> &str;

    /// Prefix for tool names and resource URIs.
    fn tool_prefix(&self) -> &str;

    /// Queried on every tool call.
    fn is_configured(&self) -> bool;

    fn register_tools(&self, tools: &mut ToolRegistrations<'_>) -> Result<()>;

    fn register_resources(&self, _resources: &mut ResourceRegistrations<'_>) -> Result<()> {
        Ok(())
    }

    fn register_prompts(&self, _prompts: &mut PromptRegistrations<'_>) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Elicitation
// =============================================================================

/// Elicitation capability handed to clients. Cheap to clone into handlers.
#[derive(Clone)]
pub struct Elicitor {
    host: Arc<dyn ToolHost>,
    default_timeout: Duration,
}

impl std::fmt::Debug for Elicitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Elicitor")
            .field("default_timeout", &self.default_timeout)
            .finish_non_exhaustive()
    }
}

impl Elicitor {
    pub fn new(host: Arc<dyn ToolHost>, default_timeout: Duration) -> Self {
        Self {
            host,
            default_timeout,
        }
    }

    /// Ask the host for user input, bounded by the request or default timeout.
    pub async fn elicit(
        &self,
        request: ElicitRequest,
        options: ElicitOptions,
    ) -> Result<ElicitResult> {
        let timeout = options.timeout.unwrap_or(self.default_timeout);
        match tokio::time::timeout(timeout, self.host.elicit(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    "elicit_timed_out: timeout={}",
                    humantime::format_duration(timeout)
                );
                Err(Error::timeout(format!(
                    "Elicitation timed out after {}",
                    humantime::format_duration(timeout)
                )))
            }
        }
    }
}

// =============================================================================
// Registration handles
// =============================================================================

/// Tool registration capability for one client.
pub struct ToolRegistrations<'a> {
    registrar: &'a mut Registrar,
    owner: ToolOwner,
    is_configured: ConfigCheck,
    elicitor: Elicitor,
}

impl std::fmt::Debug for ToolRegistrations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistrations")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}

impl<'a> ToolRegistrations<'a> {
    pub(crate) fn new(
        registrar: &'a mut Registrar,
        owner: ToolOwner,
        is_configured: ConfigCheck,
        elicitor: Elicitor,
    ) -> Self {
        Self {
            registrar,
            owner,
            is_configured,
            elicitor,
        }
    }

    pub fn register(
        &mut self,
        spec: ToolSpec,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<RegistrationHandle> {
        self.registrar
            .register_tool(&self.owner, &spec, self.is_configured.clone(), handler)
    }

    pub fn elicitor(&self) -> Elicitor {
        self.elicitor.clone()
    }
}

/// Resource registration capability for one client.
pub struct ResourceRegistrations<'a> {
    registrar: &'a mut Registrar,
    tool_prefix: String,
}

impl std::fmt::Debug for ResourceRegistrations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistrations")
            .field("tool_prefix", &self.tool_prefix)
            .finish_non_exhaustive()
    }
}

impl<'a> ResourceRegistrations<'a> {
    pub(crate) fn new(registrar: &'a mut Registrar, tool_prefix: impl Into<String>) -> Self {
        Self {
            registrar,
            tool_prefix: tool_prefix.into(),
        }
    }

    /// Register `handler` at `{tool_prefix}://{name}/{path_template}`.
    pub fn register(
        &mut self,
        name: &str,
        path_template: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<RegistrationHandle> {
        self.registrar
            .register_resource(&self.tool_prefix, name, path_template, handler)
    }
}

/// Prompt registration capability for one client.
pub struct PromptRegistrations<'a> {
    registrar: &'a mut Registrar,
}

impl std::fmt::Debug for PromptRegistrations<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRegistrations").finish_non_exhaustive()
    }
}

impl<'a> PromptRegistrations<'a> {
    pub(crate) fn new(registrar: &'a mut Registrar) -> Self {
        Self { registrar }
    }

    pub fn register(&mut self, prompt: PromptSpec) -> Result<RegistrationHandle> {
        self.registrar.register_prompt(prompt)
    }
}
