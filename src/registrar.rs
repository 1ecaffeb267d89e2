//! Registration driver.
//!
//! Compiles what clients register and forwards the artifacts to the host.
//! Registration is a sequential setup phase; the compiled tools are kept
//! write-once for lookup afterwards.

use crate::client::{
    Elicitor, ProductClient, PromptRegistrations, ResourceRegistrations, ToolRegistrations,
};
use crate::host::{RegistrationHandle, ToolHost};
use crate::prompts::PromptSpec;
use crate::resources::{
    resource_url, RegisteredResource, ResourceHandler, ResourceInvoker, UriTemplate,
};
use crate::telemetry::TelemetrySink;
use crate::tools::{ConfigCheck, RegisteredTool, ToolHandler, ToolOwner, ToolSpec};
use crate::types::{Config, Error, RegistrationConfig, Result};
use indexmap::IndexMap;
use std::sync::Arc;

pub struct Registrar {
    host: Arc<dyn ToolHost>,
    telemetry: Arc<dyn TelemetrySink>,
    config: RegistrationConfig,
    tools: IndexMap<String, Arc<RegisteredTool>>,
    /// Keyed by composed URL; names are only unique per prefix.
    resources: IndexMap<String, RegisteredResource>,
    prompts: Vec<String>,
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("config", &self.config)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("prompts", &self.prompts)
            .finish_non_exhaustive()
    }
}

impl Registrar {
    pub fn new(host: Arc<dyn ToolHost>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self::with_config(host, telemetry, &Config::default())
    }

    pub fn with_config(
        host: Arc<dyn ToolHost>,
        telemetry: Arc<dyn TelemetrySink>,
        config: &Config,
    ) -> Self {
        Self {
            host,
            telemetry,
            config: config.registration.clone(),
            tools: IndexMap::new(),
            resources: IndexMap::new(),
            prompts: Vec::new(),
        }
    }

    // =========================================================================
    // Client driver
    // =========================================================================

    /// Run a client's tool, resource and prompt registrations, in that order.
    pub fn register_client(&mut self, client: Arc<dyn ProductClient>) -> Result<()> {
        tracing::info!(
            "client_registering: client={}, prefix={}",
            client.name(),
            client.tool_prefix()
        );

        let owner = ToolOwner {
            name: client.name().to_string(),
            tool_prefix: client.tool_prefix().to_string(),
        };
        let is_configured: ConfigCheck = {
            let client = client.clone();
            Arc::new(move || client.is_configured())
        };
        let elicitor = Elicitor::new(self.host.clone(), self.config.elicit_timeout);

        let tools_before = self.tools.len();
        client.register_tools(&mut ToolRegistrations::new(
            self,
            owner.clone(),
            is_configured,
            elicitor,
        ))?;
        client.register_resources(&mut ResourceRegistrations::new(self, &owner.tool_prefix))?;
        client.register_prompts(&mut PromptRegistrations::new(self))?;

        tracing::info!(
            "client_registered: client={}, tools={}",
            owner.name,
            self.tools.len() - tools_before
        );
        Ok(())
    }

    // =========================================================================
    // Tools
    // =========================================================================

    /// Compile `spec` and hand the result to the host.
    pub fn register_tool(
        &mut self,
        owner: &ToolOwner,
        spec: &ToolSpec,
        is_configured: ConfigCheck,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<RegistrationHandle> {
        let tool = RegisteredTool::compile(owner, spec, is_configured, handler, self.telemetry.clone())?;

        if !self.config.allow_duplicate_names && self.tools.contains_key(&tool.name) {
            return Err(Error::validation(format!(
                "Tool name already registered: {}",
                tool.name
            )));
        }

        let handle = self
            .host
            .register_tool(&tool.name, tool.metadata(), tool.invoker())?;
        tracing::info!(
            "tool_registered: name={}, title={}, fields={}",
            tool.name,
            tool.title,
            tool.input_shape.len()
        );
        self.tools.insert(tool.name.clone(), Arc::new(tool));
        Ok(handle)
    }

    /// Compiled tools in registration order.
    pub fn tools(&self) -> impl Iterator<Item = &Arc<RegisteredTool>> {
        self.tools.values()
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<RegisteredTool>> {
        self.tools.get(name)
    }

    // =========================================================================
    // Resources and prompts
    // =========================================================================

    /// Register a resource at `{tool_prefix}://{name}/{path_template}`.
    pub fn register_resource(
        &mut self,
        tool_prefix: &str,
        name: &str,
        path_template: &str,
        handler: Arc<dyn ResourceHandler>,
    ) -> Result<RegistrationHandle> {
        let url = resource_url(tool_prefix, name, path_template);
        let template = UriTemplate::parse(&url)?;

        if !self.config.allow_duplicate_names && self.resources.contains_key(&url) {
            return Err(Error::validation(format!(
                "Resource already registered: {}",
                url
            )));
        }

        let invoker = Arc::new(ResourceInvoker::new(
            name,
            url.clone(),
            handler,
            self.telemetry.clone(),
        ));
        let handle = self
            .host
            .register_resource(name, template.clone(), invoker.clone())?;
        tracing::info!("resource_registered: name={}, url={}", name, url);

        self.resources.insert(
            url.clone(),
            RegisteredResource {
                name: name.to_string(),
                url,
                template,
                invoker,
            },
        );
        Ok(handle)
    }

    pub fn resources(&self) -> impl Iterator<Item = &RegisteredResource> {
        self.resources.values()
    }

    /// Forward a prompt to the host unchanged.
    pub fn register_prompt(&mut self, prompt: PromptSpec) -> Result<RegistrationHandle> {
        let name = prompt.name.clone();
        let handle = self.host.register_prompt(prompt)?;
        tracing::info!("prompt_registered: name={}", name);
        self.prompts.push(name);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::LocalHost;
    use crate::resources::{resource_fn, ReadResourceResult};
    use crate::telemetry::MemorySink;
    use crate::tools::{tool_fn, InvocationResult};
    use serde_json::json;

    fn owner() -> ToolOwner {
        ToolOwner {
            name: "Test Product".to_string(),
            tool_prefix: "test_product".to_string(),
        }
    }

    fn ok_handler() -> Arc<dyn ToolHandler> {
        tool_fn(|_args, _ctx| async move { Ok(InvocationResult::text("ok")) })
    }

    #[tokio::test]
    async fn test_register_tool_reaches_host() {
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::new(host.clone(), Arc::new(MemorySink::new()));

        let handle = registrar
            .register_tool(
                &owner(),
                &ToolSpec::new("Test Tool", "A test tool"),
                Arc::new(|| true),
                ok_handler(),
            )
            .unwrap();
        assert_eq!(handle, RegistrationHandle::tool("test_product_test_tool"));

        let metadata = host.tool_metadata("test_product_test_tool").unwrap();
        assert_eq!(metadata.title, "Test Product: Test Tool");
        assert_eq!(metadata.description, "A test tool");
        assert!(registrar.tool("test_product_test_tool").is_some());

        let result = host
            .call_tool("test_product_test_tool", json!({}))
            .await
            .unwrap();
        assert_eq!(result.content[0].as_text(), Some("ok"));
    }

    #[test]
    fn test_duplicate_tool_names_rejected() {
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::new(host, Arc::new(MemorySink::new()));
        let spec = ToolSpec::new("Test Tool", "A test tool");

        registrar
            .register_tool(&owner(), &spec, Arc::new(|| true), ok_handler())
            .unwrap();
        let err = registrar
            .register_tool(&owner(), &spec, Arc::new(|| true), ok_handler())
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(registrar.tools().count(), 1);
    }

    #[test]
    fn test_duplicate_tool_names_allowed_by_config() {
        let mut config = Config::default();
        config.registration.allow_duplicate_names = true;
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::with_config(host.clone(), Arc::new(MemorySink::new()), &config);

        registrar
            .register_tool(&owner(), &ToolSpec::new("Test Tool", "first"), Arc::new(|| true), ok_handler())
            .unwrap();
        registrar
            .register_tool(&owner(), &ToolSpec::new("Test  Tool", "second"), Arc::new(|| true), ok_handler())
            .unwrap();

        assert_eq!(registrar.tools().count(), 1);
        assert_eq!(
            host.tool_metadata("test_product_test_tool").unwrap().description,
            "second"
        );
    }

    #[tokio::test]
    async fn test_register_resource_composes_url() {
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::new(host.clone(), Arc::new(MemorySink::new()));

        registrar
            .register_resource(
                "test_product",
                "issues",
                "{id}",
                resource_fn(|uri, _vars, _ctx| async move { Ok(ReadResourceResult::text(uri, "body")) }),
            )
            .unwrap();

        let resource = registrar.resources().next().unwrap();
        assert_eq!(resource.url, "test_product://issues/{id}");
        assert_eq!(resource.template.variables(), vec!["id"]);

        let result = host.read_resource("test_product://issues/9").await.unwrap();
        assert_eq!(result.contents[0].text.as_deref(), Some("body"));
    }

    #[tokio::test]
    async fn test_same_resource_name_under_different_prefixes() {
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::new(host.clone(), Arc::new(MemorySink::new()));

        for prefix in ["alpha", "beta"] {
            registrar
                .register_resource(
                    prefix,
                    "issues",
                    "{id}",
                    resource_fn(move |uri, _vars, _ctx| async move {
                        Ok(ReadResourceResult::text(uri, prefix))
                    }),
                )
                .unwrap();
        }
        assert_eq!(registrar.resources().count(), 2);

        let alpha = host.read_resource("alpha://issues/1").await.unwrap();
        assert_eq!(alpha.contents[0].text.as_deref(), Some("alpha"));
        let beta = host.read_resource("beta://issues/1").await.unwrap();
        assert_eq!(beta.contents[0].text.as_deref(), Some("beta"));

        let err = registrar
            .register_resource(
                "alpha",
                "issues",
                "{id}",
                resource_fn(|uri, _vars, _ctx| async move { Ok(ReadResourceResult::text(uri, "")) }),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_register_resource_rejects_bad_template() {
        let host = Arc::new(LocalHost::new());
        let mut registrar = Registrar::new(host, Arc::new(MemorySink::new()));
        let err = registrar
            .register_resource(
                "test_product",
                "issues",
                "{id",
                resource_fn(|uri, _vars, _ctx| async move { Ok(ReadResourceResult::text(uri, "")) }),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(registrar.resources().count(), 0);
    }
}
