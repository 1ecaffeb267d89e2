//! Shared fakes for integration tests.

#![allow(dead_code)]

use mcp_registrar::client::{
    PromptRegistrations, ResourceRegistrations, ToolRegistrations,
};
use mcp_registrar::prompts::PromptSpec;
use mcp_registrar::resources::ResourceHandler;
use mcp_registrar::tools::{ToolHandler, ToolSpec};
use mcp_registrar::{LocalHost, MemorySink, ProductClient, Registrar, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const CLIENT_NAME: &str = "Test Product";
pub const TOOL_PREFIX: &str = "test_product";

/// A product client whose registrations are supplied by the test.
pub struct FakeClient {
    configured: AtomicBool,
    tools: Vec<(ToolSpec, Arc<dyn ToolHandler>)>,
    resources: Vec<(String, String, Arc<dyn ResourceHandler>)>,
    prompts: Vec<PromptSpec>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            configured: AtomicBool::new(true),
            tools: Vec::new(),
            resources: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn tool(mut self, spec: ToolSpec, handler: Arc<dyn ToolHandler>) -> Self {
        self.tools.push((spec, handler));
        self
    }

    pub fn resource(mut self, name: &str, path: &str, handler: Arc<dyn ResourceHandler>) -> Self {
        self.resources
            .push((name.to_string(), path.to_string(), handler));
        self
    }

    pub fn prompt(mut self, prompt: PromptSpec) -> Self {
        self.prompts.push(prompt);
        self
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }
}

impl ProductClient for FakeClient {
    fn name(&self) -> &str {
        CLIENT_NAME
    }

    fn tool_prefix(&self) -> &str {
        TOOL_PREFIX
    }

    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    fn register_tools(&self, tools: &mut ToolRegistrations<'_>) -> Result<()> {
        for (spec, handler) in &self.tools {
            tools.register(spec.clone(), handler.clone())?;
        }
        Ok(())
    }

    fn register_resources(&self, resources: &mut ResourceRegistrations<'_>) -> Result<()> {
        for (name, path, handler) in &self.resources {
            resources.register(name, path, handler.clone())?;
        }
        Ok(())
    }

    fn register_prompts(&self, prompts: &mut PromptRegistrations<'_>) -> Result<()> {
        for prompt in &self.prompts {
            prompts.register(prompt.clone())?;
        }
        Ok(())
    }
}

/// A registered client with its host and telemetry sink.
pub struct Harness {
    pub client: Arc<FakeClient>,
    pub host: Arc<LocalHost>,
    pub sink: Arc<MemorySink>,
    pub registrar: Registrar,
}

pub fn register(client: FakeClient) -> Harness {
    mcp_registrar::observability::init_tracing();

    let client = Arc::new(client);
    let host = Arc::new(LocalHost::new());
    let sink = Arc::new(MemorySink::new());
    let mut registrar = Registrar::new(host.clone(), sink.clone());
    registrar
        .register_client(client.clone())
        .unwrap();

    Harness {
        client,
        host,
        sink,
        registrar,
    }
}
