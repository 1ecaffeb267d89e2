//! Guarded invocation path for registered tools.
//!
//! ```text
//! ConfigCheck → Delegating → Validating → Normalizing → Done
//!      │             │            │
//!      └─────────────┴────────────┴──→ classify: domain → isError result
//!                                                other  → report + re-raise
//! ```

use super::result::InvocationResult;
use crate::telemetry::{TelemetryEvent, TelemetrySink};
use crate::types::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Request context
// =============================================================================

/// Per-call context handed through to callbacks.
///
/// The cancellation token belongs to the host; wrappers never trigger it.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub session_id: Option<String>,
    pub cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

// =============================================================================
// Tool handler
// =============================================================================

/// Client-supplied tool callback.
///
/// Return [`Error::Tool`] for expected, user-facing failures; any other error
/// is treated as unexpected.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Value, ctx: RequestContext) -> Result<InvocationResult>;
}

#[async_trait]
impl<F, Fut> ToolHandler for F
where
    F: Fn(Value, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<InvocationResult>> + Send + 'static,
{
    async fn call(&self, args: Value, ctx: RequestContext) -> Result<InvocationResult> {
        (self)(args, ctx).await
    }
}

/// Box an async closure as a tool handler.
pub fn tool_fn<F, Fut>(f: F) -> Arc<dyn ToolHandler>
where
    F: Fn(Value, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<InvocationResult>> + Send + 'static,
{
    Arc::new(f)
}

/// Live configuration query of the owning client.
pub type ConfigCheck = Arc<dyn Fn() -> bool + Send + Sync>;

// =============================================================================
// Invoker
// =============================================================================

/// The wrapper a host calls for one registered tool.
///
/// Holds no per-call state; concurrent invocations are independent.
pub struct ToolInvoker {
    name: String,
    title: String,
    client_name: String,
    has_output_schema: bool,
    is_configured: ConfigCheck,
    handler: Arc<dyn ToolHandler>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("client_name", &self.client_name)
            .field("has_output_schema", &self.has_output_schema)
            .finish_non_exhaustive()
    }
}

impl ToolInvoker {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        client_name: impl Into<String>,
        is_configured: ConfigCheck,
        handler: Arc<dyn ToolHandler>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            client_name: client_name.into(),
            has_output_schema: false,
            is_configured,
            handler,
            telemetry,
        }
    }

    /// Require structured content on non-error results.
    pub fn with_output_schema(mut self, declared: bool) -> Self {
        self.has_output_schema = declared;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Run one call through the guarded path.
    ///
    /// Domain errors come back as `Ok` with `is_error` set. Every other error
    /// is reported to telemetry with the tool name and returned unchanged.
    pub async fn invoke(&self, args: Value, ctx: RequestContext) -> Result<InvocationResult> {
        match self.run(args, ctx).await {
            Ok(result) => Ok(result),
            Err(err) if err.is_domain() => {
                tracing::debug!("tool_domain_error: tool={}, error={}", self.name, err);
                Ok(InvocationResult::error(format!(
                    "Error executing {}: {}",
                    self.title, err
                )))
            }
            Err(err) => {
                tracing::error!(
                    "tool_call_failed: tool={}, kind={}, error={}",
                    self.name,
                    err.kind(),
                    err
                );
                let name = self.name.as_str();
                self.telemetry
                    .notify(&err, &|event: &mut TelemetryEvent| {
                        event.unhandled = true;
                        event.add_metadata("app", "tool", name);
                    });
                Err(err)
            }
        }
    }

    async fn run(&self, args: Value, ctx: RequestContext) -> Result<InvocationResult> {
        if !(self.is_configured)() {
            tracing::warn!(
                "tool_not_configured: tool={}, client={}",
                self.name,
                self.client_name
            );
            return Err(Error::not_configured(&self.client_name));
        }

        let mut result = self.handler.call(args, ctx).await?;

        if !result.is_error && self.has_output_schema && result.structured_content.is_none() {
            return Err(Error::MissingStructuredContent {
                tool: self.title.clone(),
            });
        }

        result.normalize()?;
        Ok(result)
    }
}
