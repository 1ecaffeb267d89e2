//! Resource read wrapper. Reports and re-raises every failure.

use super::ReadResourceResult;
use crate::telemetry::{TelemetryEvent, TelemetrySink};
use crate::tools::RequestContext;
use crate::types::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

/// Client-supplied resource callback.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn read(
        &self,
        uri: String,
        vars: HashMap<String, String>,
        ctx: RequestContext,
    ) -> Result<ReadResourceResult>;
}

#[async_trait]
impl<F, Fut> ResourceHandler for F
where
    F: Fn(String, HashMap<String, String>, RequestContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ReadResourceResult>> + Send + 'static,
{
    async fn read(
        &self,
        uri: String,
        vars: HashMap<String, String>,
        ctx: RequestContext,
    ) -> Result<ReadResourceResult> {
        (self)(uri, vars, ctx).await
    }
}

/// Box an async closure as a resource handler.
pub fn resource_fn<F, Fut>(f: F) -> Arc<dyn ResourceHandler>
where
    F: Fn(String, HashMap<String, String>, RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ReadResourceResult>> + Send + 'static,
{
    Arc::new(f)
}

/// The wrapper a host calls for one registered resource.
pub struct ResourceInvoker {
    name: String,
    url: String,
    handler: Arc<dyn ResourceHandler>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl std::fmt::Debug for ResourceInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceInvoker")
            .field("name", &self.name)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl ResourceInvoker {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        handler: Arc<dyn ResourceHandler>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            handler,
            telemetry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Read through the client callback. Any failure, domain errors included,
    /// is reported with the resource name and url and then returned.
    pub async fn read(
        &self,
        uri: String,
        vars: HashMap<String, String>,
        ctx: RequestContext,
    ) -> Result<ReadResourceResult> {
        match self.handler.read(uri, vars, ctx).await {
            Ok(result) => Ok(result),
            Err(err) => {
                tracing::error!(
                    "resource_read_failed: resource={}, url={}, error={}",
                    self.name,
                    self.url,
                    err
                );
                let (name, url) = (self.name.as_str(), self.url.as_str());
                self.telemetry
                    .notify(&err, &|event: &mut TelemetryEvent| {
                        event.unhandled = true;
                        event.add_metadata("app", "resource", name);
                        event.add_metadata("app", "url", url);
                    });
                Err(err)
            }
        }
    }
}
