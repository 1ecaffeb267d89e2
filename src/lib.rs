//! # MCP Registrar - Tool and Resource Registration Adapter
//!
//! Turns product-client tool specifications into everything a protocol host
//! needs to expose them:
//! - Normalized, length-bounded tool names
//! - Behavioral annotations with fixed defaults
//! - Markdown descriptions compiled from structured metadata
//! - Input/output shapes introspected from a closed schema model
//! - A guarded invocation wrapper that absorbs domain errors and reports
//!   everything else to a telemetry sink
//! - Resource wrappers with composed URIs, and prompt pass-through
//!
//! ## Architecture
//!
//! ```text
//!   ProductClient ──register_tools──→ Registrar ──compile──→ RegisteredTool
//!                                         │                        │
//!                                         └──register_tool──→ ToolHost
//!                                                                  │
//!   host call ─────────────────────────────────→ ToolInvoker ←─────┘
//!                                                    │
//!                                          TelemetrySink (non-domain errors)
//! ```

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod client;
pub mod host;
pub mod prompts;
pub mod registrar;
pub mod resources;
pub mod schema;
pub mod telemetry;
pub mod tools;
pub mod types;

pub mod observability;

pub use client::{Elicitor, ProductClient};
pub use host::{LocalHost, ToolHost};
pub use registrar::Registrar;
pub use schema::{SchemaKind, SchemaNode, Shape};
pub use telemetry::{MemorySink, TelemetrySink, TracingSink};
pub use tools::{InvocationResult, ToolSpec};
pub use types::{Config, Error, Result};
