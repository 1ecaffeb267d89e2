//! Tool registration: naming, annotations, description compilation and the
//! guarded invocation wrapper.
//!
//! A [`ToolSpec`] is compiled once into a [`RegisteredTool`]; at call time the
//! host only ever touches the [`ToolInvoker`].

pub mod annotations;
pub mod description;
pub mod invoke;
pub mod naming;
pub mod registered;
pub mod result;
pub mod spec;

pub use annotations::{derive_annotations, ToolAnnotations};
pub use description::compile_description;
pub use invoke::{tool_fn, ConfigCheck, RequestContext, ToolHandler, ToolInvoker};
pub use naming::{normalize_name, MAX_TOOL_NAME_LENGTH};
pub use registered::{RegisteredTool, ToolMetadata, ToolOwner};
pub use result::{Content, InvocationResult, ResourceContents};
pub use spec::{ExampleSpec, ParameterSpec, ToolSpec};
