//! A multi-capability dispatch core for MCP-style servers.
//!
//! A server declares its tools, resources, and prompts once at startup
//! through a [`RegistryBuilder`]; a [`Dispatcher`] then routes each
//! inbound request to the right handler, validating arguments against
//! the capability's declaration first and normalizing every outcome
//! into a [`Response`]. Per-request failures are data, not crashes.
//!
//! ```rust
//! use mcp_dispatch::{
//!     CallToolResult, CapabilityRegistry, Content, Dispatcher, JsonObject, Tool, object,
//! };
//! use serde_json::json;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = CapabilityRegistry::builder()
//!     .tool(
//!         Tool::new(
//!             "add",
//!             "Add two numbers",
//!             object(json!({
//!                 "type": "object",
//!                 "properties": {
//!                     "a": {"type": "number"},
//!                     "b": {"type": "number"}
//!                 },
//!                 "required": ["a", "b"]
//!             })),
//!         ),
//!         |arguments: JsonObject| async move {
//!             let a = arguments["a"].as_f64().unwrap_or_default();
//!             let b = arguments["b"].as_f64().unwrap_or_default();
//!             Ok(CallToolResult::success(vec![Content::text((a + b).to_string())]))
//!         },
//!     )?
//!     .build();
//!
//! let dispatcher = Dispatcher::new(registry);
//! let result = dispatcher.call_tool("add", Some(object(json!({"a": 2, "b": 3})))).await?;
//! assert_eq!(result.content[0].as_text(), Some("5"));
//! # Ok(())
//! # }
//! ```

mod dispatcher;
pub mod error;
pub mod model;
mod prompt;
mod registry;
mod resolver;
pub mod schema;
mod validate;

pub use dispatcher::Dispatcher;
pub use error::{
    DispatchError, ErrorCode, ErrorData, RegistryError, TypeMismatch, ValidationError,
};
pub use model::*;
pub use prompt::{PromptTemplate, PromptTemplateError};
pub use registry::{
    CapabilityRegistry, DynPromptHandler, DynResourceHandler, DynToolHandler, PromptRender,
    PromptRoute, RegistryBuilder, ResourceEntry, ResourceRequest, ResourceRoute, ToolRoute,
};
pub use resolver::{ResolvedResource, TemplateError, UriTemplate};
pub use schema::schema_for_type;
pub use validate::{ValidationPolicy, validate_prompt_args, validate_tool_args};
