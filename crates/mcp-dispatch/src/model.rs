//! Data model for the dispatcher core.
//!
//! These are the protocol-facing shapes: capability descriptors, the
//! content items handlers produce, and the transient request/response
//! values that cross the transport boundary. Serialization follows the
//! MCP wire conventions (camelCase keys, `type`-tagged content).

use serde::{Deserialize, Serialize};

mod content;
mod prompt;
mod resource;
mod tool;

pub use content::*;
pub use prompt::*;
pub use resource::*;
pub use tool::*;

use crate::error::ErrorData;

/// A JSON object, the shape of every argument map in this crate.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// Convert a json value into a [`JsonObject`], discarding non-object values.
pub fn object(value: serde_json::Value) -> JsonObject {
    match value {
        serde_json::Value::Object(object) => object,
        _ => JsonObject::default(),
    }
}

/// The category a capability belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    Tool,
    Resource,
    Prompt,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Tool => f.write_str("tool"),
            CapabilityKind::Resource => f.write_str("resource"),
            CapabilityKind::Prompt => f.write_str("prompt"),
        }
    }
}

/// The role a prompt message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A decoded inbound request, one per call.
///
/// The transport is responsible for producing these; the dispatcher
/// never sees bytes. Tools and prompts are addressed by name, resources
/// by uri.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Request {
    Tool {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<JsonObject>,
    },
    Resource {
        uri: String,
    },
    Prompt {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<JsonObject>,
    },
}

impl Request {
    /// The kind this request addresses.
    pub fn kind(&self) -> CapabilityKind {
        match self {
            Request::Tool { .. } => CapabilityKind::Tool,
            Request::Resource { .. } => CapabilityKind::Resource,
            Request::Prompt { .. } => CapabilityKind::Prompt,
        }
    }

    /// The name or uri this request addresses.
    pub fn identity(&self) -> &str {
        match self {
            Request::Tool { name, .. } | Request::Prompt { name, .. } => name,
            Request::Resource { uri } => uri,
        }
    }
}

/// The normalized outcome of a dispatched request.
///
/// Every request terminates in exactly one of these; per-request errors
/// are carried as data, never propagated as process failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Success { content: Vec<Content> },
    Error { error: ErrorData },
}

impl Response {
    pub fn success(content: Vec<Content>) -> Self {
        Response::Success { content }
    }

    pub fn error(error: ErrorData) -> Self {
        Response::Error { error }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

impl From<ErrorData> for Response {
    fn from(error: ErrorData) -> Self {
        Response::Error { error }
    }
}
