//! Central request dispatch.
//!
//! The dispatcher owns the full request lifecycle: look the capability
//! up in the registry, validate arguments against its declaration, run
//! the handler, and normalize the outcome. A [`Response`] always comes
//! back; per-request failures are turned into structured error payloads
//! at this boundary and never escape as panics or process exits.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    error::DispatchError,
    model::{
        CallToolResult, CapabilityKind, Content, GetPromptResult, JsonObject, Prompt,
        ReadResourceResult, Request, Resource, ResourceTemplate, Response, Tool,
    },
    registry::{CapabilityRegistry, PromptRender, ResourceRequest},
    validate::{ValidationPolicy, validate_prompt_args, validate_tool_args},
};

/// Stateless request dispatcher over an immutable registry.
///
/// Cheap to clone; concurrent requests share the registry through the
/// inner `Arc` without coordination.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
    tool_policy: ValidationPolicy,
    prompt_policy: ValidationPolicy,
}

impl Dispatcher {
    /// Tools validate strictly by default; prompts tolerate extra
    /// arguments, which substitution simply ignores.
    pub fn new(registry: impl Into<Arc<CapabilityRegistry>>) -> Self {
        Self {
            registry: registry.into(),
            tool_policy: ValidationPolicy::Strict,
            prompt_policy: ValidationPolicy::Lenient,
        }
    }

    pub fn with_tool_policy(mut self, policy: ValidationPolicy) -> Self {
        self.tool_policy = policy;
        self
    }

    pub fn with_prompt_policy(mut self, policy: ValidationPolicy) -> Self {
        self.prompt_policy = policy;
        self
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Invoke a tool by name with validated arguments.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, DispatchError> {
        let route = self
            .registry
            .tool(name)
            .ok_or_else(|| DispatchError::UnknownCapability {
                kind: CapabilityKind::Tool,
                name: name.to_string(),
            })?;
        let arguments = arguments.unwrap_or_default();
        validate_tool_args(&route.attr, &arguments, self.tool_policy)?;
        (route.call)(arguments).await.map_err(DispatchError::Handler)
    }

    /// Read a resource by concrete uri, resolving templates as needed.
    pub async fn read_resource(&self, uri: &str) -> Result<ReadResourceResult, DispatchError> {
        let resolved = self.registry.resolve_resource(uri).ok_or_else(|| {
            DispatchError::UnknownCapability {
                kind: CapabilityKind::Resource,
                name: uri.to_string(),
            }
        })?;
        let request = ResourceRequest {
            uri: uri.to_string(),
            bindings: resolved.bindings,
        };
        (resolved.route.read)(request)
            .await
            .map_err(DispatchError::Handler)
    }

    /// Materialize a prompt by name with validated arguments.
    pub async fn get_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, DispatchError> {
        let route = self
            .registry
            .prompt(name)
            .ok_or_else(|| DispatchError::UnknownCapability {
                kind: CapabilityKind::Prompt,
                name: name.to_string(),
            })?;
        let arguments = arguments.unwrap_or_default();
        validate_prompt_args(&route.attr, &arguments, self.prompt_policy)?;
        match &route.render {
            PromptRender::Template(template) => {
                let mut result = template.materialize(&arguments);
                result.description = route.attr.description.clone();
                Ok(result)
            }
            PromptRender::Handler(render) => {
                render(arguments).await.map_err(DispatchError::Handler)
            }
        }
    }

    /// Dispatch a decoded request to completion.
    ///
    /// Results of all three kinds are normalized to a flat content
    /// list: tool content directly, resource contents as embedded
    /// resources, prompt messages as their content items.
    pub async fn handle(&self, request: Request) -> Response {
        let kind = request.kind();
        let identity = request.identity().to_string();
        let result: Result<Vec<Content>, DispatchError> = match request {
            Request::Tool { name, arguments } => self
                .call_tool(&name, arguments)
                .await
                .map(|result| result.content),
            Request::Resource { uri } => self.read_resource(&uri).await.map(|result| {
                result
                    .contents
                    .into_iter()
                    .map(Content::resource)
                    .collect()
            }),
            Request::Prompt { name, arguments } => {
                self.get_prompt(&name, arguments).await.map(|result| {
                    result
                        .messages
                        .into_iter()
                        .map(|message| message.content)
                        .collect()
                })
            }
        };
        match result {
            Ok(content) => {
                debug!(%kind, name = %identity, items = content.len(), "request completed");
                Response::success(content)
            }
            Err(error) => {
                warn!(%kind, name = %identity, %error, "request failed");
                Response::error(error.into())
            }
        }
    }

    pub fn list_tools(&self) -> Vec<Tool> {
        self.registry.list_tools()
    }

    pub fn list_resources(&self) -> Vec<Resource> {
        self.registry.list_resources()
    }

    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.registry.list_resource_templates()
    }

    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.registry.list_prompts()
    }
}
