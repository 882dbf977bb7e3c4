//! The capability registry.
//!
//! Every tool, resource, and prompt the server can serve is declared
//! here, once, at startup. A route binds a descriptor to its handler at
//! registration time, so dispatch never does name-based discovery
//! against anything but this closed set. The registry is built through
//! [`RegistryBuilder`], after which it is immutable; share it behind an
//! `Arc` and it is safe to read from any number of concurrent callers.

use std::{collections::HashMap, future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};

use crate::{
    error::{ErrorData, RegistryError},
    model::{
        CallToolResult, CapabilityKind, GetPromptResult, JsonObject, Prompt, ReadResourceResult,
        Resource, ResourceTemplate, Tool,
    },
    prompt::PromptTemplate,
    resolver::{ResolvedResource, UriTemplate, resolve},
};

/// Boxed tool handler: validated arguments in, content out.
pub type DynToolHandler =
    dyn Fn(JsonObject) -> BoxFuture<'static, Result<CallToolResult, ErrorData>> + Send + Sync;

/// Boxed resource producer: resolved uri plus bound placeholders in,
/// contents out.
pub type DynResourceHandler = dyn Fn(ResourceRequest) -> BoxFuture<'static, Result<ReadResourceResult, ErrorData>>
    + Send
    + Sync;

/// Boxed prompt renderer, for prompts that need more than textual
/// substitution.
pub type DynPromptHandler =
    dyn Fn(JsonObject) -> BoxFuture<'static, Result<GetPromptResult, ErrorData>> + Send + Sync;

/// What a resource producer receives: the concrete uri that was
/// requested and the placeholder values the resolver bound from it.
#[derive(Debug, Clone)]
pub struct ResourceRequest {
    pub uri: String,
    pub bindings: JsonObject,
}

/// A registered tool: descriptor plus handler.
pub struct ToolRoute {
    pub attr: Tool,
    pub call: Arc<DynToolHandler>,
}

impl std::fmt::Debug for ToolRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRoute").field("attr", &self.attr).finish()
    }
}

impl Clone for ToolRoute {
    fn clone(&self) -> Self {
        Self {
            attr: self.attr.clone(),
            call: self.call.clone(),
        }
    }
}

impl ToolRoute {
    pub fn new<C, Fut>(attr: Tool, call: C) -> Self
    where
        C: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ErrorData>> + Send + 'static,
    {
        Self {
            attr,
            call: Arc::new(move |arguments| call(arguments).boxed()),
        }
    }

    pub fn name(&self) -> &str {
        &self.attr.name
    }
}

/// A registered resource: static or templated, plus its producer.
pub struct ResourceRoute {
    pub entry: ResourceEntry,
    pub read: Arc<DynResourceHandler>,
}

impl std::fmt::Debug for ResourceRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRoute")
            .field("entry", &self.entry)
            .finish()
    }
}

impl Clone for ResourceRoute {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            read: self.read.clone(),
        }
    }
}

/// The two resource variants. Templates carry their pattern compiled
/// once at registration.
#[derive(Debug, Clone)]
pub enum ResourceEntry {
    Static(Resource),
    Template {
        attr: ResourceTemplate,
        pattern: UriTemplate,
    },
}

impl ResourceRoute {
    pub fn new_static<C, Fut>(attr: Resource, read: C) -> Self
    where
        C: Fn(ResourceRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, ErrorData>> + Send + 'static,
    {
        Self {
            entry: ResourceEntry::Static(attr),
            read: Arc::new(move |request| read(request).boxed()),
        }
    }

    pub fn new_template<C, Fut>(attr: ResourceTemplate, read: C) -> Result<Self, RegistryError>
    where
        C: Fn(ResourceRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, ErrorData>> + Send + 'static,
    {
        let pattern =
            UriTemplate::parse(&attr.uri_template).map_err(|e| RegistryError::InvalidTemplate {
                template: attr.uri_template.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            entry: ResourceEntry::Template { attr, pattern },
            read: Arc::new(move |request| read(request).boxed()),
        })
    }

    /// The registered identity: uri for static resources, the template
    /// text for templated ones.
    pub fn identity(&self) -> &str {
        match &self.entry {
            ResourceEntry::Static(attr) => &attr.uri,
            ResourceEntry::Template { attr, .. } => &attr.uri_template,
        }
    }
}

/// A registered prompt: descriptor plus how to materialize it.
#[derive(Clone)]
pub struct PromptRoute {
    pub attr: Prompt,
    pub render: PromptRender,
}

impl std::fmt::Debug for PromptRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptRoute")
            .field("attr", &self.attr)
            .finish()
    }
}

#[derive(Clone)]
pub enum PromptRender {
    /// Textual substitution handled by the core
    Template(PromptTemplate),
    /// Custom renderer for multi-message or computed prompts
    Handler(Arc<DynPromptHandler>),
}

impl PromptRoute {
    /// Register a prompt backed by a template string.
    ///
    /// Every `{name}` the template references must be a declared
    /// argument of the descriptor; an undeclared reference is a startup
    /// defect, not a per-request error.
    pub fn from_template(attr: Prompt, text: &str) -> Result<Self, RegistryError> {
        let template =
            PromptTemplate::parse(text).map_err(|e| RegistryError::InvalidTemplate {
                template: text.to_string(),
                reason: e.to_string(),
            })?;
        for name in template.argument_names() {
            if !attr.declares_argument(name) {
                return Err(RegistryError::UndeclaredTemplateArgument {
                    prompt: attr.name.clone(),
                    argument: name.to_string(),
                });
            }
        }
        Ok(Self {
            attr,
            render: PromptRender::Template(template),
        })
    }

    pub fn from_handler<C, Fut>(attr: Prompt, render: C) -> Self
    where
        C: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GetPromptResult, ErrorData>> + Send + 'static,
    {
        Self {
            attr,
            render: PromptRender::Handler(Arc::new(move |arguments| render(arguments).boxed())),
        }
    }

    pub fn name(&self) -> &str {
        &self.attr.name
    }
}

/// The immutable capability set, one per process.
///
/// Routes are stored in registration order; the name indexes exist only
/// to make lookups cheap.
#[derive(Debug, Default, Clone)]
pub struct CapabilityRegistry {
    tools: Vec<ToolRoute>,
    tool_index: HashMap<String, usize>,
    resources: Vec<ResourceRoute>,
    resource_index: HashMap<String, usize>,
    prompts: Vec<PromptRoute>,
    prompt_index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Look up a tool route by name.
    pub fn tool(&self, name: &str) -> Option<&ToolRoute> {
        self.tool_index.get(name).map(|&i| &self.tools[i])
    }

    /// Look up a prompt route by name.
    pub fn prompt(&self, name: &str) -> Option<&PromptRoute> {
        self.prompt_index.get(name).map(|&i| &self.prompts[i])
    }

    /// Resolve a concrete uri to a resource route, binding template
    /// placeholders. Pure with respect to registry state.
    pub fn resolve_resource(&self, uri: &str) -> Option<ResolvedResource<'_>> {
        resolve(&self.resources, uri)
    }

    /// All tool descriptors, in registration order.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|route| route.attr.clone()).collect()
    }

    /// All static resource descriptors, in registration order.
    pub fn list_resources(&self) -> Vec<Resource> {
        self.resources
            .iter()
            .filter_map(|route| match &route.entry {
                ResourceEntry::Static(attr) => Some(attr.clone()),
                ResourceEntry::Template { .. } => None,
            })
            .collect()
    }

    /// All resource template descriptors, in registration order.
    pub fn list_resource_templates(&self) -> Vec<ResourceTemplate> {
        self.resources
            .iter()
            .filter_map(|route| match &route.entry {
                ResourceEntry::Template { attr, .. } => Some(attr.clone()),
                ResourceEntry::Static(_) => None,
            })
            .collect()
    }

    /// All prompt descriptors, in registration order.
    pub fn list_prompts(&self) -> Vec<Prompt> {
        self.prompts.iter().map(|route| route.attr.clone()).collect()
    }
}

/// Builds a [`CapabilityRegistry`], rejecting duplicate identities.
///
/// Registration errors are meant to abort startup; propagate them with
/// `?` from your setup path.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: CapabilityRegistry,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool<C, Fut>(self, attr: Tool, call: C) -> Result<Self, RegistryError>
    where
        C: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CallToolResult, ErrorData>> + Send + 'static,
    {
        self.add_tool_route(ToolRoute::new(attr, call))
    }

    pub fn add_tool_route(mut self, route: ToolRoute) -> Result<Self, RegistryError> {
        let name = route.name().to_string();
        if self.registry.tool_index.contains_key(&name) {
            return Err(RegistryError::DuplicateCapability {
                kind: CapabilityKind::Tool,
                name,
            });
        }
        self.registry
            .tool_index
            .insert(name, self.registry.tools.len());
        self.registry.tools.push(route);
        Ok(self)
    }

    pub fn resource<C, Fut>(self, attr: Resource, read: C) -> Result<Self, RegistryError>
    where
        C: Fn(ResourceRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, ErrorData>> + Send + 'static,
    {
        self.add_resource_route(ResourceRoute::new_static(attr, read))
    }

    pub fn resource_template<C, Fut>(
        self,
        attr: ResourceTemplate,
        read: C,
    ) -> Result<Self, RegistryError>
    where
        C: Fn(ResourceRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ReadResourceResult, ErrorData>> + Send + 'static,
    {
        self.add_resource_route(ResourceRoute::new_template(attr, read)?)
    }

    pub fn add_resource_route(mut self, route: ResourceRoute) -> Result<Self, RegistryError> {
        let identity = route.identity().to_string();
        if self.registry.resource_index.contains_key(&identity) {
            return Err(RegistryError::DuplicateCapability {
                kind: CapabilityKind::Resource,
                name: identity,
            });
        }
        self.registry
            .resource_index
            .insert(identity, self.registry.resources.len());
        self.registry.resources.push(route);
        Ok(self)
    }

    /// Register a prompt rendered by textual substitution.
    pub fn prompt_template(self, attr: Prompt, text: &str) -> Result<Self, RegistryError> {
        self.add_prompt_route(PromptRoute::from_template(attr, text)?)
    }

    /// Register a prompt rendered by a custom handler.
    pub fn prompt<C, Fut>(self, attr: Prompt, render: C) -> Result<Self, RegistryError>
    where
        C: Fn(JsonObject) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<GetPromptResult, ErrorData>> + Send + 'static,
    {
        self.add_prompt_route(PromptRoute::from_handler(attr, render))
    }

    pub fn add_prompt_route(mut self, route: PromptRoute) -> Result<Self, RegistryError> {
        let name = route.name().to_string();
        if self.registry.prompt_index.contains_key(&name) {
            return Err(RegistryError::DuplicateCapability {
                kind: CapabilityKind::Prompt,
                name,
            });
        }
        self.registry
            .prompt_index
            .insert(name, self.registry.prompts.len());
        self.registry.prompts.push(route);
        Ok(self)
    }

    pub fn build(self) -> CapabilityRegistry {
        self.registry
    }
}
