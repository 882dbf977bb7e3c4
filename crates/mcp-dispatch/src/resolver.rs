//! Resource uri resolution.
//!
//! Templated uris are compiled into an explicit segment representation
//! at registration time, so resolution never re-parses pattern text.
//! Resolution tries exact static uris first, then templates; when more
//! than one template matches, the most specific pattern (fewest
//! placeholders) wins, then registration order.

use serde_json::Value;

use crate::{
    model::JsonObject,
    registry::{ResourceEntry, ResourceRoute},
};

/// A compiled `{name}`-style uri pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct UriTemplate {
    scheme: Option<String>,
    segments: Vec<Segment>,
    placeholder_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Why a template failed to compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    #[error("unclosed placeholder brace")]
    UnclosedBrace,
    #[error("empty placeholder name")]
    EmptyPlaceholder,
    #[error("duplicate placeholder `{0}`")]
    DuplicatePlaceholder(String),
    #[error("placeholder must span a whole segment: `{0}`")]
    PartialPlaceholder(String),
}

impl UriTemplate {
    /// Compile a template string such as `weather://city/{name}`.
    ///
    /// A placeholder occupies a whole `/`-separated segment; anything
    /// else containing braces is rejected.
    pub fn parse(template: &str) -> Result<Self, TemplateError> {
        let (scheme, path) = split_scheme(template);
        let mut segments = Vec::new();
        let mut seen = Vec::new();
        for part in path.split('/') {
            if let Some(name) = part.strip_prefix('{') {
                let name = name
                    .strip_suffix('}')
                    .ok_or(TemplateError::UnclosedBrace)?;
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder);
                }
                if name.contains(['{', '}']) {
                    return Err(TemplateError::PartialPlaceholder(part.to_string()));
                }
                if seen.contains(&name) {
                    return Err(TemplateError::DuplicatePlaceholder(name.to_string()));
                }
                seen.push(name);
                segments.push(Segment::Placeholder(name.to_string()));
            } else if part.contains(['{', '}']) {
                return Err(TemplateError::PartialPlaceholder(part.to_string()));
            } else {
                segments.push(Segment::Literal(part.to_string()));
            }
        }
        Ok(Self {
            scheme: scheme.map(str::to_string),
            segments,
            placeholder_count: seen.len(),
        })
    }

    /// Number of placeholder segments; lower is more specific.
    pub fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Match a concrete uri against this template, binding each
    /// placeholder to the corresponding segment value. Pure; returns
    /// `None` on any mismatch.
    pub fn match_uri(&self, uri: &str) -> Option<JsonObject> {
        let (scheme, path) = split_scheme(uri);
        if scheme != self.scheme.as_deref() {
            return None;
        }
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut bindings = JsonObject::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(literal) => {
                    if literal != part {
                        return None;
                    }
                }
                Segment::Placeholder(name) => {
                    bindings.insert(name.clone(), Value::String(part.to_string()));
                }
            }
        }
        Some(bindings)
    }
}

fn split_scheme(uri: &str) -> (Option<&str>, &str) {
    match uri.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, uri),
    }
}

/// A resolved resource route with its bound placeholder values.
#[derive(Debug)]
pub struct ResolvedResource<'a> {
    pub route: &'a ResourceRoute,
    pub bindings: JsonObject,
}

/// Resolve `uri` against registered routes.
///
/// Static uris are matched exactly and always beat templates. Template
/// candidates are ranked by placeholder count, then registration order;
/// the stable sort keeps the order deterministic for equal counts.
pub(crate) fn resolve<'a>(routes: &'a [ResourceRoute], uri: &str) -> Option<ResolvedResource<'a>> {
    for route in routes {
        if let ResourceEntry::Static(resource) = &route.entry {
            if resource.uri == uri {
                return Some(ResolvedResource {
                    route,
                    bindings: JsonObject::new(),
                });
            }
        }
    }

    let mut candidates: Vec<(usize, &ResourceRoute, JsonObject)> = routes
        .iter()
        .filter_map(|route| match &route.entry {
            ResourceEntry::Template { pattern, .. } => pattern
                .match_uri(uri)
                .map(|bindings| (pattern.placeholder_count(), route, bindings)),
            ResourceEntry::Static(_) => None,
        })
        .collect();
    candidates.sort_by_key(|(count, _, _)| *count);
    candidates
        .into_iter()
        .next()
        .map(|(_, route, bindings)| ResolvedResource { route, bindings })
}
