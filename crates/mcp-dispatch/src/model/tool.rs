use std::{borrow::Cow, sync::Arc};

use serde::{Deserialize, Serialize};

use super::{Content, JsonObject};

/// The static declaration of a callable tool.
///
/// Created once at startup and never mutated; the registry owns it for
/// the life of the process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    /// The name of the tool, unique among tools
    pub name: Cow<'static, str>,
    /// A description of what the tool does
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Cow<'static, str>>,
    /// A JSON Schema object defining the expected arguments
    pub input_schema: Arc<JsonObject>,
}

impl Tool {
    /// Create a new tool with the given name and description
    pub fn new<N, D, S>(name: N, description: D, input_schema: S) -> Self
    where
        N: Into<Cow<'static, str>>,
        D: Into<Cow<'static, str>>,
        S: Into<Arc<JsonObject>>,
    {
        Tool {
            name: name.into(),
            description: Some(description.into()),
            input_schema: input_schema.into(),
        }
    }
}

/// The result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<Content>,
    /// Set when the tool ran but reports a domain-level failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResult {
    pub fn success(content: Vec<Content>) -> Self {
        CallToolResult {
            content,
            is_error: Some(false),
        }
    }

    pub fn error(content: Vec<Content>) -> Self {
        CallToolResult {
            content,
            is_error: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> Arc<JsonObject> {
        Arc::new(
            json!({
                "type": "object",
                "properties": {
                    "a": {"type": "number"},
                    "b": {"type": "number"}
                },
                "required": ["a", "b"]
            })
            .as_object()
            .unwrap()
            .clone(),
        )
    }

    #[test]
    fn test_tool_new() {
        let tool = Tool::new("add", "Add two numbers", schema());
        assert_eq!(tool.name, "add");
        assert_eq!(tool.description, Some(Cow::Borrowed("Add two numbers")));
    }

    #[test]
    fn test_tool_serialization_uses_camel_case() {
        let tool = Tool::new("add", "Add two numbers", schema());
        let json = serde_json::to_string(&tool).unwrap();
        assert!(json.contains("inputSchema"));
        assert!(!json.contains("input_schema"));
    }

    #[test]
    fn test_tool_deserialization() {
        let json = r#"{
            "name": "add",
            "description": "Add two numbers",
            "inputSchema": {"type": "object"}
        }"#;
        let tool: Tool = serde_json::from_str(json).unwrap();
        assert_eq!(tool.name, "add");
    }

    #[test]
    fn test_call_tool_result() {
        let result = CallToolResult::success(vec![Content::text("5")]);
        assert_eq!(result.is_error, Some(false));

        let result = CallToolResult::error(vec![Content::text("no data for pluto")]);
        assert_eq!(result.is_error, Some(true));
    }
}
