use serde::{Deserialize, Serialize};

/// The static declaration of a resource with a fixed uri.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// URI identifying the resource (e.g. "weather://cities")
    pub uri: String,
    /// Name of the resource
    pub name: String,
    /// Optional description of the resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// MIME type of the resource content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl Resource {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// The declaration of a templated resource, whose uri contains
/// `{name}`-style placeholder segments bound at resolution time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceTemplate {
    pub uri_template: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl ResourceTemplate {
    pub fn new(uri_template: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri_template: uri_template.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Content produced by a resource read.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResourceContents {
    #[serde(rename_all = "camelCase")]
    TextResourceContents {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    BlobResourceContents {
        uri: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        blob: String,
    },
}

impl ResourceContents {
    pub fn text(text: impl Into<String>, uri: impl Into<String>) -> Self {
        Self::TextResourceContents {
            uri: uri.into(),
            mime_type: Some("text/plain".into()),
            text: text.into(),
        }
    }

    /// Get the text if this is a text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResourceContents::TextResourceContents { text, .. } => Some(text),
            ResourceContents::BlobResourceContents { .. } => None,
        }
    }

    /// The uri the contents were produced for
    pub fn uri(&self) -> &str {
        match self {
            ResourceContents::TextResourceContents { uri, .. }
            | ResourceContents::BlobResourceContents { uri, .. } => uri,
        }
    }
}

/// The result of reading a resource.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

impl ReadResourceResult {
    /// A single text item, the common case
    pub fn text(text: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            contents: vec![ResourceContents::text(text, uri)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_serialization_uses_camel_case() {
        let resource = Resource::new("weather://cities", "Available Cities")
            .with_mime_type("application/json");
        let json = serde_json::to_string(&resource).unwrap();
        assert!(json.contains("mimeType"));
        assert!(!json.contains("mime_type"));
    }

    #[test]
    fn test_resource_template_serialization() {
        let template = ResourceTemplate::new("weather://city/{name}", "City Weather");
        let json = serde_json::to_string(&template).unwrap();
        assert!(json.contains("uriTemplate"));
    }

    #[test]
    fn test_resource_contents_text() {
        let contents = ResourceContents::text("Hello, world!", "greeting://hello");
        match &contents {
            ResourceContents::TextResourceContents { text, .. } => {
                assert_eq!(text, "Hello, world!");
            }
            _ => panic!("Expected TextResourceContents"),
        }
        assert_eq!(contents.uri(), "greeting://hello");
    }

    #[test]
    fn test_read_resource_result_text() {
        let result = ReadResourceResult::text("content", "file:///test.txt");
        assert_eq!(result.contents.len(), 1);
    }

    #[test]
    fn test_resource_contents_deserialization_blob() {
        let json = r#"{
            "uri": "file:///binary.dat",
            "blob": "YmxvYg==",
            "mimeType": "application/octet-stream"
        }"#;
        let contents: ResourceContents = serde_json::from_str(json).unwrap();
        assert!(matches!(
            contents,
            ResourceContents::BlobResourceContents { .. }
        ));
    }
}
