//! Content items sent back to callers.
//!
//! Every successful dispatch converges on an ordered sequence of these.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::resource::ResourceContents;

/// A single item of response content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Plain text
    Text { text: String },
    /// Base64-encoded image data
    #[serde(rename_all = "camelCase")]
    Image { data: String, mime_type: String },
    /// Embedded server-side resource
    Resource { resource: ResourceContents },
}

impl Content {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Content::Text { text: text.into() }
    }

    pub fn image<S: Into<String>, T: Into<String>>(data: S, mime_type: T) -> Self {
        Content::Image {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn resource(resource: ResourceContents) -> Self {
        Content::Resource { resource }
    }

    /// Serialize a value to json and wrap it as text content
    pub fn json<S: Serialize>(value: S) -> Result<Self, crate::ErrorData> {
        let text = serde_json::to_string(&value).map_err(|e| {
            crate::ErrorData::internal_error(
                "fail to serialize response to json",
                Some(json!({"reason": e.to_string()})),
            )
        })?;
        Ok(Content::text(text))
    }

    /// Get the text if this is a Text variant
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text { text } => Some(text),
            _ => None,
        }
    }
}
