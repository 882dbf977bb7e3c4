//! Error taxonomy for the dispatcher core.
//!
//! Per-request failures ([`DispatchError`]) are always converted into a
//! structured [`ErrorData`] payload at the dispatcher boundary and
//! never terminate the process. Registration failures
//! ([`RegistryError`]) are startup defects and are allowed to abort
//! startup instead.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::CapabilityKind;

/// Protocol error codes, aligned with JSON-RPC conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub i32);

impl ErrorCode {
    pub const RESOURCE_NOT_FOUND: Self = Self(-32002);
    pub const METHOD_NOT_FOUND: Self = Self(-32601);
    pub const INVALID_PARAMS: Self = Self(-32602);
    pub const INTERNAL_ERROR: Self = Self(-32603);
}

/// The structured error payload a caller receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    pub code: ErrorCode,
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ErrorData {
    pub fn new(
        code: ErrorCode,
        message: impl Into<Cow<'static, str>>,
        data: Option<Value>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn method_not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::METHOD_NOT_FOUND, message, None)
    }

    pub fn resource_not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCode::RESOURCE_NOT_FOUND, message, None)
    }

    pub fn invalid_params(message: impl Into<Cow<'static, str>>, data: Option<Value>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message, data)
    }

    pub fn internal_error(message: impl Into<Cow<'static, str>>, data: Option<Value>) -> Self {
        Self::new(ErrorCode::INTERNAL_ERROR, message, data)
    }
}

impl std::fmt::Display for ErrorData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.0, self.message)?;
        if let Some(data) = &self.data {
            write!(f, "({})", data)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorData {}

/// Argument validation failure, naming every offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required argument(s): {}", fields.join(", "))]
    MissingRequired { fields: Vec<String> },
    #[error("unknown argument(s): {}", fields.join(", "))]
    UnknownArguments { fields: Vec<String> },
    #[error("argument type mismatch: {}", fields.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    InvalidType { fields: Vec<TypeMismatch> },
}

/// One argument whose value had the wrong type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch {
    pub field: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

impl ValidationError {
    /// The fields this failure refers to
    pub fn fields(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingRequired { fields }
            | ValidationError::UnknownArguments { fields } => {
                fields.iter().map(String::as_str).collect()
            }
            ValidationError::InvalidType { fields } => {
                fields.iter().map(|mismatch| mismatch.field.as_str()).collect()
            }
        }
    }
}

/// A per-request dispatch failure.
///
/// All variants are reported to the caller; none are fatal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown {kind}: {name}")]
    UnknownCapability { kind: CapabilityKind, name: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("handler failed: {}", .0.message)]
    Handler(ErrorData),
}

impl From<DispatchError> for ErrorData {
    fn from(error: DispatchError) -> Self {
        match error {
            DispatchError::UnknownCapability { kind, name } => match kind {
                CapabilityKind::Resource => {
                    ErrorData::resource_not_found(format!("unknown resource: {name}"))
                }
                _ => ErrorData::method_not_found(format!("unknown {kind}: {name}")),
            },
            DispatchError::Validation(error) => {
                let fields = error.fields();
                ErrorData::invalid_params(
                    error.to_string(),
                    Some(serde_json::json!({ "fields": fields })),
                )
            }
            DispatchError::Handler(error) => error,
        }
    }
}

/// A registration-time failure.
///
/// These indicate a static configuration defect; the server must not
/// start with ambiguous capability names or malformed templates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate {kind} registration: {name}")]
    DuplicateCapability { kind: CapabilityKind, name: String },
    #[error("invalid uri template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },
    #[error("prompt `{prompt}` template references undeclared argument `{argument}`")]
    UndeclaredTemplateArgument { prompt: String, argument: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_data_display() {
        let error = ErrorData::invalid_params("missing field", None);
        assert_eq!(format!("{error}"), "-32602: missing field");
    }

    #[test]
    fn test_error_data_display_with_data() {
        let error = ErrorData::invalid_params(
            "missing field",
            Some(serde_json::json!({"fields": ["b"]})),
        );
        assert_eq!(
            format!("{error}"),
            "-32602: missing field({\"fields\":[\"b\"]})"
        );
    }

    #[test]
    fn test_type_mismatch_display_lists_every_field() {
        let error = ValidationError::InvalidType {
            fields: vec![
                TypeMismatch {
                    field: "a".to_string(),
                    expected: "number".to_string(),
                    actual: "string".to_string(),
                },
                TypeMismatch {
                    field: "b".to_string(),
                    expected: "number".to_string(),
                    actual: "null".to_string(),
                },
            ],
        };
        let text = error.to_string();
        assert!(text.contains("`a` expected number, got string"));
        assert!(text.contains("`b` expected number, got null"));
        assert_eq!(error.fields(), vec!["a", "b"]);
    }

    #[test]
    fn test_validation_error_names_fields() {
        let error = ValidationError::MissingRequired {
            fields: vec!["b".to_string()],
        };
        assert!(error.to_string().contains("b"));
        assert_eq!(error.fields(), vec!["b"]);
    }

    #[test]
    fn test_unknown_capability_maps_to_code() {
        let error = DispatchError::UnknownCapability {
            kind: CapabilityKind::Tool,
            name: "does_not_exist".to_string(),
        };
        let data = ErrorData::from(error);
        assert_eq!(data.code, ErrorCode::METHOD_NOT_FOUND);
        assert!(data.message.contains("does_not_exist"));

        let error = DispatchError::UnknownCapability {
            kind: CapabilityKind::Resource,
            name: "greeting://nobody".to_string(),
        };
        let data = ErrorData::from(error);
        assert_eq!(data.code, ErrorCode::RESOURCE_NOT_FOUND);
    }

    #[test]
    fn test_validation_error_maps_to_invalid_params() {
        let error = DispatchError::Validation(ValidationError::MissingRequired {
            fields: vec!["city".to_string()],
        });
        let data = ErrorData::from(error);
        assert_eq!(data.code, ErrorCode::INVALID_PARAMS);
        assert_eq!(data.data.unwrap()["fields"][0], "city");
    }

    #[test]
    fn test_handler_error_passes_through() {
        let inner = ErrorData::internal_error("boom", None);
        let data = ErrorData::from(DispatchError::Handler(inner.clone()));
        assert_eq!(data, inner);
    }

    #[test]
    fn test_registry_error_display() {
        let error = RegistryError::DuplicateCapability {
            kind: CapabilityKind::Tool,
            name: "add".to_string(),
        };
        assert_eq!(error.to_string(), "duplicate tool registration: add");
    }
}
