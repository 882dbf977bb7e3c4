//! Argument validation against capability schemas.
//!
//! Runs before any handler is invoked; a failing request never reaches
//! the handler. Tool schemas are the JSON-schema subset emitted by
//! [`crate::schema::schema_for_type`]: an object with `properties`
//! (each carrying a primitive `type`) and a `required` list.

use serde_json::Value;

use crate::{
    error::{TypeMismatch, ValidationError},
    model::{JsonObject, Prompt, Tool},
};

/// How unrecognized argument keys are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Reject keys the schema does not declare
    #[default]
    Strict,
    /// Pass unrecognized keys through to the handler
    Lenient,
}

/// Validate tool arguments against the tool's declared input schema.
///
/// Checks required-field presence, primitive type conformance, and (in
/// strict mode) rejects unrecognized keys. Reports every missing or
/// unknown field, not just the first.
pub fn validate_tool_args(
    tool: &Tool,
    arguments: &JsonObject,
    policy: ValidationPolicy,
) -> Result<(), ValidationError> {
    let schema = tool.input_schema.as_ref();
    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let missing: Vec<String> = schema
        .get("required")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .filter(|name| !arguments.contains_key(*name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired { fields: missing });
    }

    if policy == ValidationPolicy::Strict {
        let unknown: Vec<String> = arguments
            .keys()
            .filter(|key| !properties.contains_key(*key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownArguments { fields: unknown });
        }
    }

    let mismatches: Vec<TypeMismatch> = arguments
        .iter()
        .filter_map(|(name, value)| {
            let expected = properties.get(name)?.get("type")?.as_str()?;
            (!type_matches(expected, value)).then(|| TypeMismatch {
                field: name.clone(),
                expected: expected.to_string(),
                actual: json_type_name(value).to_string(),
            })
        })
        .collect();
    if !mismatches.is_empty() {
        return Err(ValidationError::InvalidType { fields: mismatches });
    }
    Ok(())
}

/// Validate prompt arguments: every declared-required argument must be
/// present. Unknown keys follow the policy, like tools.
pub fn validate_prompt_args(
    prompt: &Prompt,
    arguments: &JsonObject,
    policy: ValidationPolicy,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = prompt
        .required_arguments()
        .filter(|name| !arguments.contains_key(*name))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingRequired { fields: missing });
    }

    if policy == ValidationPolicy::Strict {
        let unknown: Vec<String> = arguments
            .keys()
            .filter(|key| !prompt.declares_argument(key))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(ValidationError::UnknownArguments { fields: unknown });
        }
    }
    Ok(())
}

fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        // unknown declared types are passed through
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
