//! JSON schema generation for tool argument types.
//!
//! Deriving [`schemars::JsonSchema`] on an argument struct and passing
//! it through [`schema_for_type`] gives a tool declaration the same
//! schema the validator later enforces.

use schemars::{JsonSchema, generate::SchemaSettings};

use crate::model::JsonObject;

/// Generate a draft 2020-12 schema object for `T`.
pub fn schema_for_type<T: JsonSchema>() -> JsonObject {
    let generator = SchemaSettings::draft2020_12().into_generator();
    let schema = generator.into_root_schema_for::<T>();
    let object = serde_json::to_value(schema).expect("failed to serialize schema");
    match object {
        serde_json::Value::Object(object) => object,
        _ => JsonObject::default(),
    }
}
