use crate::config::FluidConfig;

/// Generates a JSON Schema for the FluidBG configuration file.
///
/// Property names, types, descriptions and defaults come from [`FluidConfig`].
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(FluidConfig);

    // Unknown keys are preserved by the store, so the schema must allow them.
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("additionalProperties".to_string(), serde_json::Value::Bool(true));
    }

    schema
}

/// Generates the schema as a pretty-printed JSON string.
#[must_use]
pub fn generate_schema_json() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
