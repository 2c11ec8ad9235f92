//! JSON Schema validation for tool inputs

use anyhow::{bail, Result};

/// Validate a JSON input against a schema
pub fn validate_input(input: &[u8], schema_bytes: &[u8]) -> Result<()> {
    if schema_bytes.is_empty() {
        return Ok(()); // No schema = no validation
    }

    let input_value: serde_json::Value = if input.is_empty() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(input).map_err(|e| anyhow::anyhow!("Invalid JSON input: {e}"))?
    };
    let schema_value: serde_json::Value = serde_json::from_slice(schema_bytes)
        .map_err(|e| anyhow::anyhow!("Invalid JSON schema: {e}"))?;

    let validator = jsonschema::validator_for(&schema_value)
        .map_err(|e| anyhow::anyhow!("Invalid JSON schema: {e}"))?;

    if let Err(error) = validator.validate(&input_value) {
        bail!("Input validation failed: {}", error);
    }

    Ok(())
}
