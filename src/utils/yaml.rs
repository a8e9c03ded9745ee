//! JSON to YAML normalization.

use crate::error::NormalizeError;

/// Parse a JSON-encoded specification and re-serialize it as YAML text.
///
/// Key order survives the round trip (serde_json is built with
/// `preserve_order`), so the YAML reads in the order the spec declared.
pub fn json_to_yaml(content: &str) -> Result<String, NormalizeError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(serde_yaml::to_string(&value)?)
}
