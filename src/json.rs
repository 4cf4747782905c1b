//! JSON codec. The tree's serde shape is the wire shape.

use serde_json::Value;

use crate::config::FesOptions;
use crate::error::Result;
use crate::filter::FilterNode;

/// Serialize a filter; `None` is written as `{}`.
pub fn to_json(node: Option<&FilterNode>) -> Result<String> {
    match node {
        Some(node) => Ok(serde_json::to_string(node)?),
        None => Ok("{}".to_string()),
    }
}

/// Parse a filter. `{}` and `null` mean "no filter".
pub fn from_json(text: &str, options: &FesOptions) -> Result<Option<FilterNode>> {
    let value: Value = serde_json::from_str(text)?;
    match &value {
        Value::Null => return Ok(None),
        Value::Object(map) if map.is_empty() => return Ok(None),
        _ => {}
    }

    let node: FilterNode = serde_json::from_value(value)?;
    node.validate(options.max_depth)?;
    Ok(Some(node))
}
