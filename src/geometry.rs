//! GML output for spatial operands.
//!
//! Geometry payloads are not encoded yet: every spatial operand becomes the
//! same empty polygon. Parsing maps that element back to a null literal.

use serde_json::Value;

pub const GML_NAMESPACE: &str = "http://www.opengis.net/gml";

pub const GML_PLACEHOLDER: &str =
    r#"<gml:Polygon xmlns:gml="http://www.opengis.net/gml"></gml:Polygon>"#;

/// GML element for a spatial operand value.
pub fn to_gml(value: &Value) -> &'static str {
    if let Value::Object(object) = value {
        match geojson::Geometry::from_json_object(object.clone()) {
            Ok(geometry) => tracing::debug!(
                "Geometry: dropping {} payload, emitting placeholder polygon",
                geometry.value.type_name()
            ),
            Err(e) => tracing::debug!("Geometry: operand is not GeoJSON ({e})"),
        }
    }
    GML_PLACEHOLDER
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn any_value_yields_placeholder() {
        let square = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        });
        assert_eq!(to_gml(&square), GML_PLACEHOLDER);
        assert_eq!(to_gml(&json!("geom")), GML_PLACEHOLDER);
        assert_eq!(to_gml(&Value::Null), GML_PLACEHOLDER);
    }
}
