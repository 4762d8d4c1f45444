//! Response body decoding

use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Key of the envelope some endpoints wrap their payload in.
const DATA_KEY: &str = "data";

/// Strips a `{ "data": ... }` envelope.
///
/// Only objects that carry `data` and no `id` count as envelopes, so a
/// record that happens to have a `data` field stays intact.
pub fn unwrap_envelope(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.contains_key(DATA_KEY) && !map.contains_key("id") => {
            map.remove(DATA_KEY).unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}

/// Decodes a response body, unwrapping an envelope first.
///
/// An empty body decodes as JSON `null`.
pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let value = if text.trim().is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_str(text)
            .map_err(|e| ApiError::parse_with_body(format!("invalid JSON: {}", e), text))?
    };

    serde_json::from_value(unwrap_envelope(value))
        .map_err(|e| ApiError::parse_with_body(format!("unexpected shape: {}", e), text))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::Row;

    #[test]
    fn test_envelope_is_unwrapped() {
        let rows: Vec<Row> = decode(r#"{"success": true, "data": [{"id": 1}]}"#).unwrap();
        assert_eq!(rows.len(), 1);

        let rows: Vec<Row> = decode(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_record_with_data_field_is_kept() {
        let value = unwrap_envelope(json!({"id": "x", "data": "2024-01-01"}));
        assert_eq!(value["id"], "x");
    }

    #[test]
    fn test_empty_body_is_null() {
        let value: serde_json::Value = decode("").unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn test_shape_mismatch_keeps_body() {
        let err = decode::<Vec<Row>>(r#"{"id": 1}"#).unwrap_err();
        assert!(matches!(err, ApiError::Parse { body: Some(_), .. }));
    }
}
