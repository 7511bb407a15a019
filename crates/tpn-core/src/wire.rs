//! Response contract decoding.
//!
//! Validators answer either with the bare payload or with an envelope
//! `{ "success": bool, "data": T?, "error": string? }`. The shape is
//! inspected first: a JSON object carrying a boolean `success` is an
//! envelope, anything else is decoded as the payload itself.

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Which contract a response body follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    Bare,
    Enveloped,
}

pub fn shape_of(value: &Value) -> ResponseShape {
    let enveloped = value
        .as_object()
        .and_then(|o| o.get("success"))
        .is_some_and(Value::is_boolean);
    if enveloped {
        ResponseShape::Enveloped
    } else {
        ResponseShape::Bare
    }
}

/// Decodes `value` into `T`, unwrapping an envelope when present.
///
/// An envelope with `success: false` or without `data` yields
/// [`ApiError::RequestFailed`] carrying the envelope's `error` text; the
/// payload is only decoded once the envelope reports success.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    match shape_of(&value) {
        ResponseShape::Bare => from_value(value),
        ResponseShape::Enveloped => {
            let envelope: Envelope<Value> = from_value(value)?;
            match envelope.data {
                Some(data) if envelope.success => from_value(data),
                _ => Err(ApiError::RequestFailed(envelope.error)),
            }
        }
    }
}

/// Parses a raw response body as JSON.
pub fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_decodes_directly() {
        let codes: Vec<String> = decode(json!(["DE", "FR"])).unwrap();
        assert_eq!(codes, vec!["DE", "FR"]);
    }

    #[test]
    fn object_without_success_is_bare() {
        let v = json!({ "peer_config": "x", "expires_at": 1 });
        assert_eq!(shape_of(&v), ResponseShape::Bare);
        // A non-boolean `success` is payload, not an envelope.
        assert_eq!(shape_of(&json!({ "success": "yes" })), ResponseShape::Bare);
    }

    #[test]
    fn successful_envelope_unwraps_data() {
        let v = json!({ "success": true, "data": ["NL"] });
        assert_eq!(shape_of(&v), ResponseShape::Enveloped);
        let codes: Vec<String> = decode(v).unwrap();
        assert_eq!(codes, vec!["NL"]);
    }

    #[test]
    fn failed_envelope_carries_error_text() {
        let v = json!({ "success": false, "error": "validator busy" });
        let err = decode::<Vec<String>>(v).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed(Some(ref m)) if m == "validator busy"));
    }

    #[test]
    fn failed_envelope_ignores_payload_type() {
        let v = json!({ "success": false, "data": {}, "error": "validator busy" });
        let err = decode::<Vec<String>>(v).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed(Some(ref m)) if m == "validator busy"));
        assert_eq!(err.to_string(), "validator busy");
    }

    #[test]
    fn successful_envelope_with_wrong_payload_is_malformed() {
        let err = decode::<Vec<String>>(json!({ "success": true, "data": {} })).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn envelope_without_data_is_request_failed() {
        let err = decode::<Vec<String>>(json!({ "success": true })).unwrap_err();
        assert_eq!(err.to_string(), "Request failed");
        let err = decode::<Vec<String>>(json!({ "success": true, "data": null })).unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed(None)));
    }

    #[test]
    fn wrong_payload_type_is_malformed() {
        let err = decode::<Vec<String>>(json!({ "countries": [] })).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
        let err = decode::<Vec<String>>(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn parse_body_rejects_non_json() {
        assert!(matches!(
            parse_body(b"<html>bad gateway</html>"),
            Err(ApiError::Malformed(_))
        ));
        assert_eq!(parse_body(b"[]").unwrap(), json!([]));
    }
}
