use super::WebError;
use crate::core::{GatewayError, RecordId, ResourceKind};
use axum::extract::FromRequest;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// JSON body whose rejections (bad syntax, wrong content type, missing
/// fields, type mismatches) come back as validation errors.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct Payload<T>(pub T);

/// Resolves an `{id}` path segment. Only plain decimal digits name a record;
/// anything else (signs, spaces, letters) is reported as not found.
pub fn parse_id(kind: ResourceKind, raw: &str) -> Result<RecordId, WebError> {
    let no_match = || WebError::NoMatch(format!("{kind} {raw} not found"));
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(no_match());
    }
    raw.parse::<RecordId>().map_err(|_| no_match())
}

/// Reads an already parsed JSON body as `T`; shape mismatches are validation errors.
pub fn decode<T: DeserializeOwned>(body: JsonValue) -> Result<T, GatewayError> {
    serde_json::from_value(body).map_err(|err| GatewayError::validation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse() {
        assert!(matches!(parse_id(ResourceKind::Course, "12"), Ok(12)));
        assert!(matches!(parse_id(ResourceKind::Course, "007"), Ok(7)));
    }

    #[test]
    fn decode_reports_missing_fields() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }

        let err = decode::<Named>(serde_json::json!({ "other": 1 })).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn junk_ids_are_not_found() {
        for raw in ["abc", "-1", "+5", " 5", "1.5", "", "99999999999999999999999"] {
            let err = parse_id(ResourceKind::Course, raw).unwrap_err();
            assert!(matches!(err, WebError::NoMatch(_)), "{raw}");
            assert_eq!(err.code(), "not_found");
        }
    }
}
