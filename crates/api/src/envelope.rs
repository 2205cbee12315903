//! The response-parsing boundary.
//!
//! The remote service is inconsistent about envelopes: some endpoints return
//! a bare JSON array, some wrap it as `{"data": [...]}`, and some use a
//! resource-named field such as `{"questions": [...]}`. Everything funnels
//! through [`decode_list`] / [`decode_item`], which accept exactly those
//! shapes and reject anything else with a typed error instead of probing
//! further.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::EnvelopeError;

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_elements<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, EnvelopeError> {
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|err| EnvelopeError::Payload(err.to_string()))
        })
        .collect()
}

/// Normalizes a list response.
///
/// Accepted shapes, in order: a bare array; an object carrying `field` as an
/// array; an object carrying `"data"` as an array; an object with a single
/// key whose value is an array.
///
/// # Errors
///
/// Returns `EnvelopeError` for any other shape or for elements that fail to
/// deserialize.
pub fn decode_list<T: DeserializeOwned>(
    value: Value,
    field: &str,
) -> Result<Vec<T>, EnvelopeError> {
    match value {
        Value::Array(items) => decode_elements(items),
        Value::Object(mut map) => {
            for key in [field, "data"] {
                if let Some(inner) = map.remove(key) {
                    return match inner {
                        Value::Array(items) => decode_elements(items),
                        _ => Err(EnvelopeError::FieldNotArray {
                            field: key.to_string(),
                        }),
                    };
                }
            }
            if map.len() == 1 {
                if let Some((_, Value::Array(items))) = map.into_iter().next() {
                    return decode_elements(items);
                }
                return Err(EnvelopeError::UnexpectedShape { found: "an object" });
            }
            Err(EnvelopeError::UnexpectedShape { found: "an object" })
        }
        other => Err(EnvelopeError::UnexpectedShape {
            found: value_kind(&other),
        }),
    }
}

/// Normalizes a single-item response: unwraps a `"data"` object when present,
/// otherwise decodes the value itself.
///
/// # Errors
///
/// Returns `EnvelopeError::Payload` when the payload does not deserialize.
pub fn decode_item<T: DeserializeOwned>(value: Value) -> Result<T, EnvelopeError> {
    let value = match value {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner @ Value::Object(_)) => inner,
            Some(other) => {
                map.insert("data".to_string(), other);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(value).map_err(|err| EnvelopeError::Payload(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_decodes() {
        let list: Vec<u32> = decode_list(json!([1, 2, 3]), "items").unwrap();
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[test]
    fn data_envelope_decodes() {
        let list: Vec<u32> = decode_list(json!({"data": [4, 5]}), "items").unwrap();
        assert_eq!(list, vec![4, 5]);
    }

    #[test]
    fn named_field_envelope_decodes() {
        let list: Vec<u32> = decode_list(json!({"questions": [9]}), "questions").unwrap();
        assert_eq!(list, vec![9]);
    }

    #[test]
    fn single_key_wrapper_decodes() {
        let list: Vec<u32> = decode_list(json!({"anything": [7, 8]}), "items").unwrap();
        assert_eq!(list, vec![7, 8]);
    }

    #[test]
    fn named_field_wins_over_single_key_probe() {
        let value = json!({"questions": [1], "total": 1});
        let list: Vec<u32> = decode_list(value, "questions").unwrap();
        assert_eq!(list, vec![1]);
    }

    #[test]
    fn scalar_is_rejected() {
        let err = decode_list::<u32>(json!(42), "items").unwrap_err();
        assert!(matches!(
            err,
            EnvelopeError::UnexpectedShape { found: "a number" }
        ));
    }

    #[test]
    fn non_array_field_is_rejected() {
        let err = decode_list::<u32>(json!({"data": 1}), "items").unwrap_err();
        assert!(matches!(err, EnvelopeError::FieldNotArray { .. }));
    }

    #[test]
    fn ambiguous_object_is_rejected() {
        let err = decode_list::<u32>(json!({"a": [1], "b": [2]}), "items").unwrap_err();
        assert!(matches!(err, EnvelopeError::UnexpectedShape { .. }));
    }

    #[test]
    fn item_unwraps_data_envelope() {
        #[derive(serde::Deserialize)]
        struct Payload {
            id: u32,
        }
        let item: Payload = decode_item(json!({"data": {"id": 5}})).unwrap();
        assert_eq!(item.id, 5);
        let item: Payload = decode_item(json!({"id": 6})).unwrap();
        assert_eq!(item.id, 6);
    }
}
