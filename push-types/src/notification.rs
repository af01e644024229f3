//! The notification record and its payload encoding.
//!
//! A serialized push payload is a UTF-8 JSON object in one of two shapes:
//!
//! ```json
//! { "title": "Hello", "body": "World", "hrl": "..." }
//! { "aps": { "alert": { "title": "Hello", "body": "World" }, "mutable-content": 1 } }
//! ```
//!
//! The flat shape is what the notification-service extension builds from the
//! incoming request; the `aps` shape is what the push provider sends. When
//! `aps.alert` is present it wins over flat `title`/`body`. Every other key
//! is carried through in [`Notification::extra`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::PayloadError;

/// A decoded push notification.
///
/// Serializes to the flat payload shape. Keys in `extra` that collide with
/// `title` or `body` are skipped so the fields win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    /// Notification title (empty when the payload had none).
    pub title: String,
    /// Notification body (empty when the payload had none).
    pub body: String,
    /// Every other top-level payload key, untouched.
    pub extra: Map<String, Value>,
}

impl Notification {
    /// Create a notification with the given title and body and no extra data.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }

    /// Decode a serialized push payload.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if the bytes are empty, not UTF-8 JSON, not a
    /// JSON object, or carry a title/body/alert of the wrong type.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }

        let Value::Object(mut map) = serde_json::from_slice::<Value>(bytes)? else {
            return Err(PayloadError::NotAnObject);
        };

        let alert = match map.get_mut("aps") {
            None | Some(Value::Null) => None,
            Some(Value::Object(aps)) => aps.remove("alert").filter(|a| !a.is_null()),
            Some(_) => {
                return Err(PayloadError::InvalidField {
                    field: "aps",
                    expected: "an object",
                })
            }
        };

        let (title, body) = match alert {
            Some(Value::String(body)) => {
                strip_flat_fields(&mut map);
                (String::new(), body)
            }
            Some(Value::Object(mut alert)) => {
                strip_flat_fields(&mut map);
                (
                    take_string(&mut alert, "title", "aps.alert.title")?,
                    take_string(&mut alert, "body", "aps.alert.body")?,
                )
            }
            Some(_) => {
                return Err(PayloadError::InvalidField {
                    field: "aps.alert",
                    expected: "a string or an object",
                })
            }
            None => (
                take_string(&mut map, "title", "title")?,
                take_string(&mut map, "body", "body")?,
            ),
        };

        Ok(Self {
            title,
            body,
            extra: map,
        })
    }

    /// Encode as a flat payload that [`Notification::from_payload`] accepts.
    pub fn to_json(&self) -> Vec<u8> {
        // A map of strings and JSON values always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("title", &self.title)?;
        map.serialize_entry("body", &self.body)?;
        for (key, value) in &self.extra {
            if !is_flat_field(key) {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

fn is_flat_field(key: &str) -> bool {
    key == "title" || key == "body"
}

/// Remove a string field, treating absent and `null` as empty.
fn take_string(
    map: &mut Map<String, Value>,
    key: &str,
    field: &'static str,
) -> Result<String, PayloadError> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(PayloadError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

/// Flat fields are shadowed by `aps.alert` and must not leak into `extra`.
fn strip_flat_fields(map: &mut Map<String, Value>) {
    map.remove("title");
    map.remove("body");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_flat_payload() {
        let n = Notification::from_payload(br#"{ "title": "Hello", "body": "World" }"#).unwrap();
        assert_eq!(n.title, "Hello");
        assert_eq!(n.body, "World");
        assert!(n.extra.is_empty());
    }

    #[test]
    fn flat_payload_keeps_extra_keys() {
        let n = Notification::from_payload(
            br#"{ "title": "t", "body": "b", "hrl": "uhC0k", "badge": 3 }"#,
        )
        .unwrap();
        assert_eq!(n.extra.get("hrl"), Some(&json!("uhC0k")));
        assert_eq!(n.extra.get("badge"), Some(&json!(3)));
        assert!(!n.extra.contains_key("title"));
    }

    #[test]
    fn missing_and_null_fields_are_empty() {
        let n = Notification::from_payload(br#"{ "title": null }"#).unwrap();
        assert_eq!(n.title, "");
        assert_eq!(n.body, "");
    }

    #[test]
    fn decodes_apns_alert_object() {
        let payload = json!({
            "aps": {
                "alert": { "title": "Hello", "body": "World" },
                "mutable-content": 1
            },
            "title": "ignored"
        });
        let n = Notification::from_payload(payload.to_string().as_bytes()).unwrap();
        assert_eq!(n.title, "Hello");
        assert_eq!(n.body, "World");
        assert!(!n.extra.contains_key("title"));
        assert_eq!(n.extra["aps"], json!({ "mutable-content": 1 }));
    }

    #[test]
    fn apns_string_alert_is_the_body() {
        let n = Notification::from_payload(br#"{ "aps": { "alert": "Ping" } }"#).unwrap();
        assert_eq!(n.title, "");
        assert_eq!(n.body, "Ping");
    }

    #[test]
    fn aps_without_alert_falls_back_to_flat_fields() {
        let n = Notification::from_payload(br#"{ "aps": { "badge": 1 }, "title": "T", "body": "B" }"#)
            .unwrap();
        assert_eq!(n.title, "T");
        assert_eq!(n.body, "B");
    }

    #[test]
    fn rejects_empty_payload() {
        assert!(matches!(
            Notification::from_payload(b""),
            Err(PayloadError::Empty)
        ));
    }

    #[test]
    fn rejects_garbage_and_truncated_json() {
        assert!(matches!(
            Notification::from_payload(b"\xff\xfe\x00garbage"),
            Err(PayloadError::Json(_))
        ));
        assert!(matches!(
            Notification::from_payload(br#"{ "title": "Hel"#),
            Err(PayloadError::Json(_))
        ));
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(matches!(
            Notification::from_payload(br#"["Hello", "World"]"#),
            Err(PayloadError::NotAnObject)
        ));
        assert!(matches!(
            Notification::from_payload(b"\"Hello\""),
            Err(PayloadError::NotAnObject)
        ));
    }

    #[test]
    fn rejects_wrongly_typed_fields() {
        let err = Notification::from_payload(br#"{ "title": 7 }"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidField { field: "title", .. }));

        let err = Notification::from_payload(br#"{ "aps": [] }"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidField { field: "aps", .. }));

        let err = Notification::from_payload(br#"{ "aps": { "alert": 1 } }"#).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidField { field: "aps.alert", .. }));

        let err =
            Notification::from_payload(br#"{ "aps": { "alert": { "body": false } } }"#).unwrap_err();
        assert!(matches!(
            err,
            PayloadError::InvalidField {
                field: "aps.alert.body",
                ..
            }
        ));
    }

    #[test]
    fn to_json_ignores_colliding_extra_keys() {
        let mut n = Notification::new("Real title", "Real body");
        n.extra.insert("title".to_string(), json!("shadow"));
        n.extra.insert("body".to_string(), json!(42));
        n.extra.insert("thread".to_string(), json!("t1"));

        let value: Value = serde_json::from_slice(&n.to_json()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["title"], "Real title");
        assert_eq!(object["body"], "Real body");

        let decoded = Notification::from_payload(&n.to_json()).unwrap();
        assert_eq!(decoded.title, "Real title");
        assert_eq!(decoded.body, "Real body");
        assert_eq!(decoded.extra.get("thread"), Some(&json!("t1")));
    }

    #[test]
    fn to_json_is_accepted_back() {
        let mut original = Notification::new("Grüße", "line1\nline2 \"quoted\"");
        original.extra.insert("hrl".to_string(), json!("uhC0k"));

        let decoded = Notification::from_payload(&original.to_json()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn apns_payload_survives_reencoding() {
        let n = Notification::from_payload(
            br#"{ "aps": { "alert": { "title": "T", "body": "B" }, "sound": "default" } }"#,
        )
        .unwrap();
        let again = Notification::from_payload(&n.to_json()).unwrap();
        assert_eq!(again, n);
    }
}
