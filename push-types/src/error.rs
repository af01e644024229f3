//! Error types for payload decoding.

use thiserror::Error;

/// Errors that can occur while decoding a serialized push payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    /// The payload contained no bytes.
    #[error("empty payload")]
    Empty,

    /// The payload exceeded the configured size limit.
    #[error("payload too large: {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Actual size of the payload.
        size: usize,
        /// Maximum allowed size.
        limit: usize,
    },

    /// The payload was not valid UTF-8 JSON.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload was valid JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,

    /// A known field had the wrong JSON type.
    #[error("invalid field `{field}`: expected {expected}")]
    InvalidField {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What the field should have been.
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PayloadError::TooLarge {
            size: 5000,
            limit: 4096,
        };
        assert_eq!(
            err.to_string(),
            "payload too large: 5000 bytes (limit: 4096 bytes)"
        );

        let err = PayloadError::InvalidField {
            field: "aps.alert",
            expected: "a string or an object",
        };
        assert_eq!(
            err.to_string(),
            "invalid field `aps.alert`: expected a string or an object"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PayloadError>();
    }
}
