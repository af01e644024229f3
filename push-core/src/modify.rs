//! Payload-to-notification pipeline.
//!
//! `modify` is everything construction does short of registering a handle:
//! size check, decode, transform. Any failure here becomes a null handle.

use std::panic::{catch_unwind, AssertUnwindSafe};

use push_types::{Notification, PayloadError};
use thiserror::Error;

use crate::transform::{Identity, Transform, TransformError};

/// Default upper bound on a raw payload (64 KiB).
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Why a payload did not produce a notification.
#[derive(Debug, Error)]
pub enum ModifyError {
    /// The payload could not be decoded.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// The transform returned an error.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The transform panicked.
    #[error("transform `{0}` panicked")]
    Panicked(String),
}

/// Decodes raw payloads and applies a [`Transform`].
pub struct Modifier {
    transform: Box<dyn Transform>,
    max_payload_bytes: usize,
}

impl Default for Modifier {
    fn default() -> Self {
        Self::new(Identity)
    }
}

impl std::fmt::Debug for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Modifier")
            .field("transform", &self.transform.name())
            .field("max_payload_bytes", &self.max_payload_bytes)
            .finish()
    }
}

impl Modifier {
    /// Create a modifier around `transform` with the default payload limit.
    pub fn new(transform: impl Transform + 'static) -> Self {
        Self::boxed(Box::new(transform))
    }

    /// Create a modifier around an already boxed transform.
    pub fn boxed(transform: Box<dyn Transform>) -> Self {
        Self {
            transform,
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
        }
    }

    /// Override the payload size limit.
    pub fn with_max_payload_bytes(mut self, limit: usize) -> Self {
        self.max_payload_bytes = limit;
        self
    }

    /// Name of the installed transform.
    pub fn transform_name(&self) -> &str {
        self.transform.name()
    }

    /// Decode `payload` and run it through the transform.
    ///
    /// A panicking transform is contained and reported as
    /// [`ModifyError::Panicked`].
    pub fn modify(&self, payload: &[u8]) -> Result<Notification, ModifyError> {
        if payload.len() > self.max_payload_bytes {
            return Err(PayloadError::TooLarge {
                size: payload.len(),
                limit: self.max_payload_bytes,
            }
            .into());
        }

        let notification = Notification::from_payload(payload)?;
        let transform = &self.transform;
        let rewritten = catch_unwind(AssertUnwindSafe(|| transform.apply(notification)))
            .map_err(|_| ModifyError::Panicked(transform.name().to_string()))??;
        Ok(rewritten)
    }
}
