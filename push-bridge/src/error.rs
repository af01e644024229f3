//! Error types for the bridge.
//!
//! Nothing here crosses the C ABI: construction errors become a null
//! handle and handle misuse becomes an empty view or a no-op. These types
//! exist for logging and for Rust callers.

use push_core::{ModifyError, RegistryError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors from bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The payload did not produce a notification.
    #[error("construction failed: {0}")]
    Construction(#[from] ModifyError),

    /// The handle registry refused or did not know the handle.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// The host passed a null pointer with a non-zero length.
    #[error("null payload slice with non-zero length")]
    NullSlice,

    /// The host passed a null handle.
    #[error("null handle")]
    NullHandle,

    /// A bridge call panicked and the panic was contained.
    #[error("panic in {0}")]
    Panicked(&'static str),

    /// `install` ran after the bridge was already initialized.
    #[error("bridge already installed")]
    AlreadyInstalled,

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BridgeError {
    /// True for errors that mean the host broke the handle contract.
    pub fn is_invalid_handle_use(&self) -> bool {
        matches!(
            self,
            BridgeError::NullHandle
                | BridgeError::Registry(RegistryError::Stale(_) | RegistryError::Unknown(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use push_types::{HandleId, PayloadError};

    #[test]
    fn payload_error_maps_to_construction() {
        let err: BridgeError = ModifyError::from(PayloadError::Empty).into();
        assert!(matches!(err, BridgeError::Construction(_)));
        assert_eq!(err.to_string(), "construction failed: empty payload");
        assert!(!err.is_invalid_handle_use());
    }

    #[test]
    fn stale_and_unknown_are_invalid_handle_use() {
        let id = HandleId::from_raw(5).unwrap();
        assert!(BridgeError::from(RegistryError::Stale(id)).is_invalid_handle_use());
        assert!(BridgeError::from(RegistryError::Unknown(id)).is_invalid_handle_use());
        assert!(BridgeError::NullHandle.is_invalid_handle_use());
    }

    #[test]
    fn full_registry_is_a_construction_failure() {
        let err: BridgeError = RegistryError::Full { capacity: 4 }.into();
        assert!(!err.is_invalid_handle_use());
        assert_eq!(
            err.to_string(),
            "registry error: registry full (4 live handles)"
        );
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(
            BridgeError::NullSlice.to_string(),
            "null payload slice with non-zero length"
        );
        assert_eq!(
            BridgeError::Panicked("modify_notification").to_string(),
            "panic in modify_notification"
        );
        assert_eq!(
            BridgeError::AlreadyInstalled.to_string(),
            "bridge already installed"
        );
    }
}
