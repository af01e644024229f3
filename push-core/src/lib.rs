//! # push-core
//!
//! Pure logic for pushmod (no FFI, no globals, instant tests).
//!
//! - [`Transform`] - The pluggable title/body rewrite strategy
//! - [`HandleRegistry`] - Liveness registry behind every opaque handle
//! - [`Modifier`] - Decode a raw payload and run it through a transform

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod modify;
pub mod registry;
pub mod transform;

pub use modify::{ModifyError, Modifier, DEFAULT_MAX_PAYLOAD_BYTES};
pub use registry::{HandleRegistry, RegistryError, DEFAULT_MAX_LIVE_HANDLES};
pub use transform::{Chain, Identity, Transform, TransformError, Truncate};
