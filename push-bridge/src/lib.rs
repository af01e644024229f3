//! # push-bridge
//!
//! C ABI bridge that lets a mobile notification extension hand a raw push
//! payload to Rust, get back a rewritten title and body, and release it.
//!
//! ## Exported symbols
//!
//! - [`modify_notification`] - payload bytes in, opaque handle out (null on failure)
//! - [`notification_title`] / [`notification_body`] - read a field as a [`RustByteSlice`]
//! - [`notification_destroy`] - release a handle (null is a no-op)
//!
//! The C declarations live in `include/push_bridge.h`.
//!
//! ## Lifetimes
//!
//! Views returned by the accessors stay valid until the handle is
//! destroyed, so a host may read both fields before copying either.
//! Handles are registry ids, not addresses: using one after destroy is
//! detected, logged, and then handled per [`MisusePolicy`].
//!
//! ## Rust side
//!
//! Call [`install`] before the first exported call to plug in a
//! [`Transform`](push_core::Transform) and a [`BridgeConfig`]. Without it
//! the bridge configures itself from the file named by `PUSHMOD_CONFIG`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod ffi;
pub mod logging;
pub mod metrics;
pub mod slice;

pub use bridge::{install, metrics, Bridge};
pub use config::{BridgeConfig, ConfigError, MisusePolicy, CONFIG_ENV};
pub use error::BridgeError;
pub use ffi::{
    modify_notification, notification_body, notification_destroy, notification_title,
    push_notification,
};
pub use metrics::MetricsSnapshot;
pub use slice::RustByteSlice;
