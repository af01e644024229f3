//! # push-types
//!
//! Notification payload types for the pushmod notification bridge.
//!
//! This crate provides the foundational types shared by all pushmod crates:
//! - [`Notification`] - The decoded title/body record a handle owns
//! - [`HandleId`] - Never-reused identifier behind every opaque handle
//! - [`PayloadError`] - Decoding failures for raw push payloads

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod ids;
mod notification;

pub use error::PayloadError;
pub use ids::HandleId;
pub use notification::Notification;
